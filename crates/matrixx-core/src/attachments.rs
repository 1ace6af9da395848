//! Attachment staging: pending files awaiting the next message send.
//!
//! Candidates larger than the size limit are dropped without an error.
//! That is the product's current behavior and callers rely on it: the
//! accepted list simply omits them.
//!
//! ## Drag sequence
//!
//! ```text
//! Idle -> DragOver -> Idle              (leave)
//! Idle -> DragOver -> Staging -> Idle   (drop)
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw file descriptor offered by the host (file picker or drop).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCandidate {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

/// An accepted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

impl Attachment {
    fn accept(candidate: FileCandidate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: candidate.name,
            mime_type: candidate.mime_type,
            size_bytes: candidate.size_bytes,
            remote_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    #[default]
    Idle,
    DragOver,
    Staging,
}

/// Host-facing answer to a drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResponse {
    /// The host must suppress the platform's default drop handling.
    pub suppress_default: bool,
    /// The overlay flag flipped.
    pub changed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AttachmentStager {
    pending: Vec<Attachment>,
    drag: DragPhase,
}

impl AttachmentStager {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pending(&self) -> &[Attachment] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag == DragPhase::DragOver
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Accept every candidate with `size_bytes <= max_size_bytes`, append
    /// them to the pending set in submission order, and return them.
    pub fn stage<I>(&mut self, candidates: I, max_size_bytes: u64) -> Vec<Attachment>
    where
        I: IntoIterator<Item = FileCandidate>,
    {
        let mut accepted = Vec::new();
        for candidate in candidates {
            if candidate.size_bytes > max_size_bytes {
                tracing::debug!(
                    name = %candidate.name,
                    size_bytes = candidate.size_bytes,
                    max_size_bytes,
                    "dropping oversized attachment"
                );
                continue;
            }
            accepted.push(Attachment::accept(candidate));
        }
        self.pending.extend(accepted.iter().cloned());
        accepted
    }

    /// Remove by id. Returns false (and does nothing) if the id is absent.
    pub fn remove(&mut self, attachment_id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|a| a.id != attachment_id);
        self.pending.len() != before
    }

    /// Move the whole pending set out, leaving it empty.
    pub fn take_all(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.pending)
    }

    /// Drop pending files and any drag in progress.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.drag = DragPhase::Idle;
    }

    pub fn drag_over(&mut self) -> DragResponse {
        let changed = self.drag != DragPhase::DragOver;
        self.drag = DragPhase::DragOver;
        DragResponse {
            suppress_default: true,
            changed,
        }
    }

    pub fn drag_leave(&mut self) -> DragResponse {
        let changed = self.drag != DragPhase::Idle;
        self.drag = DragPhase::Idle;
        DragResponse {
            suppress_default: true,
            changed,
        }
    }

    /// Finish a drag by staging the dropped files. An empty drop stages
    /// nothing.
    pub fn drop_files<I>(&mut self, candidates: I, max_size_bytes: u64) -> Vec<Attachment>
    where
        I: IntoIterator<Item = FileCandidate>,
    {
        self.drag = DragPhase::Staging;
        let accepted = self.stage(candidates, max_size_bytes);
        self.drag = DragPhase::Idle;
        accepted
    }
}
