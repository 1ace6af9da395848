use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attachments::Attachment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

/// One transcript entry.
///
/// Immutable once created except for `revealing`, which can only go from
/// true to false, and only once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: String,
    content: String,
    role: Role,
    created_at: DateTime<Utc>,
    revealing: bool,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

impl Message {
    /// User messages are never revealed.
    pub fn user(content: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role: Role::User,
            created_at: Utc::now(),
            revealing: false,
            attachments,
        }
    }

    pub fn system(content: impl Into<String>, revealing: bool) -> Self {
        Self::system_with_id(Uuid::new_v4().to_string(), content, revealing)
    }

    pub fn system_with_id(
        id: impl Into<String>,
        content: impl Into<String>,
        revealing: bool,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            role: Role::System,
            created_at: Utc::now(),
            revealing,
            attachments: Vec::new(),
        }
    }

    /// Fixed-history entry (mock transcripts).
    pub(crate) fn historical(
        id: impl Into<String>,
        role: Role,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            role,
            created_at,
            revealing: false,
            attachments: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Clear the revealing flag. Returns false if it was already clear.
    pub(crate) fn finish_reveal(&mut self) -> bool {
        std::mem::replace(&mut self.revealing, false)
    }
}
