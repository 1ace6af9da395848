use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Tool;
use crate::message::Role;
use crate::session::Route;
use crate::timer::Lane;

/// Every observable state change in the engine produces an Event.
/// Hosts drain them after each call and render from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ToolSelected {
        tool: Tool,
        at: DateTime<Utc>,
    },
    ChatLoaded {
        chat_id: String,
        message_count: usize,
        at: DateTime<Utc>,
    },
    ChatCleared {
        at: DateTime<Utc>,
    },
    MessageAppended {
        message_id: String,
        role: Role,
        revealing: bool,
        attachment_count: usize,
        at: DateTime<Utc>,
    },
    ReplyScheduled {
        delay_ms: u64,
    },
    /// One more unit of a reveal became visible.
    RevealAdvanced {
        lane: Lane,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
        revealed: String,
    },
    RevealCompleted {
        lane: Lane,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
    /// A newer reveal took over the lane; the old text is shown in full.
    RevealSuperseded {
        lane: Lane,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
    AttachmentStaged {
        attachment_id: String,
        name: String,
        size_bytes: u64,
    },
    AttachmentRemoved {
        attachment_id: String,
    },
    DragChanged {
        is_over: bool,
    },
    QuestionChanged {
        index: usize,
        question_id: u32,
        time_limit_secs: u32,
        at: DateTime<Utc>,
    },
    AnswerSaved {
        question_id: u32,
        chars: usize,
    },
    CountdownTicked {
        question_id: u32,
        remaining_secs: u32,
        display: String,
    },
    CountdownExpired {
        question_id: u32,
    },
    InterviewCompleted {
        answered: usize,
        total: usize,
        at: DateTime<Utc>,
    },
    InterviewEnded {
        at: DateTime<Utc>,
    },
    Navigated {
        from: Route,
        to: Route,
        at: DateTime<Utc>,
    },
    SessionClosed {
        canceled_timers: usize,
        at: DateTime<Utc>,
    },
}
