//! Session control: the chat surface, the interview flow, and the
//! controller that owns their shared timer queue.

mod chat;
mod controller;
mod interview;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Question};
use crate::error::ValidationError;
use crate::timer::RevealTiming;

pub use chat::{ChatSession, SidebarState};
pub use controller::SessionController;
pub use interview::{InterviewSession, InterviewStatus, SubmitOutcome};

/// Screen the host is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Chat,
    Interview,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Chat => "chat",
            Route::Interview => "interview",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Route {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" | "/" => Ok(Route::Chat),
            "interview" | "/interview" => Ok(Route::Interview),
            other => Err(ValidationError::UnknownRoute(other.to_string())),
        }
    }
}

/// Everything the controller needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Pacing for system messages in the transcript (word granularity).
    pub message_reveal: RevealTiming,
    /// Pacing for interview question text (character granularity).
    pub question_reveal: RevealTiming,
    pub reply_delay_ms: u64,
    pub max_file_size_bytes: u64,
    pub warning_threshold_secs: u32,
    pub questions: Vec<Question>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let message_reveal = RevealTiming::default();
        Self {
            message_reveal,
            question_reveal: RevealTiming {
                initial_delay_ms: 300,
                ..message_reveal
            },
            reply_delay_ms: 1_000,
            max_file_size_bytes: catalog::DEFAULT_MAX_FILE_SIZE_BYTES,
            warning_threshold_secs: 30,
            questions: catalog::default_questions(catalog::DEFAULT_TIME_LIMIT_SECS),
        }
    }
}
