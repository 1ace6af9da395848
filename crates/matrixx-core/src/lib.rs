//! # Matrixx Core Library
//!
//! Headless interaction engine behind the Matrixx career assistant: the
//! time-driven parts of the chat transcript and the interview-practice
//! screen. The CLI (and any GUI shell) is a thin host that feeds user
//! actions and elapsed time into the same core.
//!
//! ## Architecture
//!
//! - **Timer Queue**: one virtual-time queue of wake-ups; the host calls
//!   `advance()` with elapsed milliseconds, nothing here sleeps or spawns
//! - **Reveal Scheduler**: typewriter-style disclosure of system text
//! - **Countdown Clock**: per-question countdown for the interview flow
//! - **Attachment Stager**: size-validated pending files plus drag state
//! - **Session Controller**: owns the above and keeps their timer chains
//!   canceled and restarted together on every context change
//!
//! ## Key Components
//!
//! - [`SessionController`]: entry point for hosts
//! - [`TimerQueue`]: the single tick source
//! - [`Config`]: TOML configuration

pub mod attachments;
pub mod catalog;
pub mod error;
pub mod events;
pub mod format;
pub mod message;
pub mod session;
pub mod storage;
pub mod timer;

pub use attachments::{Attachment, AttachmentStager, DragPhase, DragResponse, FileCandidate};
pub use catalog::{ChatHistoryItem, ChatSurfaceConfig, Question, Tool};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use message::{Message, Role};
pub use session::{
    ChatSession, EngineSettings, InterviewSession, InterviewStatus, Route, SessionController,
    SidebarState, SubmitOutcome,
};
pub use storage::Config;
pub use timer::{
    ClockState, CountdownClock, CountdownState, Generation, Granularity, Lane, RevealScheduler,
    RevealState, RevealTiming, TimerId, TimerQueue, Wakeup,
};
