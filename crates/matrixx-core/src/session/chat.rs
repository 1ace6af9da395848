//! Chat surface: transcript, simulated replies, attachments, sidebar.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::EngineSettings;
use crate::attachments::{Attachment, AttachmentStager, DragPhase, DragResponse, FileCandidate};
use crate::catalog::{mock_transcript, ChatSurfaceConfig, Tool};
use crate::events::Event;
use crate::message::Message;
use crate::timer::{
    Generation, Granularity, Lane, RevealProgress, RevealScheduler, TimerId, TimerQueue, Wakeup,
};

/// Sidebar drawer and profile dropdown flags. Any selection closes both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarState {
    pub open: bool,
    pub profile_menu_open: bool,
}

impl SidebarState {
    fn close(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    tool: Tool,
    current_chat_id: Option<String>,
    messages: Vec<Message>,
    input: String,
    stager: AttachmentStager,
    reveal: RevealScheduler,
    /// Message currently owning the transcript lane.
    revealing_id: Option<String>,
    replies: Vec<TimerId>,
    reply_generation: Generation,
    reply_delay_ms: u64,
    max_file_size_bytes: u64,
    sidebar: SidebarState,
}

impl ChatSession {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            tool: Tool::General,
            current_chat_id: None,
            messages: Vec::new(),
            input: String::new(),
            stager: AttachmentStager::new(),
            reveal: RevealScheduler::new(Lane::Transcript, settings.message_reveal),
            revealing_id: None,
            replies: Vec::new(),
            reply_generation: Generation::default(),
            reply_delay_ms: settings.reply_delay_ms,
            max_file_size_bytes: settings.max_file_size_bytes,
            sidebar: SidebarState::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn current_chat_id(&self) -> Option<&str> {
        self.current_chat_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn pending_attachments(&self) -> &[Attachment] {
        self.stager.pending()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.stager.drag_phase()
    }

    pub fn is_drag_over(&self) -> bool {
        self.stager.is_drag_over()
    }

    pub fn sidebar(&self) -> SidebarState {
        self.sidebar
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }

    pub fn revealing_message_id(&self) -> Option<&str> {
        self.revealing_id.as_deref()
    }

    pub fn surface(&self) -> ChatSurfaceConfig {
        ChatSurfaceConfig::for_tool(self.tool, self.max_file_size_bytes)
    }

    /// Send button state: some text or at least one pending file.
    pub fn can_send(&self) -> bool {
        !self.input.trim().is_empty() || !self.stager.is_empty()
    }

    /// Text to render for `message`: the revealed prefix while it owns the
    /// transcript lane, the full content otherwise.
    pub fn display_text<'a>(&'a self, message: &'a Message) -> &'a str {
        if self.revealing_id.as_deref() == Some(message.id()) {
            self.reveal.revealed()
        } else {
            message.content()
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub(crate) fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// Append a user message carrying every pending attachment and schedule
    /// the simulated reply. No-op on blank text with nothing attached.
    pub(crate) fn send_message(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        text: &str,
    ) -> bool {
        let content = text.trim();
        if content.is_empty() && self.stager.is_empty() {
            return false;
        }

        let message = Message::user(content, self.stager.take_all());
        self.push_message(events, message);
        self.input.clear();

        let id = timers.schedule_in(
            self.reply_delay_ms,
            Wakeup::Reply {
                generation: self.reply_generation,
            },
        );
        self.replies.push(id);
        events.push(Event::ReplyScheduled {
            delay_ms: self.reply_delay_ms,
        });
        true
    }

    pub(crate) fn select_tool(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        tool: Tool,
    ) {
        self.reset(timers);
        self.tool = tool;
        self.current_chat_id = None;
        self.sidebar.close();
        tracing::info!(tool = %tool, "tool selected");
        events.push(Event::ToolSelected {
            tool,
            at: Utc::now(),
        });

        if let (Some(id), Some(text)) = (tool.welcome_id(), tool.welcome_text()) {
            self.push_system(timers, events, Message::system_with_id(id, text, true));
        }
    }

    pub(crate) fn select_chat(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        chat_id: &str,
    ) {
        self.reset(timers);
        self.current_chat_id = Some(chat_id.to_string());
        self.messages = mock_transcript(Utc::now());
        self.sidebar.close();
        tracing::info!(chat_id, "chat loaded");
        events.push(Event::ChatLoaded {
            chat_id: chat_id.to_string(),
            message_count: self.messages.len(),
            at: Utc::now(),
        });
    }

    pub(crate) fn new_chat(&mut self, timers: &mut TimerQueue<Wakeup>, events: &mut Vec<Event>) {
        self.teardown(timers);
        self.sidebar.close();
        events.push(Event::ChatCleared { at: Utc::now() });
    }

    pub(crate) fn upload_files(
        &mut self,
        events: &mut Vec<Event>,
        candidates: Vec<FileCandidate>,
    ) -> Vec<Attachment> {
        let accepted = self.stager.stage(candidates, self.max_file_size_bytes);
        push_staged(events, &accepted);
        accepted
    }

    pub(crate) fn drag_over(&mut self, events: &mut Vec<Event>) -> DragResponse {
        let response = self.stager.drag_over();
        if response.changed {
            events.push(Event::DragChanged { is_over: true });
        }
        response
    }

    pub(crate) fn drag_leave(&mut self, events: &mut Vec<Event>) -> DragResponse {
        let was_over = self.stager.is_drag_over();
        let response = self.stager.drag_leave();
        if was_over {
            events.push(Event::DragChanged { is_over: false });
        }
        response
    }

    pub(crate) fn drop_files(
        &mut self,
        events: &mut Vec<Event>,
        candidates: Vec<FileCandidate>,
    ) -> Vec<Attachment> {
        let was_over = self.stager.is_drag_over();
        let accepted = self
            .stager
            .drop_files(candidates, self.max_file_size_bytes);
        if was_over {
            events.push(Event::DragChanged { is_over: false });
        }
        push_staged(events, &accepted);
        accepted
    }

    pub(crate) fn remove_attachment(&mut self, events: &mut Vec<Event>, attachment_id: &str) -> bool {
        let removed = self.stager.remove(attachment_id);
        if removed {
            events.push(Event::AttachmentRemoved {
                attachment_id: attachment_id.to_string(),
            });
        }
        removed
    }

    pub(crate) fn toggle_sidebar(&mut self) -> bool {
        self.sidebar.open = !self.sidebar.open;
        self.sidebar.open
    }

    pub(crate) fn toggle_profile_menu(&mut self) -> bool {
        self.sidebar.profile_menu_open = !self.sidebar.profile_menu_open;
        self.sidebar.profile_menu_open
    }

    // ── Timer routing ────────────────────────────────────────────────

    pub(crate) fn on_reply(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        id: TimerId,
        generation: Generation,
    ) {
        if generation != self.reply_generation {
            tracing::debug!("ignoring reply from a previous conversation");
            return;
        }
        let Some(pos) = self.replies.iter().position(|r| *r == id) else {
            return;
        };
        self.replies.remove(pos);
        let reply = Message::system(self.tool.mock_reply(), true);
        self.push_system(timers, events, reply);
    }

    pub(crate) fn on_reveal(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        generation: Generation,
    ) {
        match self.reveal.on_wakeup(timers, generation) {
            RevealProgress::Stale => {}
            RevealProgress::Advanced { .. } => {
                events.push(Event::RevealAdvanced {
                    lane: Lane::Transcript,
                    message_id: self.revealing_id.clone(),
                    revealed: self.reveal.revealed().to_string(),
                });
            }
            RevealProgress::Completed => {
                events.push(Event::RevealAdvanced {
                    lane: Lane::Transcript,
                    message_id: self.revealing_id.clone(),
                    revealed: self.reveal.revealed().to_string(),
                });
                if let Some(id) = self.revealing_id.take() {
                    self.finish_message(events, &id);
                }
            }
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Cancel every timer this surface owns and empty the transcript.
    pub(crate) fn reset(&mut self, timers: &mut TimerQueue<Wakeup>) {
        for id in self.replies.drain(..) {
            timers.cancel(id);
        }
        self.reply_generation = self.reply_generation.next();
        self.reveal.reset(timers);
        self.revealing_id = None;
        self.messages.clear();
        self.input.clear();
        self.stager.clear();
    }

    /// Reset back to a fresh, tool-less surface.
    pub(crate) fn teardown(&mut self, timers: &mut TimerQueue<Wakeup>) {
        self.reset(timers);
        self.tool = Tool::General;
        self.current_chat_id = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn push_message(&mut self, events: &mut Vec<Event>, message: Message) {
        events.push(Event::MessageAppended {
            message_id: message.id().to_string(),
            role: message.role(),
            revealing: message.is_revealing(),
            attachment_count: message.attachments().len(),
            at: message.created_at(),
        });
        self.messages.push(message);
    }

    /// Append a system message, taking over the transcript lane if it is
    /// marked revealing.
    fn push_system(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        message: Message,
    ) {
        self.supersede_reveal(timers, events);

        let id = message.id().to_string();
        let content = message.content().to_string();
        let revealing = message.is_revealing();
        self.push_message(events, message);
        if !revealing {
            return;
        }

        if self.reveal.start(timers, &content, Granularity::Word).is_active() {
            self.revealing_id = Some(id);
        } else {
            self.finish_message(events, &id);
        }
    }

    fn supersede_reveal(&mut self, timers: &mut TimerQueue<Wakeup>, events: &mut Vec<Event>) {
        let Some(previous) = self.revealing_id.take() else {
            return;
        };
        self.reveal.cancel(timers);
        if let Some(message) = self.messages.iter_mut().find(|m| m.id() == previous) {
            message.finish_reveal();
        }
        events.push(Event::RevealSuperseded {
            lane: Lane::Transcript,
            message_id: Some(previous),
        });
    }

    fn finish_message(&mut self, events: &mut Vec<Event>, id: &str) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id() == id) {
            if message.finish_reveal() {
                events.push(Event::RevealCompleted {
                    lane: Lane::Transcript,
                    message_id: Some(id.to_string()),
                });
            }
        }
    }
}

fn push_staged(events: &mut Vec<Event>, accepted: &[Attachment]) {
    events.extend(accepted.iter().map(|a| Event::AttachmentStaged {
        attachment_id: a.id.clone(),
        name: a.name.clone(),
        size_bytes: a.size_bytes,
    }));
}
