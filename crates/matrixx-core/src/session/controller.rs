//! Session controller: single owner of the timer queue.
//!
//! Hosts feed user actions and elapsed time in, and drain [`Event`]s out.
//! Every wake-up the queue fires is routed here to the component that
//! scheduled it. Leaving a screen tears its timers down before the next
//! screen starts any, and [`SessionController::shutdown`] empties the
//! queue so nothing fires afterward.

use chrono::Utc;

use super::chat::ChatSession;
use super::interview::{InterviewSession, SubmitOutcome};
use super::{EngineSettings, Route};
use crate::attachments::{Attachment, DragResponse, FileCandidate};
use crate::catalog::Tool;
use crate::events::Event;
use crate::storage::Config;
use crate::timer::{Lane, TimerId, TimerQueue, Wakeup};

#[derive(Debug)]
pub struct SessionController {
    settings: EngineSettings,
    timers: TimerQueue<Wakeup>,
    route: Route,
    chat: ChatSession,
    interview: Option<InterviewSession>,
    events: Vec<Event>,
    closed: bool,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl SessionController {
    /// Start on the chat screen with the general tool.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            chat: ChatSession::new(&settings),
            settings,
            timers: TimerQueue::new(),
            route: Route::Chat,
            interview: None,
            events: Vec::new(),
            closed: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.engine_settings())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// The interview screen's state, present only while it is shown.
    pub fn interview(&self) -> Option<&InterviewSession> {
        self.interview.as_ref()
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Milliseconds until the next wake-up, `None` when idle.
    pub fn until_next_wakeup(&self) -> Option<u64> {
        self.timers.until_next()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Events produced since the last drain.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Move virtual time forward, firing every wake-up that falls due in
    /// deadline order. Wake-ups scheduled while firing are honored if they
    /// also fall inside the window. Returns how many fired.
    pub fn advance(&mut self, elapsed_ms: u64) -> usize {
        if self.closed {
            return 0;
        }
        let target = self.timers.now_ms().saturating_add(elapsed_ms);
        let mut fired = 0;
        while let Some((id, wakeup)) = self.timers.pop_due(target) {
            fired += 1;
            self.dispatch(id, wakeup);
        }
        self.timers.advance_clock(target);
        fired
    }

    fn dispatch(&mut self, id: TimerId, wakeup: Wakeup) {
        match wakeup {
            Wakeup::Reply { generation } => {
                self.chat
                    .on_reply(&mut self.timers, &mut self.events, id, generation)
            }
            Wakeup::Reveal {
                lane: Lane::Transcript,
                generation,
            } => self
                .chat
                .on_reveal(&mut self.timers, &mut self.events, generation),
            Wakeup::Reveal {
                lane: Lane::Question,
                generation,
            } => match self.interview.as_mut() {
                Some(iv) => iv.on_reveal(&mut self.timers, &mut self.events, generation),
                None => tracing::debug!("question reveal fired with no interview"),
            },
            Wakeup::Countdown { generation } => match self.interview.as_mut() {
                Some(iv) => iv.on_countdown(&mut self.timers, &mut self.events, generation),
                None => tracing::debug!("countdown fired with no interview"),
            },
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Switch screens. The screen being left is torn down first; entering
    /// the interview starts a fresh session at question one.
    pub fn navigate(&mut self, to: Route) -> bool {
        if self.closed || to == self.route {
            return false;
        }
        let from = self.route;
        match from {
            Route::Chat => self.chat.teardown(&mut self.timers),
            Route::Interview => {
                if let Some(mut iv) = self.interview.take() {
                    iv.teardown(&mut self.timers);
                }
            }
        }

        self.route = to;
        tracing::info!(%from, %to, "navigated");
        self.events.push(Event::Navigated {
            from,
            to,
            at: Utc::now(),
        });

        if to == Route::Interview {
            let mut iv = InterviewSession::new(&self.settings);
            iv.start(&mut self.timers, &mut self.events);
            self.interview = Some(iv);
        }
        true
    }

    /// Cancel every outstanding timer. Nothing fires afterward and every
    /// further command is ignored. Returns how many timers were pending.
    pub fn shutdown(&mut self) -> usize {
        if self.closed {
            return 0;
        }
        let pending = self.timers.len();
        self.chat.teardown(&mut self.timers);
        if let Some(mut iv) = self.interview.take() {
            iv.teardown(&mut self.timers);
        }
        let leftover = self.timers.clear();
        if leftover > 0 {
            tracing::warn!(leftover, "timers survived component teardown");
        }
        self.closed = true;
        tracing::info!(canceled = pending, "session closed");
        self.events.push(Event::SessionClosed {
            canceled_timers: pending,
            at: Utc::now(),
        });
        pending
    }

    // ── Chat ─────────────────────────────────────────────────────────

    fn with_chat<R>(
        &mut self,
        f: impl FnOnce(&mut ChatSession, &mut TimerQueue<Wakeup>, &mut Vec<Event>) -> R,
    ) -> Option<R> {
        if self.closed || self.route != Route::Chat {
            return None;
        }
        Some(f(&mut self.chat, &mut self.timers, &mut self.events))
    }

    pub fn select_tool(&mut self, tool: Tool) -> bool {
        self.with_chat(|chat, timers, events| chat.select_tool(timers, events, tool))
            .is_some()
    }

    pub fn select_chat(&mut self, chat_id: &str) -> bool {
        self.with_chat(|chat, timers, events| chat.select_chat(timers, events, chat_id))
            .is_some()
    }

    pub fn new_chat(&mut self) -> bool {
        self.with_chat(|chat, timers, events| chat.new_chat(timers, events))
            .is_some()
    }

    pub fn set_input(&mut self, text: &str) {
        self.with_chat(|chat, _, _| chat.set_input(text));
    }

    /// Send `text` with every pending attachment. False when there was
    /// nothing to send.
    pub fn send_message(&mut self, text: &str) -> bool {
        self.with_chat(|chat, timers, events| chat.send_message(timers, events, text))
            .unwrap_or(false)
    }

    /// Send whatever is in the input box.
    pub fn send_input(&mut self) -> bool {
        let text = self.chat.input().to_string();
        self.send_message(&text)
    }

    pub fn upload_files(&mut self, candidates: Vec<FileCandidate>) -> Vec<Attachment> {
        self.with_chat(|chat, _, events| chat.upload_files(events, candidates))
            .unwrap_or_default()
    }

    pub fn remove_attachment(&mut self, attachment_id: &str) -> bool {
        self.with_chat(|chat, _, events| chat.remove_attachment(events, attachment_id))
            .unwrap_or(false)
    }

    pub fn drag_over(&mut self) -> Option<DragResponse> {
        self.with_chat(|chat, _, events| chat.drag_over(events))
    }

    pub fn drag_leave(&mut self) -> Option<DragResponse> {
        self.with_chat(|chat, _, events| chat.drag_leave(events))
    }

    pub fn drop_files(&mut self, candidates: Vec<FileCandidate>) -> Vec<Attachment> {
        self.with_chat(|chat, _, events| chat.drop_files(events, candidates))
            .unwrap_or_default()
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.with_chat(|chat, _, _| chat.toggle_sidebar())
            .unwrap_or(false)
    }

    pub fn toggle_profile_menu(&mut self) -> bool {
        self.with_chat(|chat, _, _| chat.toggle_profile_menu())
            .unwrap_or(false)
    }

    // ── Interview ────────────────────────────────────────────────────

    fn with_interview<R>(
        &mut self,
        f: impl FnOnce(&mut InterviewSession, &mut TimerQueue<Wakeup>, &mut Vec<Event>) -> R,
    ) -> Option<R> {
        if self.closed || self.route != Route::Interview {
            return None;
        }
        let iv = self.interview.as_mut()?;
        Some(f(iv, &mut self.timers, &mut self.events))
    }

    pub fn select_question(&mut self, index: usize) -> bool {
        self.with_interview(|iv, timers, events| iv.select_question(timers, events, index))
            .unwrap_or(false)
    }

    pub fn next_question(&mut self) -> bool {
        self.with_interview(|iv, timers, events| iv.next(timers, events))
            .unwrap_or(false)
    }

    pub fn previous_question(&mut self) -> bool {
        self.with_interview(|iv, timers, events| iv.previous(timers, events))
            .unwrap_or(false)
    }

    pub fn set_answer(&mut self, text: &str) {
        self.with_interview(|iv, _, _| iv.set_answer(text));
    }

    /// Submit the current draft. Completing the last question returns the
    /// host to the chat screen.
    pub fn submit_answer(&mut self) -> SubmitOutcome {
        let outcome = self
            .with_interview(|iv, timers, events| iv.submit_answer(timers, events))
            .unwrap_or(SubmitOutcome::Disabled);
        if outcome == SubmitOutcome::Completed {
            self.navigate(Route::Chat);
        }
        outcome
    }

    /// Abandon the interview and return to chat.
    pub fn end_interview(&mut self) -> bool {
        let ended = self
            .with_interview(|iv, timers, events| iv.end(timers, events))
            .unwrap_or(false);
        if ended {
            self.navigate(Route::Chat);
        }
        ended
    }

    pub fn toggle_voice_mode(&mut self) -> bool {
        self.with_interview(|iv, _, _| iv.toggle_voice_mode())
            .unwrap_or(false)
    }

    pub fn toggle_recording(&mut self) -> bool {
        self.with_interview(|iv, _, _| iv.toggle_recording())
            .unwrap_or(false)
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if !self.closed {
            self.shutdown();
        }
    }
}
