//! Timed interview practice: one question at a time, a countdown per
//! question, and a typed-in question reveal.
//!
//! Entering a question (by start, next, previous, or direct selection)
//! re-arms the countdown with that question's limit, restarts the question
//! reveal, and restores any answer saved for it. Leaving a question saves
//! the draft.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::EngineSettings;
use crate::catalog::Question;
use crate::events::Event;
use crate::format::format_clock;
use crate::timer::{
    CountdownClock, CountdownState, CountdownTick, Generation, Granularity, Lane, RevealProgress,
    RevealScheduler, TimerQueue, Wakeup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    NotStarted,
    InProgress,
    /// Last question submitted.
    Completed,
    /// Ended early by the user.
    Ended,
}

/// What a submit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank answer or no interview running.
    Disabled,
    Advanced,
    Completed,
}

#[derive(Debug, Clone)]
pub struct InterviewSession {
    questions: Vec<Question>,
    index: usize,
    answers: BTreeMap<u32, String>,
    draft: String,
    clock: CountdownClock,
    reveal: RevealScheduler,
    warning_threshold_secs: u32,
    voice_mode: bool,
    recording: bool,
    status: InterviewStatus,
}

impl InterviewSession {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            questions: settings.questions.clone(),
            index: 0,
            answers: BTreeMap::new(),
            draft: String::new(),
            clock: CountdownClock::new(),
            reveal: RevealScheduler::new(Lane::Question, settings.question_reveal),
            warning_threshold_secs: settings.warning_threshold_secs,
            voice_mode: false,
            recording: false,
            status: InterviewStatus::NotStarted,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> InterviewStatus {
        self.status
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn answers(&self) -> &BTreeMap<u32, String> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: u32) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    /// Number of questions with a non-blank saved answer.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| !a.trim().is_empty()).count()
    }

    /// The question text as currently typed in.
    pub fn displayed_question(&self) -> &str {
        self.reveal.revealed()
    }

    pub fn is_question_typing(&self) -> bool {
        self.reveal.is_active()
    }

    pub fn countdown(&self) -> Option<CountdownState> {
        self.clock.state()
    }

    pub fn time_display(&self) -> String {
        self.clock.display()
    }

    pub fn is_time_warning(&self) -> bool {
        self.clock.is_warning(self.warning_threshold_secs)
    }

    /// `(index + 1) / count * 100`.
    pub fn progress_pct(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.index + 1) as f64 / self.questions.len() as f64 * 100.0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    pub fn can_go_previous(&self) -> bool {
        self.status == InterviewStatus::InProgress && self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.status == InterviewStatus::InProgress && !self.is_last()
    }

    pub fn can_submit(&self) -> bool {
        self.status == InterviewStatus::InProgress && !self.draft.trim().is_empty()
    }

    pub fn voice_mode(&self) -> bool {
        self.voice_mode
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub(crate) fn start(&mut self, timers: &mut TimerQueue<Wakeup>, events: &mut Vec<Event>) {
        if self.status != InterviewStatus::NotStarted {
            return;
        }
        if self.questions.is_empty() {
            tracing::warn!("interview has no questions");
            self.status = InterviewStatus::Completed;
            return;
        }
        self.status = InterviewStatus::InProgress;
        self.index = 0;
        self.enter_question(timers, events);
    }

    /// Jump to `index`. Out of range leaves everything untouched; the
    /// current index is a no-op that keeps the clock running.
    pub(crate) fn select_question(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        index: usize,
    ) -> bool {
        if self.status != InterviewStatus::InProgress {
            return false;
        }
        if index >= self.questions.len() {
            tracing::debug!(index, count = self.questions.len(), "question index out of range");
            return false;
        }
        if index == self.index {
            return true;
        }
        self.save_draft(events);
        self.index = index;
        self.enter_question(timers, events);
        true
    }

    pub(crate) fn next(&mut self, timers: &mut TimerQueue<Wakeup>, events: &mut Vec<Event>) -> bool {
        self.can_go_next() && self.select_question(timers, events, self.index + 1)
    }

    pub(crate) fn previous(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
    ) -> bool {
        self.can_go_previous() && self.select_question(timers, events, self.index - 1)
    }

    pub(crate) fn set_answer(&mut self, text: &str) {
        if self.status != InterviewStatus::InProgress {
            return;
        }
        self.draft = text.to_string();
        if let Some(question) = self.questions.get(self.index) {
            self.answers.insert(question.id, self.draft.clone());
        }
    }

    pub(crate) fn submit_answer(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
    ) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Disabled;
        }
        if !self.is_last() {
            self.next(timers, events);
            return SubmitOutcome::Advanced;
        }

        self.save_draft(events);
        self.teardown(timers);
        self.status = InterviewStatus::Completed;
        let answered = self.answered_count();
        tracing::info!(answered, total = self.questions.len(), "interview completed");
        events.push(Event::InterviewCompleted {
            answered,
            total: self.questions.len(),
            at: Utc::now(),
        });
        SubmitOutcome::Completed
    }

    /// Stop early. Returns false if nothing was running.
    pub(crate) fn end(&mut self, timers: &mut TimerQueue<Wakeup>, events: &mut Vec<Event>) -> bool {
        if self.status != InterviewStatus::InProgress {
            return false;
        }
        self.save_draft(events);
        self.teardown(timers);
        self.status = InterviewStatus::Ended;
        tracing::info!(answered = self.answered_count(), "interview ended early");
        events.push(Event::InterviewEnded { at: Utc::now() });
        true
    }

    pub(crate) fn toggle_voice_mode(&mut self) -> bool {
        self.voice_mode = !self.voice_mode;
        self.recording = false;
        self.voice_mode
    }

    /// Only meaningful in voice mode.
    pub(crate) fn toggle_recording(&mut self) -> bool {
        if self.voice_mode {
            self.recording = !self.recording;
        }
        self.recording
    }

    /// Cancel the countdown and the question reveal.
    pub(crate) fn teardown(&mut self, timers: &mut TimerQueue<Wakeup>) {
        self.clock.disarm(timers);
        self.reveal.cancel(timers);
        self.recording = false;
    }

    // ── Timer routing ────────────────────────────────────────────────

    pub(crate) fn on_countdown(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        generation: Generation,
    ) {
        let Some(question_id) = self.clock.state().map(|s| s.question_id) else {
            return;
        };
        match self.clock.on_wakeup(timers, generation) {
            CountdownTick::Stale => {}
            CountdownTick::Ticked { remaining_seconds } => events.push(Event::CountdownTicked {
                question_id,
                remaining_secs: remaining_seconds,
                display: format_clock(remaining_seconds),
            }),
            CountdownTick::Expired => {
                events.push(Event::CountdownTicked {
                    question_id,
                    remaining_secs: 0,
                    display: format_clock(0),
                });
                tracing::info!(question_id, "question time expired");
                events.push(Event::CountdownExpired { question_id });
            }
        }
    }

    pub(crate) fn on_reveal(
        &mut self,
        timers: &mut TimerQueue<Wakeup>,
        events: &mut Vec<Event>,
        generation: Generation,
    ) {
        let progress = self.reveal.on_wakeup(timers, generation);
        if progress == RevealProgress::Stale {
            return;
        }
        events.push(Event::RevealAdvanced {
            lane: Lane::Question,
            message_id: None,
            revealed: self.reveal.revealed().to_string(),
        });
        if progress == RevealProgress::Completed {
            events.push(Event::RevealCompleted {
                lane: Lane::Question,
                message_id: None,
            });
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn save_draft(&mut self, events: &mut Vec<Event>) {
        let Some(question) = self.questions.get(self.index) else {
            return;
        };
        self.answers.insert(question.id, self.draft.clone());
        events.push(Event::AnswerSaved {
            question_id: question.id,
            chars: self.draft.chars().count(),
        });
    }

    fn enter_question(&mut self, timers: &mut TimerQueue<Wakeup>, events: &mut Vec<Event>) {
        let Some(question) = self.questions.get(self.index).cloned() else {
            return;
        };
        self.draft = self.answers.get(&question.id).cloned().unwrap_or_default();
        self.clock
            .arm(timers, question.id, question.time_limit_seconds);
        self.reveal
            .start(timers, &question.text, Granularity::Character);

        tracing::info!(
            index = self.index,
            question_id = question.id,
            time_limit_secs = question.time_limit_seconds,
            "question entered"
        );
        events.push(Event::QuestionChanged {
            index: self.index,
            question_id: question.id,
            time_limit_secs: question.time_limit_seconds,
            at: Utc::now(),
        });
    }
}
