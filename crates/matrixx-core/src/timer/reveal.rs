//! Reveal scheduler: typewriter-style disclosure of a string.
//!
//! A reveal is a chain of wake-ups on the shared [`TimerQueue`]. Each
//! wake-up discloses one more unit (character or word) until the whole
//! source text is visible.
//!
//! ## State Transitions
//!
//! ```text
//! (none) -> active -> complete
//!              \-> canceled (start/cancel/reset)
//! ```
//!
//! Starting a new reveal cancels the pending wake-up by handle and bumps
//! the generation, so a wake-up from the previous chain can never move the
//! new prefix.

use serde::{Deserialize, Serialize};

use super::queue::{Generation, Lane, TimerId, TimerQueue, Wakeup};

/// Unit disclosed per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Character,
    Word,
}

/// Pacing of a reveal chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    pub char_interval_ms: u64,
    pub word_interval_ms: u64,
    /// Delay before the first unit appears, lets the container mount.
    pub initial_delay_ms: u64,
}

impl RevealTiming {
    pub fn interval_ms(&self, granularity: Granularity) -> u64 {
        match granularity {
            Granularity::Character => self.char_interval_ms,
            Granularity::Word => self.word_interval_ms,
        }
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            char_interval_ms: 30,
            word_interval_ms: 50,
            initial_delay_ms: 150,
        }
    }
}

/// Byte offsets at which successive revealed prefixes end.
///
/// Character granularity yields one offset per Unicode scalar. Word
/// granularity treats each single space as a separator, so the k-th prefix
/// is `words[0..=k].join(" ")`; a leading space would produce an empty
/// prefix and is skipped. The last offset is always `text.len()` for a
/// non-empty text.
pub fn prefix_boundaries(text: &str, granularity: Granularity) -> Vec<usize> {
    if text.is_empty() {
        return Vec::new();
    }
    match granularity {
        Granularity::Character => text
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect(),
        Granularity::Word => {
            let mut bounds: Vec<usize> = text
                .match_indices(' ')
                .map(|(i, _)| i)
                .filter(|&i| i > 0)
                .collect();
            bounds.push(text.len());
            bounds
        }
    }
}

/// Snapshot of one reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealState {
    source_text: String,
    #[serde(skip)]
    boundaries: Vec<usize>,
    /// Number of boundaries disclosed so far.
    #[serde(skip)]
    shown: usize,
    granularity: Granularity,
    active: bool,
}

impl RevealState {
    fn new(source_text: &str, granularity: Granularity) -> Self {
        let boundaries = prefix_boundaries(source_text, granularity);
        let active = !boundaries.is_empty();
        Self {
            source_text: source_text.to_string(),
            boundaries,
            shown: 0,
            granularity,
            active,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn revealed_prefix(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.source_text[..self.boundaries[n - 1]],
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True once the full source text has been disclosed.
    pub fn is_complete(&self) -> bool {
        self.shown == self.boundaries.len()
    }
}

/// Result of routing one wake-up to a reveal scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealProgress {
    /// Wake-up belonged to a canceled chain; nothing changed.
    Stale,
    /// One more unit disclosed; another wake-up is scheduled.
    Advanced { revealed_len: usize },
    /// Final unit disclosed; the reveal is now inactive.
    Completed,
}

/// Drives reveals for one lane.
#[derive(Debug, Clone)]
pub struct RevealScheduler {
    lane: Lane,
    timing: RevealTiming,
    state: Option<RevealState>,
    generation: Generation,
    pending: Option<TimerId>,
}

impl RevealScheduler {
    pub fn new(lane: Lane, timing: RevealTiming) -> Self {
        Self {
            lane,
            timing,
            state: None,
            generation: Generation::default(),
            pending: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn state(&self) -> Option<&RevealState> {
        self.state.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.state.as_ref().is_some_and(RevealState::is_active)
    }

    /// Currently disclosed prefix, empty when nothing is revealing.
    pub fn revealed(&self) -> &str {
        self.state
            .as_ref()
            .map(RevealState::revealed_prefix)
            .unwrap_or("")
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin revealing `source_text`, canceling any reveal in flight.
    ///
    /// Empty text completes at once: the returned state is inactive and no
    /// wake-up is scheduled.
    pub fn start(
        &mut self,
        queue: &mut TimerQueue<Wakeup>,
        source_text: &str,
        granularity: Granularity,
    ) -> &RevealState {
        self.cancel(queue);
        let state = RevealState::new(source_text, granularity);
        if state.active {
            self.schedule(queue, self.timing.initial_delay_ms);
        }
        tracing::debug!(
            lane = ?self.lane,
            generation = self.generation.value(),
            units = state.boundaries.len(),
            "reveal started"
        );
        &*self.state.insert(state)
    }

    /// Restart if an active reveal's source changed underneath it.
    ///
    /// Returns true when a restart happened.
    pub fn sync_source(&mut self, queue: &mut TimerQueue<Wakeup>, source_text: &str) -> bool {
        let granularity = match &self.state {
            Some(state) if state.active && state.source_text != source_text => state.granularity,
            _ => return false,
        };
        tracing::debug!(lane = ?self.lane, "reveal source changed mid-flight, restarting");
        self.start(queue, source_text, granularity);
        true
    }

    /// Stop the chain. The partial prefix stays readable, inactive.
    pub fn cancel(&mut self, queue: &mut TimerQueue<Wakeup>) {
        if let Some(id) = self.pending.take() {
            queue.cancel(id);
        }
        self.generation = self.generation.next();
        if let Some(state) = self.state.as_mut() {
            state.active = false;
        }
    }

    /// Cancel and forget the current reveal.
    pub fn reset(&mut self, queue: &mut TimerQueue<Wakeup>) {
        self.cancel(queue);
        self.state = None;
    }

    /// Route a fired wake-up to this scheduler.
    pub fn on_wakeup(
        &mut self,
        queue: &mut TimerQueue<Wakeup>,
        generation: Generation,
    ) -> RevealProgress {
        if generation != self.generation {
            tracing::debug!(
                lane = ?self.lane,
                stale = generation.value(),
                current = self.generation.value(),
                "ignoring stale reveal wake-up"
            );
            return RevealProgress::Stale;
        }
        self.pending = None;

        let Some(state) = self.state.as_mut() else {
            return RevealProgress::Stale;
        };
        if !state.active {
            return RevealProgress::Stale;
        }

        state.shown += 1;
        if state.is_complete() {
            state.active = false;
            return RevealProgress::Completed;
        }

        let revealed_len = state.revealed_prefix().len();
        let interval = self.timing.interval_ms(state.granularity);
        self.schedule(queue, interval);
        RevealProgress::Advanced { revealed_len }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn schedule(&mut self, queue: &mut TimerQueue<Wakeup>, delay_ms: u64) {
        let id = queue.schedule_in(
            delay_ms,
            Wakeup::Reveal {
                lane: self.lane,
                generation: self.generation,
            },
        );
        self.pending = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(queue: &mut TimerQueue<Wakeup>, reveal: &mut RevealScheduler) -> Vec<String> {
        let mut seen = Vec::new();
        while let Some((_, wakeup)) = queue.pop_due(u64::MAX) {
            if let Wakeup::Reveal { generation, .. } = wakeup {
                match reveal.on_wakeup(queue, generation) {
                    RevealProgress::Advanced { .. } | RevealProgress::Completed => {
                        seen.push(reveal.revealed().to_string())
                    }
                    RevealProgress::Stale => {}
                }
            }
        }
        seen
    }

    #[test]
    fn word_boundaries_follow_single_spaces() {
        let text = "Hello there  world";
        let prefixes: Vec<&str> = prefix_boundaries(text, Granularity::Word)
            .into_iter()
            .map(|b| &text[..b])
            .collect();
        assert_eq!(prefixes, vec!["Hello", "Hello there", "Hello there ", text]);
    }

    #[test]
    fn leading_space_does_not_yield_empty_prefix() {
        assert_eq!(prefix_boundaries(" hi", Granularity::Word), vec![3]);
    }

    #[test]
    fn character_boundaries_respect_multibyte() {
        let text = "añ📄";
        let bounds = prefix_boundaries(text, Granularity::Character);
        assert_eq!(bounds, vec![1, 3, 7]);
    }

    #[test]
    fn reveals_words_in_order() {
        let mut queue = TimerQueue::new();
        let mut reveal = RevealScheduler::new(Lane::Transcript, RevealTiming::default());
        reveal.start(&mut queue, "one two three", Granularity::Word);

        assert_eq!(queue.next_deadline(), Some(150));
        let seen = drive(&mut queue, &mut reveal);
        assert_eq!(seen, vec!["one", "one two", "one two three"]);
        assert!(!reveal.is_active());
        assert_eq!(queue.now_ms(), 150 + 2 * 50);
    }

    #[test]
    fn empty_text_completes_without_ticks() {
        let mut queue = TimerQueue::new();
        let mut reveal = RevealScheduler::new(Lane::Question, RevealTiming::default());
        let state = reveal.start(&mut queue, "", Granularity::Character);
        assert!(!state.is_active());
        assert!(state.is_complete());
        assert!(queue.is_empty());
    }

    #[test]
    fn restart_cancels_previous_chain() {
        let mut queue = TimerQueue::new();
        let mut reveal = RevealScheduler::new(Lane::Transcript, RevealTiming::default());
        reveal.start(&mut queue, "first message here", Granularity::Word);
        let old_generation = reveal.generation();

        reveal.start(&mut queue, "second", Granularity::Word);
        assert_eq!(queue.len(), 1);
        assert_eq!(
            reveal.on_wakeup(&mut queue, old_generation),
            RevealProgress::Stale
        );

        let seen = drive(&mut queue, &mut reveal);
        assert_eq!(seen, vec!["second"]);
    }

    #[test]
    fn sync_source_restarts_only_on_change() {
        let mut queue = TimerQueue::new();
        let mut reveal = RevealScheduler::new(Lane::Question, RevealTiming::default());
        reveal.start(&mut queue, "abc", Granularity::Character);
        assert!(!reveal.sync_source(&mut queue, "abc"));

        let (_, wakeup) = queue.pop_due(u64::MAX).unwrap();
        if let Wakeup::Reveal { generation, .. } = wakeup {
            reveal.on_wakeup(&mut queue, generation);
        }
        assert_eq!(reveal.revealed(), "a");

        assert!(reveal.sync_source(&mut queue, "xyz"));
        assert_eq!(reveal.revealed(), "");
        let seen = drive(&mut queue, &mut reveal);
        assert_eq!(seen, vec!["x", "xy", "xyz"]);
    }

    #[test]
    fn cancel_keeps_partial_prefix_inactive() {
        let mut queue = TimerQueue::new();
        let mut reveal = RevealScheduler::new(Lane::Transcript, RevealTiming::default());
        reveal.start(&mut queue, "a b c", Granularity::Word);
        let (_, wakeup) = queue.pop_due(u64::MAX).unwrap();
        if let Wakeup::Reveal { generation, .. } = wakeup {
            reveal.on_wakeup(&mut queue, generation);
        }
        reveal.cancel(&mut queue);
        assert!(queue.is_empty());
        assert!(!reveal.is_active());
        assert_eq!(reveal.revealed(), "a");
    }
}
