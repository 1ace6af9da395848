//! Countdown clock for timed interview questions.
//!
//! The clock is a state machine advanced by wake-ups from the shared
//! [`TimerQueue`], one per second. It does not use internal threads.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Expired
//!            \-> Stopped (disarm)
//! Running/Stopped/Expired -> Running (re-arm for another question)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut clock = CountdownClock::new();
//! clock.arm(&mut queue, question_id, 120);
//! // For each fired Wakeup::Countdown { generation }:
//! clock.on_wakeup(&mut queue, generation);
//! ```

use serde::{Deserialize, Serialize};

use super::queue::{Generation, TimerId, TimerQueue, Wakeup};
use crate::format::format_clock;

/// Fixed tick period. Drift is not corrected; display precision only.
pub const TICK_PERIOD_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Idle,
    Running,
    /// Disarmed with time left on the clock.
    Stopped,
    Expired,
}

/// Authoritative countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining_seconds: u32,
    pub question_id: u32,
}

/// Result of routing one wake-up to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Wake-up belonged to a previous arming; nothing changed.
    Stale,
    /// Decremented; another tick is scheduled.
    Ticked { remaining_seconds: u32 },
    /// Decremented to zero; the clock has stopped.
    Expired,
}

#[derive(Debug, Clone, Default)]
pub struct CountdownClock {
    state: Option<CountdownState>,
    generation: Generation,
    pending: Option<TimerId>,
}

impl CountdownClock {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> Option<CountdownState> {
        self.state
    }

    pub fn clock_state(&self) -> ClockState {
        match self.state {
            None => ClockState::Idle,
            Some(s) if s.remaining_seconds == 0 => ClockState::Expired,
            Some(_) if self.pending.is_some() => ClockState::Running,
            Some(_) => ClockState::Stopped,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.map(|s| s.remaining_seconds).unwrap_or(0)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn display(&self) -> String {
        format_clock(self.remaining_seconds())
    }

    /// True while armed and below `threshold_secs`.
    pub fn is_warning(&self, threshold_secs: u32) -> bool {
        self.state
            .is_some_and(|s| s.remaining_seconds < threshold_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm for a question. Any previous chain is canceled first, so no
    /// tick from it can be observed after this returns.
    pub fn arm(
        &mut self,
        queue: &mut TimerQueue<Wakeup>,
        question_id: u32,
        time_limit_seconds: u32,
    ) -> CountdownState {
        self.disarm(queue);
        let state = CountdownState {
            remaining_seconds: time_limit_seconds,
            question_id,
        };
        self.state = Some(state);
        if time_limit_seconds > 0 {
            self.schedule(queue);
        }
        tracing::debug!(
            question_id,
            time_limit_seconds,
            generation = self.generation.value(),
            "countdown armed"
        );
        state
    }

    /// Cancel the pending tick, keeping the remaining time.
    pub fn disarm(&mut self, queue: &mut TimerQueue<Wakeup>) {
        if let Some(id) = self.pending.take() {
            queue.cancel(id);
        }
        self.generation = self.generation.next();
    }

    /// Cancel and forget.
    pub fn reset(&mut self, queue: &mut TimerQueue<Wakeup>) {
        self.disarm(queue);
        self.state = None;
    }

    /// Route a fired wake-up to the clock.
    pub fn on_wakeup(
        &mut self,
        queue: &mut TimerQueue<Wakeup>,
        generation: Generation,
    ) -> CountdownTick {
        if generation != self.generation {
            tracing::debug!(
                stale = generation.value(),
                current = self.generation.value(),
                "ignoring stale countdown wake-up"
            );
            return CountdownTick::Stale;
        }
        self.pending = None;

        let Some(state) = self.state.as_mut() else {
            return CountdownTick::Stale;
        };
        if state.remaining_seconds == 0 {
            return CountdownTick::Stale;
        }

        state.remaining_seconds -= 1;
        let remaining_seconds = state.remaining_seconds;
        if remaining_seconds == 0 {
            return CountdownTick::Expired;
        }
        self.schedule(queue);
        CountdownTick::Ticked { remaining_seconds }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn schedule(&mut self, queue: &mut TimerQueue<Wakeup>) {
        let id = queue.schedule_in(
            TICK_PERIOD_MS,
            Wakeup::Countdown {
                generation: self.generation,
            },
        );
        self.pending = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_all(queue: &mut TimerQueue<Wakeup>, clock: &mut CountdownClock, until: u64) -> u32 {
        let mut ticks = 0;
        while let Some((_, wakeup)) = queue.pop_due(until) {
            if let Wakeup::Countdown { generation } = wakeup {
                match clock.on_wakeup(queue, generation) {
                    CountdownTick::Ticked { .. } | CountdownTick::Expired => ticks += 1,
                    CountdownTick::Stale => {}
                }
            }
        }
        ticks
    }

    #[test]
    fn arm_start_expire() {
        let mut queue = TimerQueue::new();
        let mut clock = CountdownClock::new();
        assert_eq!(clock.clock_state(), ClockState::Idle);

        clock.arm(&mut queue, 1, 3);
        assert_eq!(clock.clock_state(), ClockState::Running);
        assert_eq!(clock.display(), "00:03");

        assert_eq!(fire_all(&mut queue, &mut clock, u64::MAX), 3);
        assert_eq!(clock.clock_state(), ClockState::Expired);
        assert_eq!(clock.remaining_seconds(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.now_ms(), 3_000);
    }

    #[test]
    fn one_tick_per_second() {
        let mut queue = TimerQueue::new();
        let mut clock = CountdownClock::new();
        clock.arm(&mut queue, 1, 120);
        assert_eq!(fire_all(&mut queue, &mut clock, 999), 0);
        assert_eq!(fire_all(&mut queue, &mut clock, 1_000), 1);
        assert_eq!(fire_all(&mut queue, &mut clock, 10_500), 9);
        assert_eq!(clock.display(), "01:50");
    }

    #[test]
    fn rearm_resets_and_drops_old_chain() {
        let mut queue = TimerQueue::new();
        let mut clock = CountdownClock::new();
        clock.arm(&mut queue, 1, 120);
        fire_all(&mut queue, &mut clock, 5_000);
        let old = clock.generation();

        clock.arm(&mut queue, 2, 60);
        assert_eq!(queue.len(), 1);
        assert_eq!(clock.on_wakeup(&mut queue, old), CountdownTick::Stale);
        assert_eq!(
            clock.state(),
            Some(CountdownState {
                remaining_seconds: 60,
                question_id: 2
            })
        );
    }

    #[test]
    fn zero_limit_never_ticks() {
        let mut queue = TimerQueue::new();
        let mut clock = CountdownClock::new();
        clock.arm(&mut queue, 1, 0);
        assert!(queue.is_empty());
        assert_eq!(clock.clock_state(), ClockState::Expired);
    }

    #[test]
    fn disarm_stops_with_time_left() {
        let mut queue = TimerQueue::new();
        let mut clock = CountdownClock::new();
        clock.arm(&mut queue, 1, 10);
        fire_all(&mut queue, &mut clock, 2_000);
        clock.disarm(&mut queue);
        assert_eq!(clock.clock_state(), ClockState::Stopped);
        assert_eq!(clock.remaining_seconds(), 8);
        assert!(queue.is_empty());
    }

    #[test]
    fn warning_below_threshold() {
        let mut queue = TimerQueue::new();
        let mut clock = CountdownClock::new();
        assert!(!clock.is_warning(30));
        clock.arm(&mut queue, 1, 30);
        assert!(!clock.is_warning(30));
        fire_all(&mut queue, &mut clock, 1_000);
        assert!(clock.is_warning(30));
    }
}
