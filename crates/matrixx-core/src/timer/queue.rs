//! Virtual-time wake-up queue.
//!
//! Every timer in the engine (reveal ticks, countdown ticks, simulated
//! replies) is one entry in a single `TimerQueue`. The queue never sleeps:
//! the host advances it by elapsed milliseconds and routes each due entry.
//!
//! ## Ordering
//!
//! Entries fire in deadline order; entries with the same deadline fire in
//! the order they were scheduled.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Handle to a scheduled entry, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// Generation tag carried by every wake-up.
///
/// A component bumps its generation on every transition and ignores
/// wake-ups tagged with an older one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Visible slot served by one reveal scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    /// Latest system message in the chat transcript.
    Transcript,
    /// Question text on the interview screen.
    Question,
}

/// What a fired entry asks the controller to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Wakeup {
    Reveal { lane: Lane, generation: Generation },
    Countdown { generation: Generation },
    Reply { generation: Generation },
}

/// Ordered queue of timers keyed by virtual milliseconds.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now_ms: u64,
    next_id: u64,
    /// (deadline_ms, id) -> payload
    entries: BTreeMap<(u64, u64), T>,
    /// id -> deadline_ms, for cancellation by handle
    deadlines: HashMap<u64, u64>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Virtual time of the most recent firing or advance.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id.0)
    }

    /// Deadline of the earliest pending entry.
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Milliseconds from now until the earliest pending entry.
    pub fn until_next(&self) -> Option<u64> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now_ms))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn schedule_in(&mut self, delay_ms: u64, payload: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = self.now_ms.saturating_add(delay_ms);
        self.entries.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        TimerId(id)
    }

    /// Cancel a pending entry. Returns false if it already fired or was
    /// canceled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id.0) {
            Some(deadline) => self.entries.remove(&(deadline, id.0)).is_some(),
            None => false,
        }
    }

    /// Drop every pending entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.deadlines.clear();
        dropped
    }

    /// Remove the earliest entry due at or before `until_ms`, moving the
    /// virtual clock to its deadline.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, T)> {
        let &(deadline, id) = self.entries.keys().next()?;
        if deadline > until_ms {
            return None;
        }
        let payload = self.entries.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now_ms = self.now_ms.max(deadline);
        Some((TimerId(id), payload))
    }

    /// Move the virtual clock forward without firing anything.
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }
}
