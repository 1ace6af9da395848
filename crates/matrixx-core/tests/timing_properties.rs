//! Property tests for reveal, countdown, and staging invariants.

use matrixx_core::timer::{CountdownTick, RevealProgress};
use matrixx_core::{
    AttachmentStager, CountdownClock, FileCandidate, Granularity, Lane, RevealScheduler,
    RevealTiming, TimerQueue, Wakeup,
};
use proptest::prelude::*;

fn granularity() -> impl Strategy<Value = Granularity> {
    prop_oneof![Just(Granularity::Character), Just(Granularity::Word)]
}

/// Fire every reveal wake-up due by `until`, collecting visible prefixes.
fn drive_reveal(
    queue: &mut TimerQueue<Wakeup>,
    reveal: &mut RevealScheduler,
    until: u64,
) -> Vec<String> {
    let mut prefixes = Vec::new();
    while let Some((_, wakeup)) = queue.pop_due(until) {
        if let Wakeup::Reveal { generation, .. } = wakeup {
            if reveal.on_wakeup(queue, generation) != RevealProgress::Stale {
                prefixes.push(reveal.revealed().to_string());
            }
        }
    }
    queue.advance_clock(until);
    prefixes
}

fn drive_countdown(queue: &mut TimerQueue<Wakeup>, clock: &mut CountdownClock, until: u64) -> u32 {
    let mut ticks = 0;
    while let Some((_, wakeup)) = queue.pop_due(until) {
        if let Wakeup::Countdown { generation } = wakeup {
            if clock.on_wakeup(queue, generation) != CountdownTick::Stale {
                ticks += 1;
            }
        }
    }
    queue.advance_clock(until);
    ticks
}

proptest! {
    #[test]
    fn reveal_prefixes_grow_and_end_at_source(
        text in "[a-zA-Z0-9 éü📄]{1,60}",
        g in granularity(),
    ) {
        let mut queue = TimerQueue::new();
        let mut reveal = RevealScheduler::new(Lane::Transcript, RevealTiming::default());
        reveal.start(&mut queue, &text, g);

        let prefixes = drive_reveal(&mut queue, &mut reveal, u64::MAX);
        prop_assert!(!prefixes.is_empty());
        for pair in prefixes.windows(2) {
            prop_assert!(pair[0].len() < pair[1].len());
            prop_assert!(pair[1].starts_with(pair[0].as_str()));
        }
        prop_assert_eq!(prefixes.last().map(String::as_str), Some(text.as_str()));
        prop_assert!(!reveal.is_active());
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn restarted_reveal_never_shows_old_prefixes(
        first in "[a-z]{3,20}",
        second in "[A-Z]{3,20}",
        elapsed in 0u64..1_000,
    ) {
        let mut queue = TimerQueue::new();
        let mut reveal = RevealScheduler::new(Lane::Question, RevealTiming::default());
        reveal.start(&mut queue, &first, Granularity::Character);
        drive_reveal(&mut queue, &mut reveal, elapsed);

        reveal.start(&mut queue, &second, Granularity::Character);
        let prefixes = drive_reveal(&mut queue, &mut reveal, u64::MAX);
        for prefix in &prefixes {
            prop_assert!(second.starts_with(prefix.as_str()));
        }
        prop_assert_eq!(prefixes.last(), Some(&second));
    }

    #[test]
    fn countdown_ticks_exactly_limit_times(limit in 0u32..300) {
        let mut queue = TimerQueue::new();
        let mut clock = CountdownClock::new();
        clock.arm(&mut queue, 1, limit);

        prop_assert_eq!(drive_countdown(&mut queue, &mut clock, u64::MAX), limit);
        prop_assert_eq!(clock.remaining_seconds(), 0);
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn rearmed_countdown_ignores_old_chain(
        first_limit in 1u32..200,
        second_limit in 1u32..200,
        elapsed_secs in 0u64..200,
    ) {
        let mut queue = TimerQueue::new();
        let mut clock = CountdownClock::new();
        clock.arm(&mut queue, 1, first_limit);
        let before = drive_countdown(&mut queue, &mut clock, elapsed_secs * 1_000);
        prop_assert!(before <= first_limit);

        clock.arm(&mut queue, 2, second_limit);
        prop_assert_eq!(drive_countdown(&mut queue, &mut clock, u64::MAX), second_limit);
    }

    #[test]
    fn stager_accepts_exactly_the_files_within_limit(
        sizes in prop::collection::vec(0u64..2_000, 0..20),
        max in 0u64..2_000,
    ) {
        let mut stager = AttachmentStager::new();
        let candidates: Vec<FileCandidate> = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| FileCandidate::new(format!("file-{i}"), "text/plain", size))
            .collect();

        let accepted = stager.stage(candidates, max);
        let expected: Vec<String> = sizes
            .iter()
            .enumerate()
            .filter(|&(_, &size)| size <= max)
            .map(|(i, _)| format!("file-{i}"))
            .collect();
        let names: Vec<String> = accepted.iter().map(|a| a.name.clone()).collect();
        prop_assert_eq!(names, expected);
        prop_assert!(stager.pending().iter().all(|a| a.size_bytes <= max));
    }
}
