mod countdown;
mod queue;
mod reveal;

pub use countdown::{ClockState, CountdownClock, CountdownState, CountdownTick};
pub use queue::{Generation, Lane, TimerId, TimerQueue, Wakeup};
pub use reveal::{
    prefix_boundaries, Granularity, RevealProgress, RevealScheduler, RevealState, RevealTiming,
};
