//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod buzzer;
pub mod eyes;
pub mod pilot;
pub mod wheels;
pub mod whiskers;

pub use buzzer::buzzer_task;
pub use eyes::eyes_task;
pub use pilot::pilot_task;
pub use wheels::wheels_task;
pub use whiskers::whisker_task;

use embassy_time::Instant;

/// Milliseconds since boot, truncated to the core layer's clock width
pub(crate) fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
