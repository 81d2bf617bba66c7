//! Whisker switch tasks
//!
//! One task per whisker. The switches close to ground on contact, so a
//! falling edge is a strike. A short settle delay swallows contact
//! chatter after each event.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use vibrissa_core::traits::Side;

use crate::channels::BUMP_EVENTS;

/// Settle time after a strike, ms
const DEBOUNCE_MS: u64 = 50;

/// Whisker watcher task
#[embassy_executor::task(pool_size = 2)]
pub async fn whisker_task(mut pin: Input<'static>, side: Side) {
    info!("{:?} whisker task started", side);

    loop {
        pin.wait_for_falling_edge().await;

        // Drop the strike if events are already backed up
        let _ = BUMP_EVENTS.try_send(side);

        Timer::after_millis(DEBOUNCE_MS).await;
    }
}
