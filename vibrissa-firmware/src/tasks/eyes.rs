//! Eye LED task
//!
//! Executes eye effect commands from the pilot. Blink timing runs
//! here; the pilot only decides what effect is active and when it
//! ends.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use vibrissa_core::behavior::EyeCommand;
use vibrissa_core::traits::IndicatorDriver;
use vibrissa_drivers::indicator::Blinker;

use super::now_ms;
use crate::channels::EYES_CMD;

/// Eye LED task
#[embassy_executor::task]
pub async fn eyes_task(mut left_pin: Output<'static>, mut right_pin: Output<'static>) {
    info!("Eyes task started");

    let mut left = Blinker::new();
    let mut right = Blinker::new();

    loop {
        let now = now_ms();
        set_level(&mut left_pin, left.level_at(now));
        set_level(&mut right_pin, right.level_at(now));

        // Sleep until the next blink edge, or indefinitely when steady
        let next_toggle = match (left.next_toggle_in(now), right.next_toggle_in(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };

        let command = match next_toggle {
            Some(ms) => match select(EYES_CMD.wait(), Timer::after_millis(ms as u64)).await {
                Either::First(command) => Some(command),
                Either::Second(()) => None,
            },
            None => Some(EYES_CMD.wait().await),
        };

        if let Some(command) = command {
            trace!("Eye command: {:?}", command);
            apply(&mut left, &mut right, command);
        }
    }
}

fn apply(left: &mut Blinker, right: &mut Blinker, command: EyeCommand) {
    if let Some(action) = command.left {
        left.apply(action);
    }
    if let Some(action) = command.right {
        right.apply(action);
    }
}

fn set_level(pin: &mut Output<'static>, lit: bool) {
    if lit {
        pin.set_high();
    } else {
        pin.set_low();
    }
}
