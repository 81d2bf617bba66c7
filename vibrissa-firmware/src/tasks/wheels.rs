//! Wheel servo task
//!
//! Receives drive commands from the pilot and applies them to the two
//! continuous-rotation servos. Both servos share one PWM slice running
//! at 50 Hz with 1 µs resolution, so the compare registers are the
//! pulse widths directly.

use defmt::*;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};

use vibrissa_core::traits::WheelDriver;
use vibrissa_drivers::servo::{ContinuousServo, ContinuousServoConfig};

use crate::channels::DRIVE_COMMANDS;

/// PWM counter top for a 20 ms servo frame at 1 MHz
pub const SERVO_PWM_TOP: u16 = 20_000;

/// Divides the 125 MHz system clock down to 1 MHz
pub const SERVO_PWM_DIVIDER: u8 = 125;

/// Wheel servo task
///
/// The PWM slice drives the right servo on channel A and the left on
/// channel B. The right servo is mounted mirrored and is configured
/// inverted.
#[embassy_executor::task]
pub async fn wheels_task(mut pwm: Pwm<'static>) {
    info!("Wheels task started");

    let mut right = ContinuousServo::new(ContinuousServoConfig {
        inverted: true,
        ..ContinuousServoConfig::default()
    });
    let mut left = ContinuousServo::new(ContinuousServoConfig::default());

    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = SERVO_PWM_DIVIDER.into();
    pwm_config.top = SERVO_PWM_TOP;
    pwm_config.compare_a = right.pulse_us();
    pwm_config.compare_b = left.pulse_us();
    pwm.set_config(&pwm_config);

    loop {
        let command = DRIVE_COMMANDS.receive().await;
        trace!("Drive command: {:?}", command);

        left.apply(command.left);
        right.apply(command.right);

        pwm_config.compare_a = right.pulse_us();
        pwm_config.compare_b = left.pulse_us();
        pwm.set_config(&pwm_config);
    }
}
