//! Vibrissa - Whisker-Bot Firmware
//!
//! Main firmware binary for RP2040-based whisker bots: two
//! continuous-rotation servo wheels, two eye LEDs, a piezo buzzer, and
//! two whisker bumper switches. Strikes interrupt the move queue with
//! a reverse-and-turn reflex, then the interrupted plan resumes.
//!
//! Named after the Latin "vibrissae" - the tactile whiskers that let
//! an animal feel its way around obstacles.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use vibrissa_core::behavior::EyeOptions;
use vibrissa_core::config::Calibration;
use vibrissa_core::traits::Side;

use crate::channels::{PilotCommand, PILOT_COMMANDS};

mod channels;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Vibrissa firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Whisker switches close to ground on contact
    let left_whisker = Input::new(p.PIN_3, Pull::Up);
    let right_whisker = Input::new(p.PIN_4, Pull::Up);

    // Eye LEDs
    let left_eye = Output::new(p.PIN_5, Level::Low);
    let right_eye = Output::new(p.PIN_6, Level::Low);

    // Wheel servos share PWM slice 5: right on channel A (GPIO 10),
    // left on channel B (GPIO 11)
    let wheel_pwm = Pwm::new_output_ab(p.PWM_SLICE5, p.PIN_10, p.PIN_11, PwmConfig::default());

    // Piezo buzzer on PWM slice 4 channel B (GPIO 9)
    let buzzer_pwm = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_9, PwmConfig::default());

    info!("Pins and PWM initialized");

    // Spawn tasks
    spawner.spawn(tasks::wheels_task(wheel_pwm)).unwrap();
    spawner.spawn(tasks::eyes_task(left_eye, right_eye)).unwrap();
    spawner.spawn(tasks::buzzer_task(buzzer_pwm)).unwrap();
    spawner
        .spawn(tasks::whisker_task(left_whisker, Side::Left))
        .unwrap();
    spawner
        .spawn(tasks::whisker_task(right_whisker, Side::Right))
        .unwrap();
    spawner
        .spawn(tasks::pilot_task(Calibration::reference()))
        .unwrap();

    // Ready alert: blink the eyes and sing once everything is up
    PILOT_COMMANDS
        .send(PilotCommand::Eyes(EyeOptions::default()))
        .await;
    PILOT_COMMANDS.send(PilotCommand::Sing).await;

    info!("Robot ready!");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
