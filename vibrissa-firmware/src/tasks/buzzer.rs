//! Piezo buzzer task
//!
//! Plays song requests from the pilot. Each note reprograms the PWM
//! slice for its frequency at 50% duty; between songs the output is
//! held silent. New requests are only picked up between songs - the
//! pilot's guard already filters overlapping triggers.

use defmt::*;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Timer;

use vibrissa_core::traits::Sounder;
use vibrissa_drivers::piezo::Sequencer;

use crate::channels::SONG_REQUESTS;

/// Divides the 125 MHz system clock down to 1 MHz for tone generation
pub const TONE_PWM_DIVIDER: u8 = 125;

/// Piezo buzzer task
///
/// The buzzer sits on the slice's B channel.
#[embassy_executor::task]
pub async fn buzzer_task(mut pwm: Pwm<'static>) {
    info!("Buzzer task started");

    let mut sequencer = Sequencer::new();

    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = TONE_PWM_DIVIDER.into();
    pwm_config.compare_b = 0;
    pwm.set_config(&pwm_config);

    loop {
        let request = SONG_REQUESTS.wait().await;
        debug!("Playing song, {} notes", request.notes.len());
        sequencer.play_sequence(request.notes);

        while let Some(tone) = sequencer.next_tone() {
            // Counter top sets the tone pitch on the 1 MHz base clock
            let top = (1_000_000 / tone.freq_hz) as u16;
            pwm_config.top = top;
            pwm_config.compare_b = top / 2;
            pwm.set_config(&pwm_config);

            Timer::after_millis(tone.ms as u64).await;
        }

        // Silence between songs
        pwm_config.compare_b = 0;
        pwm.set_config(&pwm_config);
    }
}
