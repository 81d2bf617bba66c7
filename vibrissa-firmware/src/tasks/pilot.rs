//! Pilot task
//!
//! The single owner of the move queue engine and behavior state. All
//! queue mutations happen here; other tasks only feed events in and
//! apply setpoints out. Move timers are realized as deadlines this
//! task sleeps on - the engine's generation tokens make preempted
//! deadlines harmless.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_rp::clocks::RoscRng;
use embassy_time::{Duration, Instant, Timer};

use vibrissa_core::behavior::Pilot;
use vibrissa_core::config::Calibration;
use vibrissa_core::scheduler::{DriveCommand, StepOutcome};

use super::now_ms;
use crate::channels::{
    PilotCommand, BUMP_EVENTS, DRIVE_COMMANDS, EYES_CMD, PILOT_COMMANDS, SONG_REQUESTS,
};

/// Bookkeeping for the move currently on a timer
#[derive(Debug, Clone, Copy)]
struct InFlight {
    deadline: Instant,
    generation: u32,
    brake_at_end: bool,
}

/// What a timer wakeup is for
#[derive(Debug, Clone, Copy)]
enum Wake {
    MoveDone { generation: u32, brake: bool },
    ClearEyes,
}

/// Pilot task - owns the engine, drives the drain
#[embassy_executor::task]
pub async fn pilot_task(calibration: Calibration) {
    info!("Pilot task started");

    let mut pilot = Pilot::new(calibration);
    let mut rng = RoscRng;
    let mut in_flight: Option<InFlight> = None;

    loop {
        match select3(
            BUMP_EVENTS.receive(),
            PILOT_COMMANDS.receive(),
            next_wake(in_flight, pilot.eyes_deadline()),
        )
        .await
        {
            Either3::First(side) => {
                warn!("{:?} side bumped!", side);
                let response = pilot.obstacle(side, now_ms());
                DRIVE_COMMANDS.send(response.halt).await;
                EYES_CMD.signal(response.eyes);
                if let Some(song) = response.song {
                    SONG_REQUESTS.signal(song);
                }
                apply(&mut in_flight, response.step).await;
            }

            Either3::Second(command) => {
                debug!("Pilot command: {:?}", command);
                match command {
                    PilotCommand::Dance { moves } => {
                        pilot.dance(moves, &mut rng);
                        info!("Queued dance, {} moves pending", pilot.engine().pending_len());
                    }
                    PilotCommand::DanceNow { moves } => {
                        let outcome = pilot.dance_now(moves, &mut rng);
                        apply(&mut in_flight, outcome).await;
                    }
                    PilotCommand::Go => {
                        let outcome = pilot.engine_mut().go_now();
                        apply(&mut in_flight, outcome).await;
                    }
                    PilotCommand::Sing => {
                        if let Some(song) = pilot.sing(now_ms()) {
                            SONG_REQUESTS.signal(song);
                        }
                    }
                    PilotCommand::Eyes(opts) => {
                        EYES_CMD.signal(pilot.eyes(&opts, now_ms()));
                    }
                    PilotCommand::Halt => {
                        pilot.engine_mut().halt();
                        in_flight = None;
                        DRIVE_COMMANDS.send(DriveCommand::stopped()).await;
                    }
                }
            }

            Either3::Third(wake) => match wake {
                Wake::MoveDone { generation, brake } => {
                    if brake {
                        DRIVE_COMMANDS.send(DriveCommand::stopped()).await;
                    }
                    in_flight = None;
                    let outcome = pilot.engine_mut().move_complete(generation);
                    apply(&mut in_flight, outcome).await;
                }
                Wake::ClearEyes => {
                    EYES_CMD.signal(pilot.clear_eyes());
                }
            },
        }
    }
}

/// Publish a step outcome and update the in-flight bookkeeping
async fn apply(in_flight: &mut Option<InFlight>, outcome: StepOutcome) {
    match outcome {
        StepOutcome::Started(action) => {
            debug!("Move started for {} ms", action.duration_ms);
            DRIVE_COMMANDS.send(action.command).await;
            *in_flight = Some(InFlight {
                deadline: Instant::now() + Duration::from_millis(action.duration_ms as u64),
                generation: action.generation,
                brake_at_end: action.brake_at_end,
            });
        }
        StepOutcome::Drained => {
            debug!("Queue drained, stopping");
            DRIVE_COMMANDS.send(DriveCommand::stopped()).await;
            *in_flight = None;
        }
        StepOutcome::Idle => {}
    }
}

/// Sleep until the nearest deadline and say which one fired
///
/// With nothing scheduled this pends forever; a bump or command wakes
/// the select instead.
async fn next_wake(in_flight: Option<InFlight>, eyes_deadline_ms: Option<u32>) -> Wake {
    let eyes_at = eyes_deadline_ms.map(|deadline| {
        // An already-passed deadline wraps; fire it immediately
        let delta = deadline.wrapping_sub(now_ms());
        let delta = if delta > i32::MAX as u32 { 0 } else { delta };
        Instant::now() + Duration::from_millis(delta as u64)
    });

    let (at, wake) = match (in_flight, eyes_at) {
        (None, None) => core::future::pending().await,
        (Some(mv), None) => (
            mv.deadline,
            Wake::MoveDone {
                generation: mv.generation,
                brake: mv.brake_at_end,
            },
        ),
        (None, Some(eyes)) => (eyes, Wake::ClearEyes),
        (Some(mv), Some(eyes)) => {
            if mv.deadline <= eyes {
                (
                    mv.deadline,
                    Wake::MoveDone {
                        generation: mv.generation,
                        brake: mv.brake_at_end,
                    },
                )
            } else {
                (eyes, Wake::ClearEyes)
            }
        }
    };

    Timer::at(at).await;
    wake
}
