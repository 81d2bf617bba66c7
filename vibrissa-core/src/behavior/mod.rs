//! Behavior layer
//!
//! Composite behaviors built on the move queue engine: the obstacle
//! reflex, random dancing, and the timed eye/song effects. A [`Pilot`]
//! owns the engine and the effect guards; the firmware's controller
//! task is its single writer.

pub mod effects;
pub mod song;

pub use effects::{EyeCommand, EyeEffect, EyeOptions, EyeStyle, SongGuard};
pub use song::{song_total_ms, SongRequest, ALERT_SONG};

use rand_core::RngCore;

use crate::config::Calibration;
use crate::scheduler::{DriveCommand, Engine, Move, MoveKind, StepOutcome};
use crate::traits::Side;

/// Everything the owner must apply after an obstacle strike, in order:
/// halt the wheels, update the eyes, maybe start the song, then act on
/// the restarted drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObstacleResponse {
    /// Immediate hard stop
    pub halt: DriveCommand,
    /// Alert blink on the struck side
    pub eyes: EyeCommand,
    /// Alert song, unless one is already playing
    pub song: Option<SongRequest>,
    /// First step of the restarted drain
    pub step: StepOutcome,
}

/// Behavior-layer front end over the move queue engine
#[derive(Debug)]
pub struct Pilot {
    engine: Engine,
    eyes: EyeEffect,
    song: SongGuard,
}

impl Pilot {
    /// Create a pilot with an idle engine
    pub fn new(calibration: Calibration) -> Self {
        Self {
            engine: Engine::new(calibration),
            eyes: EyeEffect::new(),
            song: SongGuard::new(),
        }
    }

    /// The underlying engine
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Mutable access for direct queueing
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Reactive interrupt for a whisker strike
    ///
    /// Remembers the in-progress plan, queues a fixed reverse and an
    /// opposing turn ahead of it, and restarts the drain. A left
    /// strike turns clockwise (away from the obstacle), a right strike
    /// counter-clockwise.
    pub fn obstacle(&mut self, side: Side, now_ms: u32) -> ObstacleResponse {
        let magnitude = self.engine.calibration().obstacle_turn_deg;
        let degrees = match side {
            Side::Left => magnitude,
            Side::Right => -magnitude,
        };
        let reverse_ms = self.engine.calibration().reverse_ms;

        let eyes = self.eyes.trigger(
            &EyeOptions {
                side: Some(side),
                ..EyeOptions::default()
            },
            now_ms,
        );
        let song = self.sing(now_ms);

        self.engine
            .remember()
            .enqueue(Move {
                kind: MoveKind::Backward { ms: reverse_ms },
            })
            .enqueue(Move {
                kind: MoveKind::Turn { degrees, ms: None },
            });
        let step = self.engine.go_now();

        ObstacleResponse {
            halt: DriveCommand::stopped(),
            eyes,
            song,
            step,
        }
    }

    /// Queue a run of random moves
    ///
    /// `count` of `None` picks a random length in 5..=10. Weighted
    /// choice per move: 1-in-5 forward, 1-in-5 pivot turn, 3-in-5 arc
    /// turn. Does not start draining.
    pub fn dance<R: RngCore>(&mut self, count: Option<u8>, rng: &mut R) {
        let n = count.unwrap_or_else(|| rand_range(rng, 5, 10) as u8);
        let min_ms = self.engine.calibration().min_move_ms;
        for _ in 0..n {
            let mv = match rand_range(rng, 0, 4) {
                0 => Move {
                    kind: MoveKind::Forward {
                        ms: rand_range(rng, min_ms, n as u32 * min_ms),
                    },
                },
                1 => {
                    let degrees = rand_range(rng, 45, 135) as i16;
                    let degrees = if rand_range(rng, 0, 1) == 0 {
                        degrees
                    } else {
                        -degrees
                    };
                    Move {
                        kind: MoveKind::Turn { degrees, ms: None },
                    }
                }
                _ => {
                    let side = if rand_range(rng, 0, 1) == 0 {
                        Side::Right
                    } else {
                        Side::Left
                    };
                    Move {
                        kind: MoveKind::ArcTurn {
                            side,
                            degrees: rand_range(rng, 45, 135) as i16,
                            ms: None,
                        },
                    }
                }
            };
            self.engine.enqueue(mv);
        }
    }

    /// [`Pilot::dance`] followed by an immediate drain start
    pub fn dance_now<R: RngCore>(&mut self, count: Option<u8>, rng: &mut R) -> StepOutcome {
        self.dance(count, rng);
        self.engine.go_now()
    }

    /// Trigger a timed eye effect
    ///
    /// Re-triggering while an effect is active overwrites it and
    /// resets the clear deadline (best-effort; no queueing).
    pub fn eyes(&mut self, opts: &EyeOptions, now_ms: u32) -> EyeCommand {
        self.eyes.trigger(opts, now_ms)
    }

    /// Deadline at which the eyes must be cleared, if an effect is active
    pub fn eyes_deadline(&self) -> Option<u32> {
        self.eyes.clear_deadline()
    }

    /// Clear the active eye effect; apply the returned command
    pub fn clear_eyes(&mut self) -> EyeCommand {
        self.eyes.clear()
    }

    /// Trigger the alert song
    ///
    /// Returns `None` while a previous song's duration is still
    /// running; the guard clears itself once that time elapses.
    pub fn sing(&mut self, now_ms: u32) -> Option<SongRequest> {
        if self.song.try_start(song_total_ms(&ALERT_SONG), now_ms) {
            Some(SongRequest { notes: &ALERT_SONG })
        } else {
            None
        }
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

/// Uniform-ish integer in `min..=max` (modulo bias is irrelevant at
/// these ranges)
fn rand_range<R: RngCore>(rng: &mut R, min: u32, max: u32) -> u32 {
    min + rng.next_u32() % (max - min + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{Phase, StepAction};
    use crate::traits::WheelMotion;

    /// Deterministic RNG for tests (SplitMix64)
    struct TestRng(u64);

    impl RngCore for TestRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0 = self.0.wrapping_add(0x9E3779B97F4A7C15);
            let mut z = self.0;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
            z ^ (z >> 31)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    fn started(outcome: StepOutcome) -> StepAction {
        match outcome {
            StepOutcome::Started(action) => action,
            other => panic!("expected Started, got {other:?}"),
        }
    }

    #[test]
    fn test_obstacle_left_enqueues_reverse_then_clockwise_turn() {
        let mut pilot = Pilot::default();
        let response = pilot.obstacle(Side::Left, 0);

        assert!(response.halt.is_stopped());
        assert!(response.song.is_some());

        // First reactive move: fixed 1000ms reverse
        let action = started(response.step);
        assert_eq!(action.command, DriveCommand::backward());
        assert_eq!(action.duration_ms, 1000);

        // Second: +45 degree (clockwise) turn
        let action = started(pilot.engine_mut().move_complete(action.generation));
        assert_eq!(action.command.left, WheelMotion::Forward);
        assert_eq!(action.command.right, WheelMotion::Backward);
        assert_eq!(action.duration_ms, 285);

        // Then the queue drains out
        assert_eq!(
            pilot.engine_mut().move_complete(action.generation),
            StepOutcome::Drained
        );
    }

    #[test]
    fn test_obstacle_right_turns_counter_clockwise() {
        let mut pilot = Pilot::default();
        let response = pilot.obstacle(Side::Right, 0);

        let action = started(response.step);
        let action = started(pilot.engine_mut().move_complete(action.generation));
        assert_eq!(action.command.left, WheelMotion::Backward);
        assert_eq!(action.command.right, WheelMotion::Forward);
    }

    #[test]
    fn test_obstacle_preserves_prior_plan_behind_reaction() {
        let mut pilot = Pilot::default();
        pilot
            .engine_mut()
            .enqueue(Move::forward(700).unwrap())
            .enqueue(Move::forward(800).unwrap());
        pilot.engine_mut().think();

        let response = pilot.obstacle(Side::Left, 0);

        // Reverse, turn, then the two remembered forwards
        let a1 = started(response.step);
        assert_eq!(a1.duration_ms, 1000);
        let a2 = started(pilot.engine_mut().move_complete(a1.generation));
        assert_eq!(a2.duration_ms, 285);
        let a3 = started(pilot.engine_mut().move_complete(a2.generation));
        assert_eq!(a3.duration_ms, 700);
        let a4 = started(pilot.engine_mut().move_complete(a3.generation));
        assert_eq!(a4.duration_ms, 800);
        assert_eq!(
            pilot.engine_mut().move_complete(a4.generation),
            StepOutcome::Drained
        );
        assert_eq!(pilot.engine().phase(), Phase::Idle);
    }

    #[test]
    fn test_obstacle_requeues_interrupted_move() {
        let mut pilot = Pilot::default();
        pilot.engine_mut().enqueue(Move::forward(700).unwrap());
        let action = started(pilot.engine_mut().go_now());

        // Strike mid-move: the interrupted move is re-queued for full
        // re-execution behind the reaction
        let response = pilot.obstacle(Side::Right, 0);

        // The old move's timer is stale now
        assert_eq!(
            pilot.engine_mut().move_complete(action.generation),
            StepOutcome::Idle
        );

        let a1 = started(response.step);
        assert_eq!(a1.command, DriveCommand::backward());
        let a2 = started(pilot.engine_mut().move_complete(a1.generation));
        assert_eq!(a2.duration_ms, 285);
        let a3 = started(pilot.engine_mut().move_complete(a2.generation));
        assert_eq!(a3.duration_ms, 700);
    }

    #[test]
    fn test_sing_guard() {
        let mut pilot = Pilot::default();
        let total = song_total_ms(&ALERT_SONG);

        assert!(pilot.sing(0).is_some());
        // Within the song duration: ignored
        assert!(pilot.sing(total / 2).is_none());
        // After it elapses: triggers again
        assert!(pilot.sing(total).is_some());
    }

    #[test]
    fn test_dance_zero_enqueues_nothing() {
        let mut pilot = Pilot::default();
        let mut rng = TestRng(7);
        pilot.dance(Some(0), &mut rng);
        assert_eq!(pilot.engine().pending_len(), 0);
    }

    #[test]
    fn test_dance_count_and_kinds() {
        let mut pilot = Pilot::default();
        let mut rng = TestRng(42);
        pilot.dance(Some(5), &mut rng);
        assert_eq!(pilot.engine().pending_len(), 5);

        let seen = {
            let engine = pilot.engine_mut();
            engine.think();
            let mut kinds = heapless::Vec::<MoveKind, 8>::new();
            let mut outcome = engine.step();
            while let StepOutcome::Started(action) = outcome {
                let mv = engine.current().unwrap();
                kinds.push(mv.kind()).unwrap();
                outcome = engine.move_complete(action.generation);
            }
            kinds
        };
        for kind in seen.iter() {
            match kind {
                MoveKind::Forward { ms } => assert!(*ms >= 150 && *ms <= 5 * 150),
                MoveKind::Turn { degrees, ms } => {
                    assert!(ms.is_none());
                    assert!((45..=135).contains(&degrees.unsigned_abs()));
                }
                MoveKind::ArcTurn { degrees, ms, .. } => {
                    assert!(ms.is_none());
                    assert!((45..=135).contains(&degrees.unsigned_abs()));
                }
                other => panic!("dance produced {other:?}"),
            }
        }
    }

    #[test]
    fn test_dance_random_count_in_range() {
        for seed in 0..20 {
            let mut pilot = Pilot::default();
            let mut rng = TestRng(seed);
            pilot.dance(None, &mut rng);
            let n = pilot.engine().pending_len();
            assert!((5..=10).contains(&n), "dance length {n} out of range");
        }
    }

    #[test]
    fn test_rand_range_bounds() {
        let mut rng = TestRng(1);
        for _ in 0..200 {
            let v = rand_range(&mut rng, 45, 135);
            assert!((45..=135).contains(&v));
        }
    }
}
