//! Move queue engine
//!
//! Holds the pending move queue, the in-flight move, and a remembered
//! plan set aside during an interruption. The engine decides what runs
//! next and for how long; the owning task applies the resulting wheel
//! commands and arms a timer for each started move.
//!
//! Every started move carries a generation token. A timer completion
//! whose generation no longer matches is a no-op, so a plan change
//! (obstacle reflex, restart) cleanly invalidates in-flight timers
//! without any cancellation primitive.

use heapless::{Deque, Vec};

use crate::config::Calibration;
use crate::traits::{Side, WheelMotion};

use super::moves::{DriveCommand, Move, MoveKind};

/// Maximum queued moves
pub const MAX_MOVES: usize = 32;

/// Engine drive phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Not draining; the queue only changes under external control
    #[default]
    Idle,
    /// Actively draining the queue via timer continuations
    Draining,
}

/// A started move: the command to apply and the timer to arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepAction {
    /// Wheel setpoints for this move
    pub command: DriveCommand,
    /// Delay before calling [`Engine::move_complete`], in milliseconds
    pub duration_ms: u32,
    /// Issue a hard stop before continuing the drain (arc turns shed
    /// single-side momentum before the next move starts)
    pub brake_at_end: bool,
    /// Generation token to pass back to [`Engine::move_complete`]
    pub generation: u32,
}

/// Result of a drain step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// A move was dequeued and started
    Started(StepAction),
    /// The queue is empty; the engine went idle and the caller must
    /// issue a hard stop
    Drained,
    /// Nothing to do (not draining, or a stale timer completion)
    Idle,
}

/// Move queue engine
///
/// All queue state is mutated only through these methods; the owning
/// task is the single writer.
#[derive(Debug)]
pub struct Engine {
    /// Queued moves, FIFO
    pending: Deque<Move, MAX_MOVES>,
    /// Plan set aside by [`Engine::remember`]
    remembered: Vec<Move, MAX_MOVES>,
    /// The in-flight move, if any
    current: Option<Move>,
    /// Drive phase
    phase: Phase,
    /// Generation of the most recently started move
    generation: u32,
    /// Drive timing calibration
    calibration: Calibration,
}

impl Engine {
    /// Create an idle engine
    pub fn new(calibration: Calibration) -> Self {
        Self {
            pending: Deque::new(),
            remembered: Vec::new(),
            current: None,
            phase: Phase::Idle,
            generation: 0,
            calibration,
        }
    }

    /// Get the current drive phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while the engine is actively draining the queue
    pub fn is_draining(&self) -> bool {
        self.phase == Phase::Draining
    }

    /// Number of queued moves
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of remembered moves
    pub fn remembered_len(&self) -> usize {
        self.remembered.len()
    }

    /// The in-flight move, if any
    pub fn current(&self) -> Option<&Move> {
        self.current.as_ref()
    }

    /// The drive calibration in use
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Append a move to the tail of the queue
    ///
    /// Has no effect on execution; draining starts only via
    /// [`Engine::think`]/[`Engine::go_now`]. A full queue drops the
    /// move (capacity far exceeds any composed behavior).
    pub fn enqueue(&mut self, mv: Move) -> &mut Self {
        let _ = self.pending.push_back(mv);
        self
    }

    /// Snapshot the pending plan so an interruption can take over
    ///
    /// The remembered plan is replaced by the entire pending queue and
    /// the queue is cleared. [`Engine::think`] restores it behind any
    /// newly enqueued moves.
    pub fn remember(&mut self) -> &mut Self {
        self.remembered.clear();
        for mv in self.pending.iter() {
            let _ = self.remembered.push(*mv);
        }
        self.pending.clear();
        self
    }

    /// Drop both the pending queue and the remembered plan
    pub fn forget(&mut self) -> &mut Self {
        self.pending.clear();
        self.remembered.clear();
        self
    }

    /// Drop all plans, cancel the in-flight move, and go idle
    ///
    /// Unlike [`Engine::forget`], this also discards the in-flight
    /// move and invalidates its timer. The caller must issue the hard
    /// stop.
    pub fn halt(&mut self) {
        self.pending.clear();
        self.remembered.clear();
        self.current = None;
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Idle;
    }

    /// Enter draining mode
    ///
    /// An in-flight move is re-queued (appended, for full
    /// re-execution) and its timer invalidated; a remembered plan is
    /// restored behind whatever is already queued.
    pub fn think(&mut self) -> &mut Self {
        self.phase = Phase::Draining;
        // Any in-flight timer is now stale; the drain restarts explicitly.
        self.generation = self.generation.wrapping_add(1);
        if let Some(mv) = self.current.take() {
            let _ = self.pending.push_back(mv);
        }
        if !self.remembered.is_empty() {
            for mv in self.remembered.iter() {
                let _ = self.pending.push_back(*mv);
            }
            self.remembered.clear();
        }
        self
    }

    /// [`Engine::think`] followed by one [`Engine::step`]
    pub fn go_now(&mut self) -> StepOutcome {
        self.think();
        self.step()
    }

    /// Dequeue and start the next move
    ///
    /// When the queue is empty the engine goes idle and the caller
    /// must issue a hard stop. The last move runs to completion: the
    /// stop is issued on its timer completion, not at dequeue time.
    pub fn step(&mut self) -> StepOutcome {
        if self.phase != Phase::Draining {
            return StepOutcome::Idle;
        }
        match self.pending.pop_front() {
            Some(mv) => {
                let (command, duration_ms, brake_at_end) = self.plan(&mv);
                self.current = Some(mv);
                self.generation = self.generation.wrapping_add(1);
                StepOutcome::Started(StepAction {
                    command,
                    duration_ms,
                    brake_at_end,
                    generation: self.generation,
                })
            }
            None => {
                self.current = None;
                self.phase = Phase::Idle;
                StepOutcome::Drained
            }
        }
    }

    /// Timer continuation for a started move
    ///
    /// Stale generations are ignored, so timers armed before a plan
    /// change cannot interleave with the new plan.
    pub fn move_complete(&mut self, generation: u32) -> StepOutcome {
        if generation != self.generation {
            return StepOutcome::Idle;
        }
        self.current = None;
        self.step()
    }

    /// Compute the command, duration, and brake flag for a move
    fn plan(&self, mv: &Move) -> (DriveCommand, u32, bool) {
        match mv.kind {
            MoveKind::Forward { ms } => (DriveCommand::forward(), ms, false),
            MoveKind::Backward { ms } => (DriveCommand::backward(), ms, false),
            MoveKind::Turn { degrees, ms } => {
                let duration =
                    ms.unwrap_or_else(|| scaled_turn_ms(self.calibration.turn_ms_per_90, degrees));
                let command = if degrees > 0 {
                    DriveCommand {
                        left: WheelMotion::Forward,
                        right: WheelMotion::Backward,
                    }
                } else {
                    DriveCommand {
                        left: WheelMotion::Backward,
                        right: WheelMotion::Forward,
                    }
                };
                (command, duration, false)
            }
            MoveKind::ArcTurn { side, degrees, ms } => {
                let duration =
                    ms.unwrap_or_else(|| scaled_turn_ms(self.calibration.arc_ms_per_90, degrees));
                let motion = if degrees > 0 {
                    WheelMotion::Forward
                } else {
                    WheelMotion::Backward
                };
                let command = match side {
                    Side::Left => DriveCommand {
                        left: motion,
                        right: WheelMotion::Center,
                    },
                    Side::Right => DriveCommand {
                        left: WheelMotion::Center,
                        right: motion,
                    },
                };
                (command, duration, true)
            }
            MoveKind::Stop => (
                DriveCommand::stopped(),
                self.calibration.min_move_ms,
                false,
            ),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

/// Scale a per-90-degree calibration time to an angle, rounding up
fn scaled_turn_ms(per_90_ms: u32, degrees: i16) -> u32 {
    let deg = degrees.unsigned_abs() as u32;
    (per_90_ms * deg).div_ceil(90)
}
