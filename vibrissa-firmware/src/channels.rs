//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use vibrissa_core::behavior::{EyeCommand, EyeOptions, SongRequest};
use vibrissa_core::scheduler::DriveCommand;
use vibrissa_core::traits::Side;

/// Channel capacity for whisker strike events
const BUMP_CHANNEL_SIZE: usize = 4;

/// Channel capacity for pilot commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for wheel setpoints
const DRIVE_CHANNEL_SIZE: usize = 4;

/// Whisker strike events (which side hit)
pub static BUMP_EVENTS: Channel<CriticalSectionRawMutex, Side, BUMP_CHANNEL_SIZE> = Channel::new();

/// Commands into the pilot - the robot's inbound control surface
pub static PILOT_COMMANDS: Channel<CriticalSectionRawMutex, PilotCommand, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Wheel setpoints, delivered in order (an arc-turn brake must reach
/// the wheels before the next move's command)
pub static DRIVE_COMMANDS: Channel<CriticalSectionRawMutex, DriveCommand, DRIVE_CHANNEL_SIZE> =
    Channel::new();

/// Eye effect commands (latest wins - matches overwrite semantics)
pub static EYES_CMD: Signal<CriticalSectionRawMutex, EyeCommand> = Signal::new();

/// Song start requests (overlap is already filtered by the pilot's guard)
pub static SONG_REQUESTS: Signal<CriticalSectionRawMutex, SongRequest> = Signal::new();

/// Commands accepted by the pilot task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PilotCommand {
    /// Queue random moves without starting the drain
    Dance {
        /// Number of moves; `None` picks 5..=10 at random
        moves: Option<u8>,
    },
    /// Queue random moves and start draining immediately
    DanceNow {
        /// Number of moves; `None` picks 5..=10 at random
        moves: Option<u8>,
    },
    /// Start draining whatever is queued
    Go,
    /// Trigger the alert song
    Sing,
    /// Trigger a timed eye effect
    Eyes(EyeOptions),
    /// Drop all plans and stop the wheels
    Halt,
}
