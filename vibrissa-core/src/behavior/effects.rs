//! Timed effect guards
//!
//! The eye and song effects are one-shot and time-bounded. Each guard
//! tracks the deadline of the active effect against caller-supplied
//! millisecond timestamps (the owning task feeds in its clock, as with
//! the scheduler tick elsewhere in this workspace).

use crate::traits::{IndicatorAction, Side};

/// Eye effect style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EyeStyle {
    /// Toggle at the configured rate
    #[default]
    Blink,
    /// Steady on
    On,
    /// Off
    Off,
}

/// Options for a timed eye effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeOptions {
    /// Target eye; `None` drives both
    pub side: Option<Side>,
    /// Effect style
    pub style: EyeStyle,
    /// Blink half-period, ms
    pub rate_ms: u32,
    /// Time until the effect is forcibly cleared, ms
    pub duration_ms: u32,
}

impl Default for EyeOptions {
    fn default() -> Self {
        Self {
            side: None,
            style: EyeStyle::Blink,
            rate_ms: 50,
            duration_ms: 1200,
        }
    }
}

/// Per-eye actions; `None` leaves that eye as it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeCommand {
    /// Left eye action
    pub left: Option<IndicatorAction>,
    /// Right eye action
    pub right: Option<IndicatorAction>,
}

impl EyeCommand {
    /// Turn both eyes off
    pub const fn all_off() -> Self {
        Self {
            left: Some(IndicatorAction::Off),
            right: Some(IndicatorAction::Off),
        }
    }
}

/// Timed eye effect state
///
/// Re-triggering while an effect is active overwrites it and resets
/// the clear deadline; there is no queueing of effects.
#[derive(Debug, Default)]
pub struct EyeEffect {
    clear_at: Option<u32>,
}

impl EyeEffect {
    /// Create with no active effect
    pub const fn new() -> Self {
        Self { clear_at: None }
    }

    /// Start (or restart) an effect; apply the returned command
    pub fn trigger(&mut self, opts: &EyeOptions, now_ms: u32) -> EyeCommand {
        self.clear_at = Some(now_ms.wrapping_add(opts.duration_ms));
        let action = match opts.style {
            EyeStyle::Blink => IndicatorAction::Blink {
                rate_ms: opts.rate_ms,
            },
            EyeStyle::On => IndicatorAction::On,
            EyeStyle::Off => IndicatorAction::Off,
        };
        match opts.side {
            Some(Side::Left) => EyeCommand {
                left: Some(action),
                right: None,
            },
            Some(Side::Right) => EyeCommand {
                left: None,
                right: Some(action),
            },
            None => EyeCommand {
                left: Some(action),
                right: Some(action),
            },
        }
    }

    /// Deadline at which the effect must be cleared
    pub fn clear_deadline(&self) -> Option<u32> {
        self.clear_at
    }

    /// End the effect; apply the returned command
    pub fn clear(&mut self) -> EyeCommand {
        self.clear_at = None;
        EyeCommand::all_off()
    }
}

/// Re-entrancy guard for the song effect
///
/// Overlapping triggers are ignored until the running song's duration
/// elapses.
#[derive(Debug, Default)]
pub struct SongGuard {
    until: Option<u32>,
}

impl SongGuard {
    /// Create with no song playing
    pub const fn new() -> Self {
        Self { until: None }
    }

    /// Try to start a song of the given duration
    ///
    /// Returns false while a previous song is still within its
    /// duration.
    pub fn try_start(&mut self, duration_ms: u32, now_ms: u32) -> bool {
        if let Some(until) = self.until {
            if now_ms < until {
                return false;
            }
        }
        self.until = Some(now_ms.wrapping_add(duration_ms));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_trigger_both_sides_by_default() {
        let mut eyes = EyeEffect::new();
        let cmd = eyes.trigger(&EyeOptions::default(), 0);
        assert_eq!(cmd.left, Some(IndicatorAction::Blink { rate_ms: 50 }));
        assert_eq!(cmd.right, Some(IndicatorAction::Blink { rate_ms: 50 }));
        assert_eq!(eyes.clear_deadline(), Some(1200));
    }

    #[test]
    fn test_eye_trigger_single_side_leaves_other_alone() {
        let mut eyes = EyeEffect::new();
        let cmd = eyes.trigger(
            &EyeOptions {
                side: Some(Side::Right),
                ..EyeOptions::default()
            },
            0,
        );
        assert!(cmd.left.is_none());
        assert!(cmd.right.is_some());
    }

    #[test]
    fn test_eye_retrigger_resets_deadline() {
        let mut eyes = EyeEffect::new();
        eyes.trigger(&EyeOptions::default(), 0);
        eyes.trigger(&EyeOptions::default(), 1000);
        assert_eq!(eyes.clear_deadline(), Some(2200));
    }

    #[test]
    fn test_eye_clear() {
        let mut eyes = EyeEffect::new();
        eyes.trigger(&EyeOptions::default(), 0);
        let cmd = eyes.clear();
        assert_eq!(cmd, EyeCommand::all_off());
        assert!(eyes.clear_deadline().is_none());
    }

    #[test]
    fn test_song_guard_blocks_until_elapsed() {
        let mut guard = SongGuard::new();
        assert!(guard.try_start(3200, 0));
        assert!(!guard.try_start(3200, 100));
        assert!(!guard.try_start(3200, 3199));
        assert!(guard.try_start(3200, 3200));
    }
}
