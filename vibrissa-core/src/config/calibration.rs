//! Drive calibration data
//!
//! Timed dead-reckoning constants measured on the assembled robot.
//! Turn angles are converted to run times by scaling the measured
//! time-per-90-degrees, so these numbers are surface- and
//! battery-dependent; re-measure after any mechanical change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Drive timing calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    /// Time for a 90-degree pivot turn (both wheels counter-rotating), ms
    pub turn_ms_per_90: u32,
    /// Time for a 90-degree arc turn (single wheel driven), ms
    pub arc_ms_per_90: u32,
    /// Shortest useful move duration, ms
    pub min_move_ms: u32,
    /// Reverse duration used by the obstacle reflex, ms
    pub reverse_ms: u32,
    /// Turn magnitude used by the obstacle reflex, degrees
    pub obstacle_turn_deg: i16,
}

impl Calibration {
    /// Calibration measured on the reference chassis
    pub const fn reference() -> Self {
        Self {
            turn_ms_per_90: 570,
            arc_ms_per_90: 1075,
            min_move_ms: 150,
            reverse_ms: 1000,
            obstacle_turn_deg: 45,
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        let cal = Calibration::default();
        assert_eq!(cal.turn_ms_per_90, 570);
        assert_eq!(cal.arc_ms_per_90, 1075);
        assert_eq!(cal.min_move_ms, 150);
        assert_eq!(cal.reverse_ms, 1000);
        assert_eq!(cal.obstacle_turn_deg, 45);
    }
}
