//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod indicator;
pub mod sounder;
pub mod wheel;

pub use indicator::{IndicatorAction, IndicatorDriver};
pub use sounder::{Note, SongNote, Sounder};
pub use wheel::{WheelDriver, WheelMotion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of the robot a wheel, whisker, or eye sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Get the opposite side
    pub const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }
}
