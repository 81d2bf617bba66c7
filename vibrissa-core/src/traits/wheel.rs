//! Wheel driver trait
//!
//! The robot drives on two continuous-rotation servos. Each wheel
//! exposes three primitives: full speed forward, full speed backward,
//! and hold center (stopped). There is no proportional speed control.

/// Motion setpoint for a single wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WheelMotion {
    /// Drive forward at full speed
    Forward,
    /// Drive backward at full speed
    Backward,
    /// Hold the center (neutral) position - wheel stopped
    #[default]
    Center,
}

/// Trait for a single wheel actuator
///
/// Implementations hold the commanded motion as state; the hardware
/// layer reads the resulting setpoint and applies it (e.g. as a servo
/// pulse width).
pub trait WheelDriver {
    /// Drive forward at maximum speed
    fn drive_forward_max(&mut self);

    /// Drive backward at maximum speed
    fn drive_backward_max(&mut self);

    /// Hold the neutral position (stop)
    fn hold_center(&mut self);

    /// Apply a motion setpoint
    fn apply(&mut self, motion: WheelMotion) {
        match motion {
            WheelMotion::Forward => self.drive_forward_max(),
            WheelMotion::Backward => self.drive_backward_max(),
            WheelMotion::Center => self.hold_center(),
        }
    }
}
