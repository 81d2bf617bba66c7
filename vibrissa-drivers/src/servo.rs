//! Continuous-rotation servo driver
//!
//! Maps wheel motion setpoints to servo pulse widths. A continuous
//! servo interprets the pulse as a speed: the center pulse holds
//! still, full throw either way runs at full speed. The right-hand
//! servo is mounted mirrored, so it carries an `inverted` flag that
//! swaps the throw direction.
//!
//! ```ignore
//! let mut servo = ContinuousServo::new(ContinuousServoConfig::default());
//! servo.drive_forward_max();
//! pwm_config.compare_a = servo.pulse_us();
//! ```

use vibrissa_core::traits::{WheelDriver, WheelMotion};

/// Continuous servo configuration
#[derive(Debug, Clone, Copy)]
pub struct ContinuousServoConfig {
    /// Pulse width that holds the servo still, µs
    pub center_us: u16,
    /// Pulse offset for full speed, µs
    pub throw_us: u16,
    /// Swap the throw direction (mirror-mounted servo)
    pub inverted: bool,
}

impl Default for ContinuousServoConfig {
    fn default() -> Self {
        Self {
            center_us: 1500,
            throw_us: 500,
            inverted: false,
        }
    }
}

/// Continuous-rotation servo state
#[derive(Debug)]
pub struct ContinuousServo {
    config: ContinuousServoConfig,
    motion: WheelMotion,
}

impl ContinuousServo {
    /// Create a stopped servo
    pub fn new(config: ContinuousServoConfig) -> Self {
        Self {
            config,
            motion: WheelMotion::Center,
        }
    }

    /// The commanded motion
    pub fn motion(&self) -> WheelMotion {
        self.motion
    }

    /// Pulse width to apply for the commanded motion, µs
    pub fn pulse_us(&self) -> u16 {
        let throw = self.config.throw_us as i32;
        let offset = match self.motion {
            WheelMotion::Center => 0,
            WheelMotion::Forward => throw,
            WheelMotion::Backward => -throw,
        };
        let offset = if self.config.inverted { -offset } else { offset };
        (self.config.center_us as i32 + offset) as u16
    }
}

impl WheelDriver for ContinuousServo {
    fn drive_forward_max(&mut self) {
        self.motion = WheelMotion::Forward;
    }

    fn drive_backward_max(&mut self) {
        self.motion = WheelMotion::Backward;
    }

    fn hold_center(&mut self) {
        self.motion = WheelMotion::Center;
    }
}
