//! Indicator LED driver
//!
//! Holds the commanded action for one LED and computes the output
//! level from a timestamp. Blink phase is taken from the shared
//! millisecond clock, so both eyes blink in step when given the same
//! rate.

use vibrissa_core::traits::{IndicatorAction, IndicatorDriver};

/// Indicator LED state
#[derive(Debug, Default)]
pub struct Blinker {
    action: IndicatorAction,
}

impl Blinker {
    /// Create an off indicator
    pub const fn new() -> Self {
        Self {
            action: IndicatorAction::Off,
        }
    }

    /// The commanded action
    pub fn action(&self) -> IndicatorAction {
        self.action
    }

    /// Output level at a timestamp (true = lit)
    pub fn level_at(&self, now_ms: u32) -> bool {
        match self.action {
            IndicatorAction::On => true,
            IndicatorAction::Off => false,
            IndicatorAction::Blink { rate_ms } => {
                if rate_ms == 0 {
                    true
                } else {
                    (now_ms / rate_ms) % 2 == 0
                }
            }
        }
    }

    /// Milliseconds until the next level change, if blinking
    pub fn next_toggle_in(&self, now_ms: u32) -> Option<u32> {
        match self.action {
            IndicatorAction::Blink { rate_ms } if rate_ms > 0 => {
                Some(rate_ms - (now_ms % rate_ms))
            }
            _ => None,
        }
    }
}

impl IndicatorDriver for Blinker {
    fn turn_on(&mut self) {
        self.action = IndicatorAction::On;
    }

    fn turn_off(&mut self) {
        self.action = IndicatorAction::Off;
    }

    fn blink(&mut self, rate_ms: u32) {
        self.action = IndicatorAction::Blink { rate_ms };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_levels() {
        let mut led = Blinker::new();
        assert!(!led.level_at(0));

        led.turn_on();
        assert!(led.level_at(0));
        assert!(led.level_at(12345));

        led.turn_off();
        assert!(!led.level_at(12345));
    }

    #[test]
    fn test_blink_toggles_at_rate() {
        let mut led = Blinker::new();
        led.blink(50);

        assert!(led.level_at(0));
        assert!(led.level_at(49));
        assert!(!led.level_at(50));
        assert!(!led.level_at(99));
        assert!(led.level_at(100));
    }

    #[test]
    fn test_next_toggle() {
        let mut led = Blinker::new();
        assert!(led.next_toggle_in(0).is_none());

        led.blink(50);
        assert_eq!(led.next_toggle_in(0), Some(50));
        assert_eq!(led.next_toggle_in(30), Some(20));
        assert_eq!(led.next_toggle_in(99), Some(1));
    }

    #[test]
    fn test_apply_action() {
        let mut led = Blinker::new();
        led.apply(IndicatorAction::Blink { rate_ms: 100 });
        assert_eq!(led.action(), IndicatorAction::Blink { rate_ms: 100 });
    }
}
