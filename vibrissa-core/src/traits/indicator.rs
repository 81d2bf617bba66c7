//! Indicator (eye LED) driver trait

/// What an indicator output should be doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorAction {
    /// Steady on
    On,
    /// Off
    #[default]
    Off,
    /// Toggle at a fixed rate
    Blink {
        /// Half-period of the blink in milliseconds
        rate_ms: u32,
    },
}

/// Trait for a single indicator output
pub trait IndicatorDriver {
    /// Turn the indicator on
    fn turn_on(&mut self);

    /// Turn the indicator off
    fn turn_off(&mut self);

    /// Blink at the given rate (half-period in ms)
    fn blink(&mut self, rate_ms: u32);

    /// Apply an action
    fn apply(&mut self, action: IndicatorAction) {
        match action {
            IndicatorAction::On => self.turn_on(),
            IndicatorAction::Off => self.turn_off(),
            IndicatorAction::Blink { rate_ms } => self.blink(rate_ms),
        }
    }
}
