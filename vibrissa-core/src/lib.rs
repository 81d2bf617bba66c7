//! Board-agnostic core logic for the whisker-bot firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (wheel, indicator, sounder)
//! - Move queue engine (timed drive scheduling and interruption)
//! - Behavior layer (obstacle reflex, dance, eyes, sing)
//! - Calibration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod behavior;
pub mod config;
pub mod scheduler;
pub mod traits;
