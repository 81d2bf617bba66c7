//! Hardware driver logic
//!
//! This crate provides concrete implementations of the traits defined
//! in vibrissa-core for the robot's actuators:
//!
//! - Continuous-rotation servo wheels (pulse width mapping)
//! - Indicator LEDs (blink timing)
//! - Piezo buzzer (note frequencies and song sequencing)
//!
//! Drivers here are pure state machines: commands go in, setpoints
//! come out, and the firmware task applies them to PWM/GPIO.

#![no_std]
#![deny(unsafe_code)]

pub mod indicator;
pub mod piezo;
pub mod servo;
