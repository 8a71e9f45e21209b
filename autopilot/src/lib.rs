//! fuelrush-autopilot - headless driver lab for the fuelrush engine.
//!
//! Plays the role of the presentation/input shell: detects collisions,
//! steers via scripted bots, drives the fixed-step tick loop, and records
//! deterministic tapes for replay and benchmarking.

pub mod benchmark;
pub mod bots;
pub mod collision;
pub mod runner;
pub mod util;
