//! PARLAY — combo (accumulator) generator
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod data;
pub mod strategy;
pub mod export;
pub mod dashboard;

pub use strategy::combos::generate_combos;
pub use strategy::probability::{estimate_probability, implied_probability};
