//! Encore command-line front end
//!
//! The application root: loads configuration, owns the backend client and
//! (for `play`) a playback session over a simulated audio clock.

pub mod commands;
pub mod config;
pub mod simulated;

pub use config::{AppConfig, ConfigError, PlaybackSettings};
pub use simulated::SimulatedBackend;
