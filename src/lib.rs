//! Kshetra - Arena simulation bridge
//!
//! A small real-time simulator for a differential-drive robot in a 2D arena
//! of box obstacles. It exposes a range-sensor fan, resolves collisions by
//! rolling back the move, scores each command with a shaped reward, and
//! serves it all over HTTP (commands) and WebSocket (state stream).
//!
//! - [`sim`]: Pure simulation core (geometry, sensors, kinematics, reward, episode)
//! - [`gateway`]: axum routes and per-subscriber state stream
//! - [`config`]: TOML configuration

pub mod config;
pub mod error;
pub mod gateway;
pub mod sim;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use sim::Simulator;
