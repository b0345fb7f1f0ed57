//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the player control core:
//! - Logging and tracing infrastructure
//! - Player configuration resolution and validation
//! - Event fan-out to external listeners
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the playback core depends on.
//! It establishes the logging conventions, the fail-fast configuration
//! builder (with desktop defaults behind the `desktop-shims` feature), and
//! the broadcast bus that re-publishes engine events to host listeners.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{PlayerConfig, PlayerConfigBuilder};
pub use error::{Error, Result};
pub use events::PlayerEventBus;
