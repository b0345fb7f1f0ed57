//! Workspace facade crate.
//!
//! Host applications can depend on `stream-player-workspace` with the
//! default `desktop-shims` feature and get the playback controller stack
//! wired for desktop targets, instead of depending on each workspace
//! crate individually.
//!
//! ## Crates
//!
//! - `bridge-traits` - Boundary contracts: streaming engine, HTTP, clock.
//! - `bridge-desktop` - Desktop implementations (reqwest HTTP client).
//! - `core-auth` - Scope-aware access token cache.
//! - `core-runtime` - Configuration, logging, event fan-out.
//! - `core-playback` - The playback controller and position tracking.

#[cfg(feature = "desktop-shims")]
pub use core_playback::{self as playback, PlayerController};
#[cfg(feature = "desktop-shims")]
pub use core_runtime::{self as runtime, config::PlayerConfig};
