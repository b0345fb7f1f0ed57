//! # Playback Control Module
//!
//! The control and coordination layer between a caller-facing playback API
//! and the native audio streaming engine.
//!
//! ## Overview
//!
//! This module handles:
//! - The controller lifecycle state machine and error containment around
//!   every engine call
//! - Playback position interpolation between discrete engine reports
//! - Classification of playable identifiers (tracks, albums, playlists, ...)
//! - Scope-aware access token retrieval through `core-auth`'s cache with
//!   engine fallback
//! - Fan-out of the engine's event stream to external listeners

pub mod controller;
pub mod error;
pub mod position;
pub mod uri;

pub use controller::{LifecycleState, PlayerController, VOLUME_MAX_RAW};
pub use error::{ControllerError, Result};
pub use position::{PositionSample, PositionTracker};
pub use uri::{resolve, ContentKind, ResolvedUri};
