//! # Engine Bridge Traits
//!
//! Boundary contracts between the player control core and its external
//! collaborators.
//!
//! ## Overview
//!
//! The control core never talks to a concrete streaming engine, HTTP stack,
//! or clock directly. Each of those capabilities is expressed as a trait in
//! this crate, and host integrations provide the implementations:
//!
//! - [`StreamingEngine`](engine::StreamingEngine) - The native audio
//!   streaming engine: async playback operations, token/metadata fetches,
//!   and a broadcast stream of [`EngineEvent`](engine::EngineEvent)s.
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations used for the
//!   provider's remote playback endpoint.
//! - [`Clock`](clock::Clock) - Wall-clock and monotonic time source,
//!   injectable for deterministic tests.
//!
//! ## Error Handling
//!
//! All bridge traits report failures through [`BridgeError`](error::BridgeError).
//! Implementations should convert engine- or platform-specific faults into
//! `BridgeError` with an actionable message; the control core classifies
//! them further at its own boundary.
//!
//! ## Thread Safety
//!
//! Every trait requires `Send + Sync` so implementations can be shared
//! across async tasks behind an `Arc`.

pub mod clock;
pub mod engine;
pub mod error;
pub mod http;

pub use error::BridgeError;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use engine::{
    AuthType, Bitrate, Credentials, DeviceType, EngineConfig, EngineEvent, EngineToken,
    StreamingEngine, TrackMetadata,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
