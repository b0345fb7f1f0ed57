//! Streaming engine bridge trait and event stream types.
//!
//! The native streaming engine is a black box: it decodes, mixes, and talks
//! to audio hardware, and it authenticates against the streaming provider.
//! This module defines the async contract the control core uses to drive it,
//! the configuration handed over at initialization, and the closed
//! [`EngineEvent`] union the engine emits on its event stream.
//!
//! Engines signal initialization completion through the event stream
//! ([`EngineEvent::PlayerInitialized`] or
//! [`EngineEvent::InitializationError`]), not through the `initialize`
//! call itself, which only starts the asynchronous bring-up.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::broadcast;

/// Credential kind accepted by the engine at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    /// Plain username/password login.
    UserPass,
    /// A previously stored provider token.
    StoredToken,
}

impl Default for AuthType {
    fn default() -> Self {
        AuthType::UserPass
    }
}

/// Account credentials forwarded to the engine.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub auth_type: AuthType,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            auth_type: AuthType::UserPass,
        }
    }
}

// Credentials never appear in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("auth_type", &self.auth_type)
            .finish()
    }
}

/// Stream quality requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bitrate {
    Kbps96,
    Kbps160,
    Kbps320,
}

impl Default for Bitrate {
    fn default() -> Self {
        Bitrate::Kbps160
    }
}

impl Bitrate {
    /// Wire representation expected by the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bitrate::Kbps96 => "96",
            Bitrate::Kbps160 => "160",
            Bitrate::Kbps320 => "320",
        }
    }
}

/// Device class announced to the provider's connect surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Computer,
    Tablet,
    Smartphone,
    Speaker,
    Tv,
    Avr,
    GameConsole,
    Automobile,
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Computer
    }
}

/// Fully-resolved configuration handed to [`StreamingEngine::initialize`].
///
/// Every field is concrete; defaulting and validation happen in the control
/// core's configuration layer before the engine ever sees this struct.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Account credentials for the provider session.
    pub credentials: Credentials,
    /// Directory for the engine's audio/credential caches, when enabled.
    pub cache_dir: Option<PathBuf>,
    /// Cadence of `TimeUpdated` events in milliseconds.
    pub position_update_interval_ms: u64,
    /// Audio backend name the engine should open (engine-defined).
    pub backend: String,
    /// Whether the engine should play tracks gaplessly.
    pub gapless: bool,
    /// Requested stream quality.
    pub bitrate: Bitrate,
    /// Device name announced to the provider.
    pub device_name: String,
    /// Device class announced to the provider.
    pub device_type: DeviceType,
    /// Initial volume on the raw 0-65535 range, when set.
    pub initial_volume: Option<u16>,
}

/// Access token as the engine reports it, before the control core parses
/// scopes and stamps an issuance time.
#[derive(Clone, Serialize, Deserialize)]
pub struct EngineToken {
    pub access_token: String,
    /// Token type, `"Bearer"` in practice.
    pub token_type: String,
    /// Seconds until expiry, relative to when the engine produced the token.
    pub expires_in: u64,
    /// Comma-separated scopes the token was granted for.
    pub scopes: String,
}

impl std::fmt::Debug for EngineToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Track metadata as returned by the engine's metadata fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Canonical track identifier the metadata belongs to.
    pub track_id: String,
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub duration_ms: Option<u32>,
    /// Provider-specific extras (canvas URL, artwork, ...).
    pub extra: HashMap<String, String>,
}

/// Discrete state-change notification emitted by the engine.
///
/// The union is closed: the control core matches it exhaustively and routes
/// each kind to position tracking, lifecycle transitions, or plain listener
/// fan-out. Field layouts mirror what the engine reports per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EngineEvent {
    Stopped {
        play_request_id: u64,
        track_id: String,
    },
    Loading {
        play_request_id: u64,
        track_id: String,
        position_ms: u32,
    },
    Preloading {
        track_id: String,
    },
    Playing {
        play_request_id: u64,
        track_id: String,
        position_ms: u32,
    },
    Paused {
        play_request_id: u64,
        track_id: String,
        position_ms: u32,
    },
    TimeToPreloadNextTrack {
        play_request_id: u64,
        track_id: String,
    },
    EndOfTrack {
        play_request_id: u64,
        track_id: String,
    },
    Unavailable {
        play_request_id: u64,
        track_id: String,
    },
    VolumeChanged {
        volume: u16,
    },
    PositionCorrection {
        play_request_id: u64,
        track_id: String,
        position_ms: u32,
    },
    Seeked {
        play_request_id: u64,
        track_id: String,
        position_ms: u32,
    },
    FilterExplicitContentChanged {
        filter: bool,
    },
    TrackChanged {
        audio_item: String,
    },
    SessionConnected {
        connection_id: String,
        user_name: String,
    },
    SessionDisconnected {
        connection_id: String,
        user_name: String,
    },
    SessionClientChanged {
        client_id: String,
        client_name: String,
        client_brand_name: String,
        client_model_name: String,
    },
    ShuffleChanged {
        shuffle: bool,
    },
    RepeatChanged {
        repeat: bool,
    },
    AutoPlayChanged {
        auto_play: bool,
    },
    PlayerInitialized,
    TimeUpdated {
        position_ms: u32,
    },
    InitializationError {
        message: String,
    },
}

impl EngineEvent {
    /// Event kind name, for logging and listener filtering.
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::Stopped { .. } => "Stopped",
            EngineEvent::Loading { .. } => "Loading",
            EngineEvent::Preloading { .. } => "Preloading",
            EngineEvent::Playing { .. } => "Playing",
            EngineEvent::Paused { .. } => "Paused",
            EngineEvent::TimeToPreloadNextTrack { .. } => "TimeToPreloadNextTrack",
            EngineEvent::EndOfTrack { .. } => "EndOfTrack",
            EngineEvent::Unavailable { .. } => "Unavailable",
            EngineEvent::VolumeChanged { .. } => "VolumeChanged",
            EngineEvent::PositionCorrection { .. } => "PositionCorrection",
            EngineEvent::Seeked { .. } => "Seeked",
            EngineEvent::FilterExplicitContentChanged { .. } => "FilterExplicitContentChanged",
            EngineEvent::TrackChanged { .. } => "TrackChanged",
            EngineEvent::SessionConnected { .. } => "SessionConnected",
            EngineEvent::SessionDisconnected { .. } => "SessionDisconnected",
            EngineEvent::SessionClientChanged { .. } => "SessionClientChanged",
            EngineEvent::ShuffleChanged { .. } => "ShuffleChanged",
            EngineEvent::RepeatChanged { .. } => "RepeatChanged",
            EngineEvent::AutoPlayChanged { .. } => "AutoPlayChanged",
            EngineEvent::PlayerInitialized => "PlayerInitialized",
            EngineEvent::TimeUpdated { .. } => "TimeUpdated",
            EngineEvent::InitializationError { .. } => "InitializationError",
        }
    }

    /// Whether the event carries a playback position the tracker consumes.
    pub fn is_position_bearing(&self) -> bool {
        matches!(
            self,
            EngineEvent::Loading { .. }
                | EngineEvent::Playing { .. }
                | EngineEvent::Paused { .. }
                | EngineEvent::PositionCorrection { .. }
                | EngineEvent::Seeked { .. }
                | EngineEvent::TimeUpdated { .. }
        )
    }
}

/// Trait for native streaming engine handles.
///
/// One engine handle is exclusively owned by one controller instance. All
/// operations are async and suspend the caller until the engine responds;
/// the engine delivers state changes through the broadcast stream returned
/// by [`StreamingEngine::events`] in emission order.
#[async_trait]
pub trait StreamingEngine: Send + Sync {
    /// Start the engine's asynchronous bring-up with a fully-resolved
    /// configuration. Completion is signalled on the event stream via
    /// `PlayerInitialized` or `InitializationError`.
    async fn initialize(&self, config: EngineConfig) -> Result<()>;

    /// Subscribe to the engine's event stream. Subscribing before
    /// `initialize` guarantees no initialization event is missed.
    fn events(&self) -> broadcast::Receiver<EngineEvent>;

    /// Begin or resume playback of the current context.
    async fn play(&self) -> Result<()>;

    /// Pause playback without releasing the session.
    async fn pause(&self) -> Result<()>;

    /// Seek to an absolute position within the current track.
    async fn seek(&self, position_ms: u32) -> Result<()>;

    /// Set the playback volume on the raw 0-65535 range.
    async fn set_volume(&self, volume: u16) -> Result<()>;

    /// Shut the engine down and release its native resources.
    async fn close(&self) -> Result<()>;

    /// Fetch an access token for the given comma-separated scopes.
    /// Returns `Ok(None)` when the provider declined to issue one.
    async fn fetch_token(&self, scopes_csv: &str) -> Result<Option<EngineToken>>;

    /// Fetch metadata for a canonical track identifier. Returns `Ok(None)`
    /// when the track is unknown to the provider.
    async fn fetch_metadata(&self, track_id: &str) -> Result<Option<TrackMetadata>>;

    /// Device identifier reported by the engine, available once
    /// initialization has completed.
    fn device_id(&self) -> Option<String>;
}
