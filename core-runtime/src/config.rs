//! # Player Configuration
//!
//! Resolves the caller-supplied partial configuration into the
//! fully-concrete settings the engine and controller need.
//!
//! ## Overview
//!
//! The builder validates fail-fast: credentials must be present and every
//! required capability (HTTP client, clock) must be resolvable before a
//! [`PlayerConfig`] is produced. With the `desktop-shims` feature enabled,
//! a desktop-ready HTTP client is injected automatically when none is
//! provided; the clock always defaults to the system clock.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::PlayerConfig;
//! use bridge_traits::engine::{Bitrate, Credentials};
//!
//! let config = PlayerConfig::builder()
//!     .credentials(Credentials::new("alice", "secret"))
//!     .cache_dir("/var/cache/player")
//!     .cache_tokens(true)
//!     .bitrate(Bitrate::Kbps320)
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::clock::{Clock, SystemClock};
use bridge_traits::engine::{Bitrate, Credentials, DeviceType, EngineConfig};
use bridge_traits::http::HttpClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Default cadence of engine `TimeUpdated` events.
pub const DEFAULT_POSITION_UPDATE_INTERVAL_MS: u64 = 500;

/// Default device name announced to the provider.
pub const DEFAULT_DEVICE_NAME: &str = "stream-player";

/// Fully-resolved player configuration.
///
/// Use [`PlayerConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct PlayerConfig {
    /// Account credentials for the engine session.
    pub credentials: Credentials,
    /// Directory for the engine's caches, when enabled.
    pub cache_dir: Option<PathBuf>,
    /// Whether the controller caches access tokens between requests.
    pub cache_tokens: bool,
    /// Cadence of `TimeUpdated` events in milliseconds.
    pub position_update_interval_ms: u64,
    /// Audio backend name; empty lets the engine pick its default.
    pub backend: String,
    /// Gapless playback toggle.
    pub gapless: bool,
    /// Requested stream quality.
    pub bitrate: Bitrate,
    /// Device name announced to the provider.
    pub device_name: String,
    /// Device class announced to the provider.
    pub device_type: DeviceType,
    /// Initial volume on the raw 0-65535 range, when set.
    pub initial_volume: Option<u16>,
    /// HTTP client for the provider's web API.
    pub http_client: Arc<dyn HttpClient>,
    /// Time source for token issuance and position extrapolation.
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("credentials", &self.credentials)
            .field("cache_dir", &self.cache_dir)
            .field("cache_tokens", &self.cache_tokens)
            .field(
                "position_update_interval_ms",
                &self.position_update_interval_ms,
            )
            .field("backend", &self.backend)
            .field("gapless", &self.gapless)
            .field("bitrate", &self.bitrate)
            .field("device_name", &self.device_name)
            .field("device_type", &self.device_type)
            .field("initial_volume", &self.initial_volume)
            .field("http_client", &"HttpClient { ... }")
            .field("clock", &"Clock { ... }")
            .finish()
    }
}

impl PlayerConfig {
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Resolve the engine-facing subset of this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            credentials: self.credentials.clone(),
            cache_dir: self.cache_dir.clone(),
            position_update_interval_ms: self.position_update_interval_ms,
            backend: self.backend.clone(),
            gapless: self.gapless,
            bitrate: self.bitrate,
            device_name: self.device_name.clone(),
            device_type: self.device_type,
            initial_volume: self.initial_volume,
        }
    }
}

/// Builder for [`PlayerConfig`] with fail-fast validation.
#[derive(Default)]
pub struct PlayerConfigBuilder {
    credentials: Option<Credentials>,
    cache_dir: Option<PathBuf>,
    cache_tokens: bool,
    position_update_interval_ms: Option<u64>,
    backend: Option<String>,
    gapless: bool,
    bitrate: Bitrate,
    device_name: Option<String>,
    device_type: DeviceType,
    initial_volume: Option<u16>,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
}

impl PlayerConfigBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Enable controller-side token caching (off by default).
    pub fn cache_tokens(mut self, enabled: bool) -> Self {
        self.cache_tokens = enabled;
        self
    }

    pub fn position_update_interval_ms(mut self, interval: u64) -> Self {
        self.position_update_interval_ms = Some(interval);
        self
    }

    pub fn backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn gapless(mut self, enabled: bool) -> Self {
        self.gapless = enabled;
        self
    }

    pub fn bitrate(mut self, bitrate: Bitrate) -> Self {
        self.bitrate = bitrate;
        self
    }

    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    pub fn device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    /// Initial volume on the raw 0-65535 range.
    pub fn initial_volume(mut self, volume: u16) -> Self {
        self.initial_volume = Some(volume);
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate and produce a [`PlayerConfig`].
    ///
    /// # Errors
    ///
    /// - `Error::Config` when credentials are missing or empty.
    /// - `Error::CapabilityMissing` when no HTTP client is provided and no
    ///   desktop default is available.
    pub fn build(self) -> Result<PlayerConfig> {
        let credentials = self
            .credentials
            .ok_or_else(|| Error::Config("credentials are required".to_string()))?;
        if credentials.username.is_empty() {
            return Err(Error::Config("credentials username is empty".to_string()));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => Self::default_http_client()?,
        };

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock::new()),
        };

        Ok(PlayerConfig {
            credentials,
            cache_dir: self.cache_dir,
            cache_tokens: self.cache_tokens,
            position_update_interval_ms: self
                .position_update_interval_ms
                .unwrap_or(DEFAULT_POSITION_UPDATE_INTERVAL_MS),
            backend: self.backend.unwrap_or_default(),
            gapless: self.gapless,
            bitrate: self.bitrate,
            device_name: self
                .device_name
                .unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_string()),
            device_type: self.device_type,
            initial_volume: self.initial_volume,
            http_client,
            clock,
        })
    }

    #[cfg(feature = "desktop-shims")]
    fn default_http_client() -> Result<Arc<dyn HttpClient>> {
        Ok(Arc::new(bridge_desktop::ReqwestHttpClient::new()))
    }

    #[cfg(not(feature = "desktop-shims"))]
    fn default_http_client() -> Result<Arc<dyn HttpClient>> {
        Err(Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "No HTTP client implementation provided. \
                      Desktop: enable the desktop-shims feature. \
                      Other hosts: inject a platform-native adapter."
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpRequest, HttpResponse};

    struct NullHttpClient;

    #[async_trait]
    impl HttpClient for NullHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse {
                status: 204,
                headers: Default::default(),
                body: Default::default(),
            })
        }
    }

    fn builder_with_required() -> PlayerConfigBuilder {
        PlayerConfig::builder()
            .credentials(Credentials::new("alice", "secret"))
            .http_client(Arc::new(NullHttpClient))
    }

    #[test]
    fn build_applies_defaults() {
        let config = builder_with_required().build().unwrap();

        assert_eq!(
            config.position_update_interval_ms,
            DEFAULT_POSITION_UPDATE_INTERVAL_MS
        );
        assert_eq!(config.device_name, DEFAULT_DEVICE_NAME);
        assert_eq!(config.bitrate, Bitrate::Kbps160);
        assert_eq!(config.device_type, DeviceType::Computer);
        assert!(!config.cache_tokens);
        assert!(config.backend.is_empty());
        assert!(config.initial_volume.is_none());
    }

    #[test]
    fn build_without_credentials_fails() {
        let result = PlayerConfig::builder()
            .http_client(Arc::new(NullHttpClient))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn build_with_empty_username_fails() {
        let result = PlayerConfig::builder()
            .credentials(Credentials::new("", "secret"))
            .http_client(Arc::new(NullHttpClient))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn engine_config_mirrors_player_settings() {
        let config = builder_with_required()
            .cache_dir("/tmp/player-cache")
            .position_update_interval_ms(250)
            .bitrate(Bitrate::Kbps320)
            .device_name("living-room")
            .device_type(DeviceType::Speaker)
            .initial_volume(32768)
            .gapless(true)
            .build()
            .unwrap();

        let engine = config.engine_config();
        assert_eq!(engine.position_update_interval_ms, 250);
        assert_eq!(engine.bitrate, Bitrate::Kbps320);
        assert_eq!(engine.device_name, "living-room");
        assert_eq!(engine.device_type, DeviceType::Speaker);
        assert_eq!(engine.initial_volume, Some(32768));
        assert!(engine.gapless);
        assert_eq!(engine.cache_dir, Some(PathBuf::from("/tmp/player-cache")));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn missing_http_client_is_capability_error() {
        let result = PlayerConfig::builder()
            .credentials(Credentials::new("alice", "secret"))
            .build();
        assert!(matches!(result, Err(Error::CapabilityMissing { .. })));
    }
}
