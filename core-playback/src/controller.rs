//! # Playback Controller
//!
//! The coordination layer between the caller-facing API and the native
//! streaming engine. One controller owns one engine handle for its whole
//! life: it drives the engine's bring-up, pumps its event stream, keeps
//! the position and volume mirrors current, and contains every engine
//! fault at the operation boundary so a failed call never poisons the
//! session.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized -> Initializing -> Ready -> Closing -> Closed
//!                       |
//!                       v
//!                     Failed
//! ```
//!
//! Construction via [`PlayerController::connect`] runs Initializing to
//! completion before returning, so callers never observe a controller
//! that is still coming up. `Failed` is terminal; `Closed` accepts only
//! further `close` calls.

use crate::error::{ControllerError, Result};
use crate::position::PositionTracker;
use crate::uri::{resolve, ContentKind};
use bridge_traits::engine::{EngineEvent, StreamingEngine, TrackMetadata};
use bridge_traits::error::BridgeError;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bridge_traits::Clock;
use core_auth::{AccessToken, ScopeSet, TokenCache};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{PlayerEventBus, Receiver};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Upper bound of the engine's raw volume range.
pub const VOLUME_MAX_RAW: u16 = u16::MAX;

/// Provider endpoint that starts playback on a connect device.
const REMOTE_PLAY_ENDPOINT: &str = "https://api.spotify.com/v1/me/player/play";

/// Scopes requested when the caller asks for a token without naming any.
const DEFAULT_TOKEN_SCOPES: &[&str] = &[
    "streaming",
    "user-read-email",
    "user-read-private",
    "user-read-playback-state",
    "user-modify-playback-state",
];

/// Where the controller is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
    Closing,
    Closed,
    Failed,
}

/// State shared between the controller and its event pump task.
struct Shared {
    state: RwLock<LifecycleState>,
    device_id: RwLock<Option<String>>,
    volume: AtomicU16,
    position: PositionTracker,
    events: PlayerEventBus,
}

impl Shared {
    fn set_state(&self, next: LifecycleState) {
        let mut state = self.state.write();
        debug!(from = ?*state, to = ?next, "Lifecycle transition");
        *state = next;
    }
}

/// Controller for a single engine session.
///
/// All operations take `&self`; the controller is `Send + Sync` and can
/// be shared behind an `Arc` across caller tasks. Playback commands are
/// serialized by the engine itself, not by the controller.
pub struct PlayerController {
    engine: Arc<dyn StreamingEngine>,
    http: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    shared: Arc<Shared>,
    tokens: TokenCache,
    cache_tokens: bool,
    pump: Mutex<Option<JoinHandle<()>>>,
    remote_endpoint: String,
    session_id: Uuid,
}

impl PlayerController {
    /// Bring up the engine and return a Ready controller.
    ///
    /// The engine's event stream is subscribed before `initialize` is
    /// called, so the initialization outcome event cannot be missed. The
    /// future resolves only once the engine reports `PlayerInitialized`
    /// or `InitializationError`.
    ///
    /// # Errors
    ///
    /// `ControllerError::InitializationFailed` when the engine rejects
    /// the configuration, reports an initialization error, or drops its
    /// event stream during bring-up. The failure is terminal for this
    /// controller.
    pub async fn connect(
        engine: Arc<dyn StreamingEngine>,
        config: PlayerConfig,
    ) -> Result<Self> {
        let session_id = Uuid::new_v4();
        info!(%session_id, device_name = %config.device_name, "Starting engine session");

        let shared = Arc::new(Shared {
            state: RwLock::new(LifecycleState::Initializing),
            device_id: RwLock::new(None),
            volume: AtomicU16::new(config.initial_volume.unwrap_or(VOLUME_MAX_RAW / 2)),
            position: PositionTracker::new(config.clock.clone()),
            events: PlayerEventBus::default(),
        });

        // Subscribe before initialize so the outcome event is never lost.
        let engine_events = engine.events();
        let (init_tx, init_rx) = oneshot::channel();
        let pump = tokio::spawn(Self::run_pump(
            shared.clone(),
            engine_events,
            Some(init_tx),
        ));

        let controller = Self {
            engine: engine.clone(),
            http: config.http_client.clone(),
            clock: config.clock.clone(),
            shared,
            tokens: TokenCache::new(),
            cache_tokens: config.cache_tokens,
            pump: Mutex::new(Some(pump)),
            remote_endpoint: REMOTE_PLAY_ENDPOINT.to_string(),
            session_id,
        };

        if let Err(e) = engine.initialize(config.engine_config()).await {
            controller.fail_init(e.to_string());
            return Err(ControllerError::InitializationFailed {
                reason: e.to_string(),
            });
        }

        match init_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => {
                controller.fail_init(reason.clone());
                return Err(ControllerError::InitializationFailed { reason });
            }
            Err(_) => {
                let reason = "engine event stream closed during initialization".to_string();
                controller.fail_init(reason.clone());
                return Err(ControllerError::InitializationFailed { reason });
            }
        }

        *controller.shared.device_id.write() = engine.device_id();
        controller.shared.set_state(LifecycleState::Ready);
        info!(
            %session_id,
            device_id = ?controller.shared.device_id.read().as_deref(),
            "Engine session ready"
        );
        Ok(controller)
    }

    /// Point remote playback requests at a different endpoint. Intended
    /// for hosts fronting the provider API with a proxy.
    pub fn with_remote_endpoint(mut self, url: impl Into<String>) -> Self {
        self.remote_endpoint = url.into();
        self
    }

    fn fail_init(&self, reason: String) {
        error!(session_id = %self.session_id, %reason, "Engine initialization failed");
        self.shared.set_state(LifecycleState::Failed);
        if let Some(handle) = self.take_pump() {
            handle.abort();
        }
    }

    fn take_pump(&self) -> Option<JoinHandle<()>> {
        self.pump.lock().take()
    }

    fn ensure_ready(&self, op: &'static str) -> Result<()> {
        let state = *self.shared.state.read();
        if state == LifecycleState::Ready {
            Ok(())
        } else {
            warn!(session_id = %self.session_id, op, ?state, "Operation rejected by lifecycle state");
            Err(ControllerError::InvalidState { state })
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.shared.state.read()
    }

    /// Device identifier the engine registered with the provider.
    pub fn device_id(&self) -> Option<String> {
        self.shared.device_id.read().clone()
    }

    /// Subscribe to the controller's outward event stream.
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        self.shared.events.subscribe()
    }

    /// Begin or resume playback.
    pub async fn play(&self) -> Result<()> {
        self.ensure_ready("play")?;
        self.engine
            .play()
            .await
            .map_err(|e| ControllerError::operation("play", e))
    }

    /// Pause playback.
    pub async fn pause(&self) -> Result<()> {
        self.ensure_ready("pause")?;
        self.engine
            .pause()
            .await
            .map_err(|e| ControllerError::operation("pause", e))
    }

    /// Seek to an absolute position within the current track.
    pub async fn seek(&self, position_ms: u32) -> Result<()> {
        self.ensure_ready("seek")?;
        self.engine
            .seek(position_ms)
            .await
            .map_err(|e| ControllerError::operation("seek", e))
    }

    /// Set the volume as a percentage. Values outside 0-100 are clamped.
    pub async fn set_volume(&self, percent: f64) -> Result<()> {
        let clamped = percent.clamp(0.0, 100.0);
        let raw = (clamped / 100.0 * f64::from(VOLUME_MAX_RAW)).round() as u16;
        self.set_volume_raw(raw).await
    }

    /// Set the volume on the engine's raw 0-65535 range.
    pub async fn set_volume_raw(&self, raw: u16) -> Result<()> {
        self.ensure_ready("set_volume")?;
        self.engine
            .set_volume(raw)
            .await
            .map_err(|e| ControllerError::operation("set_volume", e))?;
        self.shared.volume.store(raw, Ordering::SeqCst);
        Ok(())
    }

    /// Last known volume as a percentage.
    pub fn volume(&self) -> f64 {
        f64::from(self.volume_raw()) / f64::from(VOLUME_MAX_RAW) * 100.0
    }

    /// Last known volume on the raw 0-65535 range.
    pub fn volume_raw(&self) -> u16 {
        self.shared.volume.load(Ordering::SeqCst)
    }

    /// Current playback position estimate in milliseconds.
    ///
    /// Extrapolated from the engine's last report while playing; zero
    /// before any report and after a track change. Safe to call at any
    /// time, never blocks on in-flight operations.
    pub fn current_position_ms(&self) -> u32 {
        self.shared.position.current_ms().unwrap_or(0)
    }

    /// Fetch an access token covering `scopes`, consulting the cache
    /// first when token caching is enabled. Empty `scopes` requests the
    /// default playback scope set.
    ///
    /// # Errors
    ///
    /// `ControllerError::TokenUnavailable` when the provider declines to
    /// issue a token; `ControllerError::Operation` when the engine call
    /// itself fails.
    pub async fn token(&self, scopes: &[&str]) -> Result<AccessToken> {
        self.ensure_ready("token")?;

        let requested: ScopeSet = if scopes.is_empty() {
            DEFAULT_TOKEN_SCOPES.iter().copied().collect()
        } else {
            scopes.iter().copied().collect()
        };

        if self.cache_tokens {
            if let Some(hit) = self.tokens.lookup(&requested, self.clock.now()) {
                debug!(session_id = %self.session_id, scopes = %requested, "Token cache hit");
                return Ok(hit);
            }
        }

        let engine_token = self
            .engine
            .fetch_token(&requested.to_csv())
            .await
            .map_err(|e| ControllerError::operation("token", e))?
            .ok_or_else(|| ControllerError::TokenUnavailable {
                scopes: requested.to_csv(),
            })?;

        let token = AccessToken::new(
            engine_token.access_token,
            engine_token.token_type,
            ScopeSet::parse_csv(&engine_token.scopes),
            i64::try_from(engine_token.expires_in).unwrap_or(i64::MAX),
            self.clock.now(),
        );

        if self.cache_tokens {
            self.tokens.store(token.clone());
        }
        Ok(token)
    }

    /// Start playback of the given identifiers on this controller's
    /// device through the provider's web API.
    ///
    /// Single-item references (tracks, episodes) accumulate into one
    /// batch; for context references (albums, playlists, artists, shows)
    /// the last one wins. Identifiers that do not classify are skipped
    /// with a warning; when nothing classifies the call is a logged
    /// no-op.
    ///
    /// # Errors
    ///
    /// `ControllerError::RemoteRequest` when the provider rejects the
    /// request; token and transport failures as in [`Self::token`].
    pub async fn load(&self, identifiers: &[String]) -> Result<()> {
        self.ensure_ready("load")?;

        let mut uris: Vec<String> = Vec::new();
        let mut context_uri: Option<String> = None;
        for input in identifiers {
            match resolve(input) {
                Some(resolved) if resolved.kind.is_single_item() => uris.push(resolved.uri),
                Some(resolved) => {
                    if context_uri.is_some() {
                        warn!(
                            session_id = %self.session_id,
                            kind = %resolved.kind,
                            "Multiple context references in one batch; keeping the last"
                        );
                    }
                    context_uri = Some(resolved.uri);
                }
                None => {
                    warn!(session_id = %self.session_id, identifier = %input, "Skipping unresolved identifier");
                }
            }
        }

        if uris.is_empty() && context_uri.is_none() {
            warn!(session_id = %self.session_id, "No playable references in batch; nothing to load");
            return Ok(());
        }
        if !uris.is_empty() && context_uri.is_some() {
            warn!(
                session_id = %self.session_id,
                tracks = uris.len(),
                "Batch mixes single items and a context"
            );
        }

        let device_id = self.device_id().ok_or_else(|| {
            ControllerError::operation(
                "load",
                BridgeError::Unavailable("engine reported no device id".to_string()),
            )
        })?;

        let token = self.token(&[]).await?;

        let mut body = serde_json::Map::new();
        if !uris.is_empty() {
            body.insert("uris".to_string(), serde_json::json!(uris));
        }
        if let Some(context) = context_uri {
            body.insert("context_uri".to_string(), serde_json::json!(context));
        }

        let request = HttpRequest::new(HttpMethod::Put, self.remote_endpoint.as_str())
            .query("device_id", &device_id)
            .bearer_token(token.access_token.as_str())
            .json(&serde_json::Value::Object(body))
            .map_err(|e| ControllerError::operation("load", e))?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ControllerError::operation("load", e))?;

        if !response.is_success() {
            return Err(ControllerError::RemoteRequest {
                status: response.status,
            });
        }
        debug!(session_id = %self.session_id, "Remote playback request accepted");
        Ok(())
    }

    /// Fetch metadata for a track identifier.
    ///
    /// Returns `Ok(None)` when the identifier does not classify as a
    /// track or the provider does not know it.
    pub async fn metadata(&self, identifier: &str) -> Result<Option<TrackMetadata>> {
        self.ensure_ready("metadata")?;

        let resolved = match resolve(identifier) {
            Some(r) if r.kind == ContentKind::Track => r,
            _ => {
                debug!(session_id = %self.session_id, identifier, "Identifier is not a track");
                return Ok(None);
            }
        };

        self.engine
            .fetch_metadata(&resolved.id)
            .await
            .map_err(|e| ControllerError::operation("metadata", e))
    }

    /// Shut the session down.
    ///
    /// The event pump is stopped and waited for before the engine is
    /// closed, so no event (in flight or emitted during teardown)
    /// reaches listeners or the position tracker afterwards. Cached
    /// tokens are dropped with the session. Idempotent: closing an
    /// already-closed controller is a no-op.
    pub async fn close(&self) -> Result<()> {
        {
            let mut state = self.shared.state.write();
            match *state {
                LifecycleState::Closed | LifecycleState::Closing => return Ok(()),
                _ => *state = LifecycleState::Closing,
            }
        }
        info!(session_id = %self.session_id, "Closing engine session");

        // Abort alone is not enough: an iteration already past recv()
        // would still write its position sample. Wait for the task to
        // finish before resetting the tracker.
        if let Some(handle) = self.take_pump() {
            handle.abort();
            let _ = handle.await;
        }
        self.shared.position.reset();
        self.tokens.clear();

        let result = self.engine.close().await;
        self.shared.set_state(LifecycleState::Closed);
        result.map_err(|e| ControllerError::operation("close", e))
    }

    /// Event pump: consumes the engine stream, updates shared state, and
    /// mirrors every event onto the outward bus.
    async fn run_pump(
        shared: Arc<Shared>,
        mut rx: broadcast::Receiver<EngineEvent>,
        mut init_tx: Option<oneshot::Sender<std::result::Result<(), String>>>,
    ) {
        loop {
            match rx.recv().await {
                Ok(event) => Self::handle_event(&shared, event, &mut init_tx),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(missed = n, "Event pump lagged behind the engine stream");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Engine event stream closed");
                    break;
                }
            }
        }
    }

    fn handle_event(
        shared: &Shared,
        event: EngineEvent,
        init_tx: &mut Option<oneshot::Sender<std::result::Result<(), String>>>,
    ) {
        match &event {
            EngineEvent::Loading {
                track_id,
                position_ms,
                ..
            } => {
                shared
                    .position
                    .apply(*position_ms, Some(track_id.clone()), false);
            }
            EngineEvent::Playing {
                track_id,
                position_ms,
                ..
            } => {
                shared
                    .position
                    .apply(*position_ms, Some(track_id.clone()), true);
            }
            EngineEvent::Paused {
                track_id,
                position_ms,
                ..
            } => {
                shared
                    .position
                    .apply(*position_ms, Some(track_id.clone()), false);
            }
            EngineEvent::Seeked {
                track_id,
                position_ms,
                ..
            }
            | EngineEvent::PositionCorrection {
                track_id,
                position_ms,
                ..
            } => {
                // Seeks keep the play/pause state from the last report.
                let playing = shared
                    .position
                    .snapshot()
                    .map(|s| s.playing)
                    .unwrap_or(false);
                shared
                    .position
                    .apply(*position_ms, Some(track_id.clone()), playing);
            }
            EngineEvent::TimeUpdated { position_ms } => {
                shared.position.apply_position_only(*position_ms);
            }
            EngineEvent::TrackChanged { .. } | EngineEvent::Stopped { .. } => {
                shared.position.reset();
            }
            EngineEvent::VolumeChanged { volume } => {
                shared.volume.store(*volume, Ordering::SeqCst);
            }
            EngineEvent::PlayerInitialized => {
                if let Some(tx) = init_tx.take() {
                    let _ = tx.send(Ok(()));
                }
            }
            EngineEvent::InitializationError { message } => {
                if let Some(tx) = init_tx.take() {
                    let _ = tx.send(Err(message.clone()));
                } else {
                    error!(%message, "Engine reported an initialization error after bring-up");
                }
            }
            _ => {}
        }

        shared.events.emit(event);
    }
}

impl std::fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("session_id", &self.session_id)
            .field("state", &self.state())
            .field("device_id", &self.device_id())
            .field("cache_tokens", &self.cache_tokens)
            .finish()
    }
}
