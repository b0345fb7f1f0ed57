//! # Controller Error Types
//!
//! Every engine fault crossing the controller's public boundary is caught
//! and re-surfaced as one of these kinds, with the original bridge fault
//! attached as the source. Identifier classification failures are *not*
//! errors; they are `None` values callers must check.

use crate::controller::LifecycleState;
use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors surfaced by [`PlayerController`](crate::controller::PlayerController)
/// operations.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// The engine failed to start. Terminal; recorded once at construction.
    #[error("Engine initialization failed: {reason}")]
    InitializationFailed { reason: String },

    /// A state-changing engine call failed. The controller remains Ready.
    #[error("Operation '{op}' failed")]
    Operation {
        op: &'static str,
        #[source]
        source: BridgeError,
    },

    /// Neither the cache nor the engine produced a usable token.
    #[error("No usable access token for scopes: {scopes}")]
    TokenUnavailable { scopes: String },

    /// An operation was invoked outside the Ready state.
    #[error("Operation not permitted in {state:?} state")]
    InvalidState { state: LifecycleState },

    /// The provider's remote playback endpoint rejected the request.
    #[error("Remote playback request failed with status {status}")]
    RemoteRequest { status: u16 },
}

impl ControllerError {
    /// Wrap an engine fault at an operation boundary.
    pub(crate) fn operation(op: &'static str, source: BridgeError) -> Self {
        ControllerError::Operation { op, source }
    }

    /// Whether this error reports a lifecycle-state violation (the
    /// operation never reached the engine).
    pub fn is_state_violation(&self) -> bool {
        matches!(self, ControllerError::InvalidState { .. })
    }
}

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;
