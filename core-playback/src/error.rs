//! # Playback Error Types
//!
//! Error types for the playback controller and resource binder.
//!
//! Most of these never escape the controller: expected runtime failures
//! (a source that never becomes ready, a host that refuses to play) are
//! absorbed into the state machine and logged. They surface directly only
//! from the binder, from configuration and from descriptor validation.

use bridge_traits::error::BridgeError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// The element did not report readiness within the allowed time.
    #[error("Resource load timeout after {0:?}")]
    ResourceLoadTimeout(Duration),

    /// A readiness wait was dropped before any signal or timeout.
    #[error("Readiness wait abandoned")]
    WaitAbandoned,

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// The host refused to start playback.
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// The track descriptor is unusable.
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Player configuration failed validation.
    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Error reported by the media element bridge.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Convert a failed `MediaElement::play` into a playback error.
    ///
    /// Host rejections keep their reason; anything else stays wrapped as a
    /// bridge error.
    pub fn from_play_failure(err: BridgeError) -> Self {
        match err {
            BridgeError::PlaybackRejected(reason) => PlaybackError::PlaybackRejected(reason),
            other => PlaybackError::Bridge(other),
        }
    }

    /// Returns `true` if this error is transient and the operation can be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlaybackError::ResourceLoadTimeout(_)
                | PlaybackError::WaitAbandoned
                | PlaybackError::PlaybackRejected(_)
        )
    }

    /// Returns `true` if this error is a readiness timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PlaybackError::ResourceLoadTimeout(_))
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_failure_keeps_rejection_reason() {
        let err = PlaybackError::from_play_failure(BridgeError::PlaybackRejected(
            "autoplay blocked".into(),
        ));
        assert!(matches!(err, PlaybackError::PlaybackRejected(ref r) if r == "autoplay blocked"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_play_failure_wraps_other_bridge_errors() {
        let err = PlaybackError::from_play_failure(BridgeError::NotAvailable("audio".into()));
        assert!(matches!(err, PlaybackError::Bridge(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_timeout_predicate() {
        let err = PlaybackError::ResourceLoadTimeout(Duration::from_secs(30));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Resource load timeout after 30s");
        assert!(!PlaybackError::InvalidTrack("x".into()).is_timeout());
    }
}
