//! Marker traits keeping bridge bounds in one place.
//!
//! Bridge implementations are shared between the caller's task, spawned
//! deferred steps and pollers, so every host object must be `Send + Sync`.

/// Marker trait applying `Send + Sync` to host-provided bridge objects.
pub trait PlatformSendSync: Send + Sync {}

impl<T> PlatformSendSync for T where T: Send + Sync {}
