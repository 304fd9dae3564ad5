//! # Track Descriptors
//!
//! What a consumer asks the controller to play. Descriptors deserialize from
//! the camelCase objects UI bindings already pass around (`workId`,
//! `workPath`, `startTime`, `endTime`, `loop`). A negative or null offset
//! counts as absent.

use crate::error::{PlaybackError, Result};
use core_runtime::events::TrackIdentity;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// A request to play one audio resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Consumer-chosen identifier.
    #[serde(rename = "workId")]
    pub id: String,

    /// Resource locator handed to the media element.
    #[serde(rename = "workPath")]
    pub path: String,

    /// Where playback starts, in milliseconds.
    #[serde(
        rename = "startTime",
        default,
        deserialize_with = "deserialize_start_offset"
    )]
    pub start_offset_ms: u64,

    /// Where playback stops, in milliseconds. `None` plays to the natural end.
    #[serde(
        rename = "endTime",
        default,
        deserialize_with = "deserialize_end_offset"
    )]
    pub end_offset_ms: Option<u64>,

    /// Restart from the start offset instead of stopping.
    #[serde(rename = "loop", default)]
    pub looping: bool,
}

impl TrackDescriptor {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            start_offset_ms: 0,
            end_offset_ms: None,
            looping: false,
        }
    }

    pub fn with_start_offset(mut self, millis: u64) -> Self {
        self.start_offset_ms = millis;
        self
    }

    pub fn with_end_offset(mut self, millis: u64) -> Self {
        self.end_offset_ms = Some(millis);
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// The `(id, path)` pair that decides whether two requests name the same track.
    pub fn identity(&self) -> TrackIdentity {
        TrackIdentity::new(self.id.clone(), self.path.clone())
    }

    pub fn same_identity(&self, other: &TrackDescriptor) -> bool {
        self.id == other.id && self.path == other.path
    }

    pub fn start_offset(&self) -> Duration {
        Duration::from_millis(self.start_offset_ms)
    }

    pub fn end_offset(&self) -> Option<Duration> {
        self.end_offset_ms.map(Duration::from_millis)
    }

    /// Whether playback of this track needs the end-offset watchdog.
    pub fn needs_watchdog(&self) -> bool {
        self.end_offset_ms.is_some() || self.looping
    }

    /// Reject descriptors the controller cannot act on.
    ///
    /// Offsets are not compared: an end offset at or before the start
    /// offset is accepted and stops the track on the first watchdog poll.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(PlaybackError::InvalidTrack("id must not be empty".into()));
        }

        if self.path.is_empty() {
            return Err(PlaybackError::InvalidTrack(format!(
                "track {} has an empty path",
                self.id
            )));
        }

        Ok(())
    }
}

fn deserialize_start_offset<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_end_offset(deserializer)?.unwrap_or(0))
}

fn deserialize_end_offset<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|millis| millis.is_finite() && *millis >= 0.0)
        .map(|millis| millis as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let track = TrackDescriptor::new("w1", "a.mp3");
        assert_eq!(track.start_offset(), Duration::ZERO);
        assert_eq!(track.end_offset(), None);
        assert!(!track.looping);
        assert!(!track.needs_watchdog());
    }

    #[test]
    fn test_identity_ignores_offsets() {
        let a = TrackDescriptor::new("w1", "a.mp3").with_start_offset(500);
        let b = TrackDescriptor::new("w1", "a.mp3").with_loop(true);
        let c = TrackDescriptor::new("w1", "b.mp3");

        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
        assert_eq!(a.identity(), TrackIdentity::new("w1", "a.mp3"));
    }

    #[test]
    fn test_deserialize_wire_names() {
        let track: TrackDescriptor = serde_json::from_str(
            r#"{"workId":"w1","workPath":"a.mp3","startTime":1000,"endTime":2500,"loop":true}"#,
        )
        .unwrap();

        assert_eq!(track.start_offset_ms, 1000);
        assert_eq!(track.end_offset_ms, Some(2500));
        assert!(track.looping);
        assert!(track.needs_watchdog());
    }

    #[test]
    fn test_deserialize_negative_offsets_as_absent() {
        let track: TrackDescriptor = serde_json::from_str(
            r#"{"workId":"w1","workPath":"a.mp3","startTime":-1,"endTime":-1}"#,
        )
        .unwrap();

        assert_eq!(track.start_offset_ms, 0);
        assert_eq!(track.end_offset_ms, None);
        assert!(!track.looping);
    }

    #[test]
    fn test_deserialize_missing_optional_fields() {
        let track: TrackDescriptor =
            serde_json::from_str(r#"{"workId":"w1","workPath":"a.mp3","endTime":null}"#).unwrap();
        assert_eq!(track, TrackDescriptor::new("w1", "a.mp3"));
    }

    #[test]
    fn test_validate() {
        assert!(TrackDescriptor::new("w1", "a.mp3").validate().is_ok());
        assert!(TrackDescriptor::new("", "a.mp3").validate().is_err());
        assert!(TrackDescriptor::new("w1", "").validate().is_err());

        assert!(matches!(
            TrackDescriptor::new("w1", "").validate(),
            Err(PlaybackError::InvalidTrack(_))
        ));
    }

    #[test]
    fn test_validate_accepts_any_offset_order() {
        let empty_range = TrackDescriptor::new("w1", "a.mp3").with_end_offset(0);
        assert!(empty_range.validate().is_ok());

        let inverted = TrackDescriptor::new("w1", "a.mp3")
            .with_start_offset(2000)
            .with_end_offset(1000);
        assert!(inverted.validate().is_ok());
        assert!(inverted.needs_watchdog());
    }
}
