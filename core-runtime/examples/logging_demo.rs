//! # Logging Demo
//!
//! Shows the output formats and host sink forwarding used by the player.
//!
//! Run with: `cargo run --example logging_demo --package core-runtime`

use bridge_traits::logging::{ConsoleLogger, LogLevel};
use core_runtime::events::{PlayState, PlayerEvent, TrackIdentity};
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use std::sync::Arc;
use tracing::{debug, info, warn};

fn main() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(Arc::new(ConsoleLogger {
            min_level: LogLevel::Warn,
        }));

    if let Err(err) = init_logging(config) {
        eprintln!("failed to initialise logging: {}", err);
        return;
    }

    let track = TrackIdentity::new("w-1001", "https://cdn.example.com/works/1001.mp3");
    info!(
        target: "core_playback",
        track_id = %track.id,
        path = %strip_path(&track.path),
        "switching track"
    );

    let event = PlayerEvent::StateChanged {
        state: PlayState::Playing,
    };
    debug!(target: "core_playback", event = ?event, "{}", event.description());

    // Only this one reaches the console sink.
    warn!(target: "core_playback", track_id = %track.id, "play attempt rejected by host");
}
