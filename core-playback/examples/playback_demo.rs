//! # Shared Player Example
//!
//! Two "UI components" share one controller backed by the virtual desktop
//! element: one plays a clipped segment, the other toggles a looping track.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_desktop::{VirtualElementConfig, VirtualMediaElement};
use bridge_traits::media::MediaElement;
use core_async::time::{sleep, Duration};
use core_playback::{lifecycle, PlaybackController, PlayerConfig, TrackDescriptor};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    println!("=== Shared Player Example ===\n");

    let element = Arc::new(VirtualMediaElement::with_config(VirtualElementConfig {
        buffering_latency: Duration::from_millis(200),
        default_duration: Duration::from_secs(10),
    }));
    let handle = element.clone();
    let player = PlaybackController::shared(
        move || handle as Arc<dyn MediaElement>,
        PlayerConfig::default(),
    )?;

    player.on_state_change(|state| println!("  [state] {state}"));
    player.on_track_change(|track| match track {
        Some(track) => println!("  [track] {} ({})", track.id, track.path),
        None => println!("  [track] cleared"),
    });

    let mut events = player.events();
    let feed = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("  [event:{:?}] {}", event.severity(), event.description());
        }
    });

    // Component A: a two second clip starting one second in.
    println!("1. Component A plays a clip (1s..3s)");
    let clip = TrackDescriptor::new("intro", "https://cdn.example.com/works/intro.mp3")
        .with_start_offset(1_000)
        .with_end_offset(3_000);
    player.switch_track(clip).await?;
    sleep(Duration::from_millis(2_500)).await;
    println!("   position after clip: {:?}\n", element.position());

    // Component B: a looping track, toggled by pressing it twice.
    println!("2. Component B starts a looping track");
    let ambience = TrackDescriptor::new("ambience", "https://cdn.example.com/works/rain.mp3")
        .with_loop(true);
    player.switch_track(ambience.clone()).await?;
    sleep(Duration::from_secs(1)).await;

    println!("3. Component B presses again (pause)");
    player.switch_track(ambience.clone()).await?;

    println!("4. Component B presses again (resume)");
    player.switch_track(ambience).await?;
    sleep(Duration::from_millis(500)).await;

    println!("5. Host shuts down");
    let paused = lifecycle::shutdown();
    println!("   paused {paused} element(s)");

    player.clear();
    feed.abort();
    println!("\n=== Example Complete ===");
    Ok(())
}
