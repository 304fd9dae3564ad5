//! Process-wide teardown. Kept in its own test binary because the element
//! registry is global to the process.

mod common;

use bridge_traits::media::MediaElement;
use common::{controller_for, ScriptedElement};
use core_playback::{lifecycle, TrackDescriptor};

#[tokio::test(start_paused = true)]
async fn test_shutdown_pauses_only_playing_elements() {
    let playing = ScriptedElement::auto_ready();
    let idle = ScriptedElement::auto_ready();
    let first = controller_for(&playing);
    let second = controller_for(&idle);
    assert_eq!(lifecycle::registered_count(), 2);

    first
        .switch_track(TrackDescriptor::new("w1", "a.mp3"))
        .await
        .unwrap();
    assert!(!playing.is_paused());
    assert!(idle.is_paused());

    assert_eq!(lifecycle::shutdown(), 1);
    assert!(playing.is_paused());
    assert_eq!(idle.count("pause"), 0);
    assert_eq!(lifecycle::shutdown(), 0);

    drop(second);
    drop(idle);
    assert_eq!(lifecycle::registered_count(), 1);
}
