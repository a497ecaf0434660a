#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::core::{MediaItem, PlayerConfig, RecordingDiagnostics};
    use crate::input::Key;
    use crate::player::playback::{MediaEvent, MediaSurface, PlaybackPhase, RetryTimer};
    use crate::player::session::{PlayerSession, SessionParams};
    use crate::player::share::{ShareNotice, ShareOutcome, ShareRequest, ShareTarget};
    use crate::player::source::{PlayableSource, SourcePolicy};

    #[derive(Clone, Default)]
    struct CallLog {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl CallLog {
        fn push(&self, call: impl Into<String>) {
            self.calls.lock().expect("lock poisoned").push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock poisoned").clone()
        }

        fn count(&self, call: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == call).count()
        }
    }

    struct FakeSurface {
        log: CallLog,
    }

    impl MediaSurface for FakeSurface {
        fn mount(&mut self, source: &PlayableSource, generation: u64) {
            self.log.push(format!("mount {} gen{}", source.url(), generation));
        }

        fn play(&mut self) {
            self.log.push("play");
        }

        fn pause(&mut self) {
            self.log.push("pause");
        }

        fn unmount(&mut self) {
            self.log.push("unmount");
        }
    }

    #[derive(Clone, Default)]
    struct FakeTimer {
        armed: Arc<Mutex<Option<u64>>>,
    }

    impl RetryTimer for FakeTimer {
        fn schedule(&mut self, generation: u64, _delay: Duration) {
            *self.armed.lock().expect("lock poisoned") = Some(generation);
        }

        fn cancel(&mut self) {
            *self.armed.lock().expect("lock poisoned") = None;
        }
    }

    struct FakeShareTarget {
        native: bool,
        outcome: ShareOutcome,
    }

    impl ShareTarget for FakeShareTarget {
        fn native_share_available(&self) -> bool {
            self.native
        }

        fn native_share(&mut self, _request: &ShareRequest) -> ShareOutcome {
            self.outcome.clone()
        }

        fn copy_to_clipboard(&mut self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn file_item(id: u64, file: &str) -> MediaItem {
        MediaItem {
            id,
            title: format!("Item {}", id),
            youtube_url: None,
            file: Some(file.to_string()),
            likes_count: Some(1_500),
            view_count: Some(2_000_000),
        }
    }

    fn unplayable_item(id: u64) -> MediaItem {
        MediaItem {
            id,
            title: format!("Item {}", id),
            youtube_url: None,
            file: None,
            likes_count: None,
            view_count: None,
        }
    }

    struct Harness {
        session: PlayerSession,
        surface: CallLog,
        timer: FakeTimer,
        closes: Arc<Mutex<u32>>,
        diag: Arc<RecordingDiagnostics>,
    }

    fn mount(playlist: Vec<MediaItem>, initial_index: usize, policy: SourcePolicy) -> Harness {
        let surface = CallLog::default();
        let timer = FakeTimer::default();
        let closes = Arc::new(Mutex::new(0u32));
        let diag = Arc::new(RecordingDiagnostics::new());

        let close_counter = closes.clone();
        let session = PlayerSession::new(
            SessionParams {
                playlist,
                initial_index,
                policy,
                page_url: "https://example.com/videos".to_string(),
            },
            &PlayerConfig::default(),
            Box::new(FakeSurface { log: surface.clone() }),
            Box::new(timer.clone()),
            Box::new(FakeShareTarget {
                native: false,
                outcome: ShareOutcome::Shared,
            }),
            diag.clone(),
            Box::new(move || {
                *close_counter.lock().expect("lock poisoned") += 1;
            }),
        );

        Harness {
            session,
            surface,
            timer,
            closes,
            diag,
        }
    }

    fn close_count(harness: &Harness) -> u32 {
        *harness.closes.lock().expect("lock poisoned")
    }

    #[test]
    fn test_initial_mount_adopts_and_autoplays() {
        let harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            0,
            SourcePolicy::Any,
        );

        assert_eq!(harness.session.current_index(), 0);
        assert_eq!(harness.session.phase(), PlaybackPhase::Loading);
        assert_eq!(
            harness.surface.calls(),
            vec!["unmount", "mount /media/clips/a.mp4 gen1", "play"]
        );
    }

    #[test]
    fn test_retreat_at_first_item_changes_nothing() {
        let mut harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            0,
            SourcePolicy::Any,
        );

        harness.session.retreat();
        assert_eq!(harness.session.current_index(), 0);
        assert_eq!(close_count(&harness), 0);
    }

    #[test]
    fn test_advance_past_last_item_closes_exactly_once() {
        let mut harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            1,
            SourcePolicy::Any,
        );

        harness.session.advance();
        assert!(harness.session.is_closed());
        assert_eq!(harness.session.current_index(), 1);
        assert_eq!(close_count(&harness), 1);

        // Inputs after close are ignored; the callback never fires again.
        harness.session.advance();
        harness.session.on_key(Key::Escape);
        assert_eq!(close_count(&harness), 1);
    }

    #[test]
    fn test_escape_closes_regardless_of_playback_state() {
        let mut harness = mount(vec![file_item(1, "clips/a.mp4")], 0, SourcePolicy::Any);

        let generation = harness.session.generation();
        harness.session.on_media_event(generation, MediaEvent::AutoplayBlocked);
        assert_eq!(harness.session.phase(), PlaybackPhase::Blocked);

        harness.session.on_key(Key::Escape);
        assert!(harness.session.is_closed());
        assert_eq!(close_count(&harness), 1);
    }

    #[test]
    fn test_space_toggles_and_suppresses_default() {
        let mut harness = mount(vec![file_item(1, "clips/a.mp4")], 0, SourcePolicy::Any);
        let generation = harness.session.generation();
        harness.session.on_media_event(generation, MediaEvent::Started);

        assert!(harness.session.on_key(Key::Space));
        assert_eq!(harness.session.phase(), PlaybackPhase::Paused);

        assert!(harness.session.on_key(Key::Space));
        assert_eq!(harness.session.phase(), PlaybackPhase::Playing);

        assert!(!harness.session.on_key(Key::ArrowLeft));
    }

    #[test]
    fn test_navigation_resets_playback_before_stale_completions_land() {
        let mut harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            0,
            SourcePolicy::Any,
        );

        let old_generation = harness.session.generation();
        harness.session.advance();
        assert_eq!(harness.session.current_index(), 1);
        assert_eq!(harness.session.phase(), PlaybackPhase::Loading);

        // A late "started playing" for the previous item must not flip state.
        harness.session.on_media_event(old_generation, MediaEvent::Started);
        assert_eq!(harness.session.phase(), PlaybackPhase::Loading);
        assert!(harness.diag.contains("stale"));

        let generation = harness.session.generation();
        harness.session.on_media_event(generation, MediaEvent::Started);
        assert_eq!(harness.session.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn test_ended_stream_advances_and_closes_at_end() {
        let mut harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            0,
            SourcePolicy::Any,
        );

        let generation = harness.session.generation();
        harness.session.on_media_event(generation, MediaEvent::Ended);
        assert_eq!(harness.session.current_index(), 1);
        assert_eq!(close_count(&harness), 0);

        let generation = harness.session.generation();
        harness.session.on_media_event(generation, MediaEvent::Ended);
        assert!(harness.session.is_closed());
        assert_eq!(close_count(&harness), 1);
    }

    #[test]
    fn test_media_error_stays_on_item_without_advancing() {
        let mut harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            0,
            SourcePolicy::Any,
        );

        let generation = harness.session.generation();
        harness.session.on_media_event(
            generation,
            MediaEvent::Error("network failure".to_string()),
        );

        assert_eq!(harness.session.current_index(), 0);
        assert_eq!(harness.session.phase(), PlaybackPhase::Paused);
        assert!(harness.diag.contains("media error"));
    }

    #[test]
    fn test_swipe_left_advances_once() {
        let mut harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            0,
            SourcePolicy::Any,
        );

        harness.session.on_touch_start(300.0);
        harness.session.on_touch_move(180.0);
        harness.session.on_touch_end();
        assert_eq!(harness.session.current_index(), 1);

        // The tracker reset with the gesture; a bare touch-end adds nothing.
        harness.session.on_touch_end();
        assert_eq!(harness.session.current_index(), 1);
    }

    #[test]
    fn test_short_drag_does_not_navigate() {
        let mut harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            0,
            SourcePolicy::Any,
        );

        harness.session.on_touch_start(300.0);
        harness.session.on_touch_move(280.0);
        harness.session.on_touch_end();
        assert_eq!(harness.session.current_index(), 0);
    }

    #[test]
    fn test_deferred_retry_respects_navigation() {
        let mut harness = mount(
            vec![file_item(1, "clips/a.mp4"), file_item(2, "clips/b.mp4")],
            0,
            SourcePolicy::Any,
        );

        let generation = harness.session.generation();
        harness.session.on_media_event(generation, MediaEvent::LoadedMetadata);
        assert_eq!(
            *harness.timer.armed.lock().expect("lock poisoned"),
            Some(generation)
        );

        // Navigating away cancels the pending retry for the old source.
        harness.session.advance();
        assert_eq!(*harness.timer.armed.lock().expect("lock poisoned"), None);

        // A stale retry firing anyway must not touch the new source.
        let plays_before = harness.surface.count("play");
        harness.session.on_retry_due(generation);
        assert_eq!(harness.surface.count("play"), plays_before);
    }

    #[test]
    fn test_unplayable_item_renders_nothing() {
        let harness = mount(vec![unplayable_item(1)], 0, SourcePolicy::Any);

        let snapshot = harness.session.snapshot();
        assert!(!snapshot.has_source);
        assert_eq!(snapshot.phase, PlaybackPhase::Idle);
        assert!(harness.diag.contains("no playable source"));
    }

    #[test]
    fn test_file_only_policy_skips_provider_reference() {
        let item = MediaItem {
            id: 5,
            title: "Reel".to_string(),
            youtube_url: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
            file: Some("reels/r.mp4".to_string()),
            likes_count: None,
            view_count: None,
        };
        let harness = mount(vec![item], 0, SourcePolicy::FileOnly);

        assert_eq!(
            harness.surface.calls(),
            vec!["unmount", "mount /media/reels/r.mp4 gen1", "play"]
        );
    }

    #[test]
    fn test_like_toggle_round_trips_through_session() {
        let mut harness = mount(vec![file_item(1, "clips/a.mp4")], 0, SourcePolicy::Any);

        assert!(!harness.session.is_liked_current());
        harness.session.toggle_like_current();
        assert!(harness.session.is_liked_current());
        harness.session.toggle_like_current();
        assert!(!harness.session.is_liked_current());
    }

    #[test]
    fn test_share_fallback_surfaces_copy_notice() {
        let mut harness = mount(vec![file_item(1, "clips/a.mp4")], 0, SourcePolicy::Any);
        assert_eq!(harness.session.share_current(), Some(ShareNotice::LinkCopied));
    }

    #[test]
    fn test_snapshot_formats_counters() {
        let harness = mount(vec![file_item(1, "clips/a.mp4")], 0, SourcePolicy::Any);

        let snapshot = harness.session.snapshot();
        assert_eq!(snapshot.like_label, "1.5K");
        assert_eq!(snapshot.view_label, "2M");
        assert_eq!(snapshot.playlist_len, 1);
        assert_eq!(snapshot.title, "Item 1");
    }

    #[test]
    fn test_empty_playlist_closes_immediately() {
        let harness = mount(Vec::new(), 0, SourcePolicy::Any);
        assert!(harness.session.is_closed());
        assert_eq!(close_count(&harness), 1);
    }
}
