use std::sync::Arc;

use crate::core::{Diagnostics, MediaItem, PlayerConfig};
use crate::input::{Key, KeyAction, SwipeDirection, SwipeTracker};
use crate::player::engagement::{format_count, EngagementStore};
use crate::player::navigation::{NavOutcome, NavigationController};
use crate::player::playback::{
    EventOutcome, MediaEvent, MediaSurface, PlaybackController, PlaybackPhase, RetryTimer,
};
use crate::player::share::{ShareCoordinator, ShareNotice, ShareTarget};
use crate::player::source::{SourcePolicy, SourceResolver};

/// Everything the shell hands over when opening the immersive view. The
/// playlist order is the caller's; the engine never reorders it.
pub struct SessionParams {
    pub playlist: Vec<MediaItem>,
    pub initial_index: usize,
    pub policy: SourcePolicy,
    /// Location the share sheet and the clipboard fallback point at.
    pub page_url: String,
}

/// Rendering snapshot for the shell: chrome, counters, progress dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub index: usize,
    pub playlist_len: usize,
    pub phase: PlaybackPhase,
    pub generation: u64,
    pub title: String,
    pub liked: bool,
    pub like_label: String,
    pub view_label: String,
    /// False means the current item is unplayable and nothing is rendered
    /// for it.
    pub has_source: bool,
    pub closed: bool,
}

/// The immersive player engine. One implementation serves both the video
/// feed (`SourcePolicy::Any`) and the reels feed (`SourcePolicy::FileOnly`);
/// the policy is the only difference between the two surfaces.
pub struct PlayerSession {
    playlist: Vec<MediaItem>,
    policy: SourcePolicy,
    resolver: SourceResolver,
    navigation: NavigationController,
    playback: PlaybackController,
    engagement: EngagementStore,
    share: ShareCoordinator,
    swipe: SwipeTracker,
    swipe_threshold: f32,
    diag: Arc<dyn Diagnostics>,
    on_close: Box<dyn FnMut() + Send>,
    closed: bool,
}

impl PlayerSession {
    pub fn new(
        params: SessionParams,
        config: &PlayerConfig,
        surface: Box<dyn MediaSurface>,
        retry: Box<dyn RetryTimer>,
        share_target: Box<dyn ShareTarget>,
        diag: Arc<dyn Diagnostics>,
        on_close: Box<dyn FnMut() + Send>,
    ) -> Self {
        let resolver = SourceResolver::new(config.media_base_url.as_deref());
        let navigation = NavigationController::new(params.playlist.len(), params.initial_index);
        let playback =
            PlaybackController::new(surface, retry, Arc::clone(&diag), config.retry_delay());
        let share = ShareCoordinator::new(share_target, Arc::clone(&diag), params.page_url);

        let mut session = Self {
            playlist: params.playlist,
            policy: params.policy,
            resolver,
            navigation,
            playback,
            engagement: EngagementStore::new(),
            share,
            swipe: SwipeTracker::new(),
            swipe_threshold: config.swipe_threshold,
            diag,
            on_close,
            closed: false,
        };

        if session.navigation.is_empty() {
            session.diag.info("Session: empty playlist, closing immediately");
            session.close();
        } else {
            session.adopt_current();
        }
        session
    }

    pub fn current_item(&self) -> Option<&MediaItem> {
        self.playlist.get(self.navigation.current())
    }

    pub fn current_index(&self) -> usize {
        self.navigation.current()
    }

    pub fn playlist_len(&self) -> usize {
        self.navigation.len()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.playback.phase()
    }

    pub fn generation(&self) -> u64 {
        self.playback.generation()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Re-resolves the current item and hands the result to playback. An
    /// unresolvable item is "nothing to show", not an error.
    fn adopt_current(&mut self) {
        let source = self
            .current_item()
            .and_then(|item| self.resolver.resolve(item, self.policy));
        if source.is_none() {
            self.diag.warn(&format!(
                "Session: no playable source for item at index {}",
                self.navigation.current()
            ));
        }
        self.playback.adopt(source);
    }

    /// Index change and playback restart are one step from the caller's
    /// view: by the time this returns, completions for the old source are
    /// already invalidated.
    pub fn advance(&mut self) {
        if self.closed {
            return;
        }
        match self.navigation.advance() {
            NavOutcome::Moved(index) => {
                self.diag.debug(&format!("Session: advanced to index {}", index));
                self.adopt_current();
            }
            NavOutcome::CloseRequested => self.close(),
            NavOutcome::Unchanged => {}
        }
    }

    pub fn retreat(&mut self) {
        if self.closed {
            return;
        }
        if let NavOutcome::Moved(index) = self.navigation.retreat() {
            self.diag.debug(&format!("Session: retreated to index {}", index));
            self.adopt_current();
        }
    }

    pub fn goto(&mut self, index: usize) {
        if self.closed {
            return;
        }
        if let NavOutcome::Moved(index) = self.navigation.goto(index) {
            self.diag.debug(&format!("Session: jumped to index {}", index));
            self.adopt_current();
        }
    }

    pub fn toggle_playback(&mut self) {
        if !self.closed {
            self.playback.toggle();
        }
    }

    pub fn request_play(&mut self) {
        if !self.closed {
            self.playback.request_play();
        }
    }

    pub fn request_pause(&mut self) {
        if !self.closed {
            self.playback.request_pause();
        }
    }

    /// Returns true when the shell must suppress the platform default for
    /// the key (space scrolls the page otherwise).
    pub fn on_key(&mut self, key: Key) -> bool {
        if self.closed {
            return false;
        }
        let action = key.action();
        match action {
            KeyAction::Retreat => self.retreat(),
            KeyAction::Advance => self.advance(),
            KeyAction::TogglePlayback => self.toggle_playback(),
            KeyAction::Close => self.close(),
        }
        action.suppresses_default()
    }

    pub fn on_touch_start(&mut self, x: f32) {
        self.swipe.begin(x);
    }

    pub fn on_touch_move(&mut self, x: f32) {
        self.swipe.update(x);
    }

    pub fn on_touch_end(&mut self) {
        if self.closed {
            return;
        }
        match self.swipe.finish(self.swipe_threshold) {
            Some(SwipeDirection::Left) => self.advance(),
            Some(SwipeDirection::Right) => self.retreat(),
            None => {}
        }
    }

    pub fn on_media_event(&mut self, generation: u64, event: MediaEvent) {
        if self.closed {
            return;
        }
        if self.playback.on_media_event(generation, event) == EventOutcome::EndOfStream {
            self.advance();
        }
    }

    pub fn on_retry_due(&mut self, generation: u64) {
        if !self.closed {
            self.playback.on_retry_due(generation);
        }
    }

    pub fn toggle_like_current(&mut self) {
        if self.closed {
            return;
        }
        if let Some(id) = self.current_item().map(|item| item.id) {
            let liked = self.engagement.toggle_like(id);
            self.diag.debug(&format!(
                "Session: like toggled {} for item {}",
                if liked { "on" } else { "off" },
                id
            ));
        }
    }

    pub fn is_liked_current(&self) -> bool {
        self.current_item()
            .map(|item| self.engagement.is_liked(item.id))
            .unwrap_or(false)
    }

    pub fn share_current(&mut self) -> Option<ShareNotice> {
        if self.closed {
            return None;
        }
        let item = self.current_item()?.clone();
        self.share.share(&item)
    }

    /// Closes exactly once; inputs after that are ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.playback.shutdown();
        (self.on_close)();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let item = self.current_item();
        SessionSnapshot {
            index: self.navigation.current(),
            playlist_len: self.navigation.len(),
            phase: self.playback.phase(),
            generation: self.playback.generation(),
            title: item.map(|i| i.title.clone()).unwrap_or_default(),
            liked: item
                .map(|i| self.engagement.is_liked(i.id))
                .unwrap_or(false),
            like_label: format_count(item.and_then(|i| i.likes_count)),
            view_label: format_count(item.and_then(|i| i.view_count)),
            has_source: self.playback.source().is_some(),
            closed: self.closed,
        }
    }
}
