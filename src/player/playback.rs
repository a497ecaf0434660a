use std::sync::Arc;
use std::time::Duration;

use crate::core::Diagnostics;
use crate::player::source::PlayableSource;

/// Lifecycle of the currently mounted item. There is exactly one phase per
/// index; adopting a new source always starts the machine over, so the phase
/// never describes anything but the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Loading,
    Playing,
    Paused,
    /// The platform refused autoplay; waiting for a manual start.
    Blocked,
}

impl PlaybackPhase {
    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackPhase::Playing)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, PlaybackPhase::Loading)
    }

    /// Whether the shell should render the tap-to-play affordance.
    pub fn needs_manual_start(self) -> bool {
        matches!(self, PlaybackPhase::Blocked)
    }

    pub fn display_text(self) -> &'static str {
        match self {
            PlaybackPhase::Idle => "Nothing to play",
            PlaybackPhase::Loading => "Loading...",
            PlaybackPhase::Playing => "Playing",
            PlaybackPhase::Paused => "Paused",
            PlaybackPhase::Blocked => "Tap to play",
        }
    }
}

/// Completion signals from the mounted player. Direct sources report native
/// media-element events; embedded sources report the provider's started and
/// paused callbacks. Every signal carries the generation it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    LoadedMetadata,
    CanPlay,
    Started,
    Paused,
    Ended,
    AutoplayBlocked,
    Error(String),
}

/// The single mounted native element or embedded player instance, supplied
/// by the shell. Calls on it are effects driven by state transitions; the
/// controller never reads playback state back from the surface.
pub trait MediaSurface: Send {
    fn mount(&mut self, source: &PlayableSource, generation: u64);
    fn play(&mut self);
    fn pause(&mut self);
    fn unmount(&mut self);
}

/// Arms the deferred autoplay retry. The holder re-enters the controller
/// through `on_retry_due` with the generation it was armed for.
pub trait RetryTimer: Send {
    fn schedule(&mut self, generation: u64, delay: Duration);
    fn cancel(&mut self);
}

/// What the session should do after a media event has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    None,
    /// Natural end of a direct stream; advance, never loop.
    EndOfStream,
}

/// Owns the play/pause state of the current item and drives the surface
/// through it. Each adoption bumps a generation counter; completions tagged
/// with an older generation are discarded, so a fast run of navigations can
/// never resume a stale source.
pub struct PlaybackController {
    surface: Box<dyn MediaSurface>,
    retry: Box<dyn RetryTimer>,
    diag: Arc<dyn Diagnostics>,
    phase: PlaybackPhase,
    source: Option<PlayableSource>,
    generation: u64,
    retry_used: bool,
    retry_delay: Duration,
}

impl PlaybackController {
    pub fn new(
        surface: Box<dyn MediaSurface>,
        retry: Box<dyn RetryTimer>,
        diag: Arc<dyn Diagnostics>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            surface,
            retry,
            diag,
            phase: PlaybackPhase::Idle,
            source: None,
            generation: 0,
            retry_used: false,
            retry_delay,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> Option<&PlayableSource> {
        self.source.as_ref()
    }

    /// Adopts the source for a new index. Pending retries and in-flight
    /// completions for the previous source are invalidated before the new
    /// mount, so the caller observes the index change and the playback reset
    /// as one step.
    pub fn adopt(&mut self, source: Option<PlayableSource>) {
        self.generation = self.generation.wrapping_add(1);
        self.retry_used = false;
        self.retry.cancel();
        self.surface.unmount();

        match source {
            Some(source) => {
                self.diag.debug(&format!(
                    "Playback: mounting {} (generation {})",
                    source.url(),
                    self.generation
                ));
                self.surface.mount(&source, self.generation);
                self.surface.play();
                self.phase = PlaybackPhase::Loading;
                self.source = Some(source);
            }
            None => {
                self.diag.debug("Playback: no playable source, staying idle");
                self.phase = PlaybackPhase::Idle;
                self.source = None;
            }
        }
    }

    /// Explicit user toggle: surface tap, spacebar, or the play/pause
    /// control. The flip is optimistic; an `AutoplayBlocked` completion
    /// corrects it.
    pub fn toggle(&mut self) {
        match self.phase {
            PlaybackPhase::Playing => {
                self.surface.pause();
                self.phase = PlaybackPhase::Paused;
            }
            PlaybackPhase::Paused | PlaybackPhase::Blocked => {
                self.surface.play();
                self.phase = PlaybackPhase::Playing;
            }
            PlaybackPhase::Loading => {
                self.surface.play();
            }
            PlaybackPhase::Idle => {}
        }
    }

    pub fn request_play(&mut self) {
        if matches!(self.phase, PlaybackPhase::Paused | PlaybackPhase::Blocked) {
            self.surface.play();
            self.phase = PlaybackPhase::Playing;
        }
    }

    pub fn request_pause(&mut self) {
        if self.phase.is_playing() {
            self.surface.pause();
            self.phase = PlaybackPhase::Paused;
        }
    }

    pub fn on_media_event(&mut self, generation: u64, event: MediaEvent) -> EventOutcome {
        if generation != self.generation {
            self.diag.debug(&format!(
                "Playback: discarding stale {:?} (generation {}, current {})",
                event, generation, self.generation
            ));
            return EventOutcome::None;
        }

        match event {
            MediaEvent::LoadedMetadata => {
                // Browsers can report metadata before decoding is actually
                // ready; give direct sources one deferred play nudge.
                let direct = self.source.as_ref().is_some_and(|s| s.is_direct());
                if direct && !self.retry_used && self.phase == PlaybackPhase::Loading {
                    self.retry.schedule(self.generation, self.retry_delay);
                }
            }
            MediaEvent::CanPlay => {
                if self.phase == PlaybackPhase::Loading {
                    self.surface.play();
                }
            }
            MediaEvent::Started => {
                self.phase = PlaybackPhase::Playing;
            }
            MediaEvent::Paused => {
                if self.phase == PlaybackPhase::Playing {
                    self.phase = PlaybackPhase::Paused;
                }
            }
            MediaEvent::AutoplayBlocked => {
                self.diag
                    .info("Playback: autoplay blocked, waiting for user interaction");
                self.phase = PlaybackPhase::Blocked;
            }
            MediaEvent::Ended => {
                self.phase = PlaybackPhase::Paused;
                return EventOutcome::EndOfStream;
            }
            MediaEvent::Error(message) => {
                self.diag.error(&format!("Playback: media error: {}", message));
                self.phase = PlaybackPhase::Paused;
            }
        }

        EventOutcome::None
    }

    /// Fired by the armed retry timer. At most one retry per adoption.
    pub fn on_retry_due(&mut self, generation: u64) {
        if generation != self.generation {
            self.diag.debug("Playback: discarding stale retry");
            return;
        }
        if self.retry_used {
            return;
        }
        self.retry_used = true;
        if self.phase == PlaybackPhase::Loading {
            self.surface.play();
        }
    }

    /// Releases the timer and the surface. Used on close/unmount.
    pub fn shutdown(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.retry.cancel();
        self.surface.unmount();
        self.source = None;
        self.phase = PlaybackPhase::Idle;
    }
}
