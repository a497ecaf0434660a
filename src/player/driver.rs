use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::broadcast;

use crate::core::{Diagnostics, PlayerConfig};
use crate::input::Key;
use crate::player::playback::{MediaEvent, MediaSurface, RetryTimer};
use crate::player::session::{PlayerSession, SessionParams, SessionSnapshot};
use crate::player::share::{ShareNotice, ShareTarget};

/// Commands the shell sends into the player thread.
#[derive(Debug, Clone)]
pub enum DriverCommand {
    Key(Key),
    TouchStart(f32),
    TouchMove(f32),
    TouchEnd,
    TogglePlayback,
    Advance,
    Retreat,
    Goto(usize),
    ToggleLike,
    Share,
    Close,
    Media { generation: u64, event: MediaEvent },
    Shutdown,
}

/// Updates broadcast to shell observers.
#[derive(Debug, Clone)]
pub enum DriverEvent {
    StateChanged(SessionSnapshot),
    Notice(ShareNotice),
    Closed,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("player thread is gone")]
    Disconnected,
}

/// Retry timer backed by the driver loop itself: `recv_timeout` doubles as
/// the timer tick, so the deferred autoplay retry needs no extra thread.
#[derive(Clone, Default)]
struct LoopRetryTimer {
    pending: Arc<Mutex<Option<(u64, Instant)>>>,
}

impl LoopRetryTimer {
    /// Takes the pending retry if its deadline has passed.
    fn due(&self) -> Option<u64> {
        let mut pending = self.pending.lock().ok()?;
        match *pending {
            Some((generation, at)) if Instant::now() >= at => {
                *pending = None;
                Some(generation)
            }
            _ => None,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.pending.lock().ok().and_then(|pending| *pending).map(|(_, at)| at)
    }
}

impl RetryTimer for LoopRetryTimer {
    fn schedule(&mut self, generation: u64, delay: Duration) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some((generation, Instant::now() + delay));
        }
    }

    fn cancel(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = None;
        }
    }
}

/// Owns the session on a dedicated thread. Commands arrive over a channel,
/// snapshots and notices fan out over a broadcast channel.
pub struct PlayerDriver {
    command_sender: mpsc::Sender<DriverCommand>,
    event_sender: broadcast::Sender<DriverEvent>,
    thread_handle: Option<JoinHandle<()>>,
}

impl PlayerDriver {
    pub fn spawn(
        params: SessionParams,
        config: PlayerConfig,
        surface: Box<dyn MediaSurface>,
        share_target: Box<dyn ShareTarget>,
        diag: Arc<dyn Diagnostics>,
    ) -> (Self, broadcast::Receiver<DriverEvent>) {
        let (command_sender, command_receiver) = mpsc::channel();
        let (event_sender, event_receiver) = broadcast::channel(32);

        let events_for_close = event_sender.clone();
        let events_for_loop = event_sender.clone();
        let timer = LoopRetryTimer::default();
        let loop_timer = timer.clone();

        let thread_handle = thread::spawn(move || {
            let on_close = Box::new(move || {
                let _ = events_for_close.send(DriverEvent::Closed);
            });
            let session = PlayerSession::new(
                params,
                &config,
                surface,
                Box::new(timer),
                share_target,
                diag,
                on_close,
            );
            driver_loop(session, command_receiver, events_for_loop, loop_timer);
        });

        (
            Self {
                command_sender,
                event_sender,
                thread_handle: Some(thread_handle),
            },
            event_receiver,
        )
    }

    pub fn send(&self, command: DriverCommand) -> Result<(), DriverError> {
        self.command_sender
            .send(command)
            .map_err(|_| DriverError::Disconnected)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DriverEvent> {
        self.event_sender.subscribe()
    }
}

impl Drop for PlayerDriver {
    fn drop(&mut self) {
        let _ = self.command_sender.send(DriverCommand::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

fn driver_loop(
    mut session: PlayerSession,
    commands: mpsc::Receiver<DriverCommand>,
    events: broadcast::Sender<DriverEvent>,
    timer: LoopRetryTimer,
) {
    let mut last_snapshot = session.snapshot();
    let _ = events.send(DriverEvent::StateChanged(last_snapshot.clone()));

    while !session.is_closed() {
        let timeout = timer
            .next_deadline()
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::from_millis(50));

        match commands.recv_timeout(timeout) {
            Ok(DriverCommand::Shutdown) => break,
            Ok(command) => apply_command(&mut session, command, &events),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if let Some(generation) = timer.due() {
                    session.on_retry_due(generation);
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                log::debug!("Driver: command channel disconnected, shutting down");
                break;
            }
        }

        let snapshot = session.snapshot();
        if snapshot != last_snapshot {
            last_snapshot = snapshot.clone();
            let _ = events.send(DriverEvent::StateChanged(snapshot));
        }
    }
}

fn apply_command(
    session: &mut PlayerSession,
    command: DriverCommand,
    events: &broadcast::Sender<DriverEvent>,
) {
    match command {
        DriverCommand::Key(key) => {
            session.on_key(key);
        }
        DriverCommand::TouchStart(x) => session.on_touch_start(x),
        DriverCommand::TouchMove(x) => session.on_touch_move(x),
        DriverCommand::TouchEnd => session.on_touch_end(),
        DriverCommand::TogglePlayback => session.toggle_playback(),
        DriverCommand::Advance => session.advance(),
        DriverCommand::Retreat => session.retreat(),
        DriverCommand::Goto(index) => session.goto(index),
        DriverCommand::ToggleLike => session.toggle_like_current(),
        DriverCommand::Share => {
            if let Some(notice) = session.share_current() {
                let _ = events.send(DriverEvent::Notice(notice));
            }
        }
        DriverCommand::Close => session.close(),
        DriverCommand::Media { generation, event } => session.on_media_event(generation, event),
        // Handled by the loop before dispatch.
        DriverCommand::Shutdown => {}
    }
}
