use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;

use immersive_player::core::{load_playlist, LogDiagnostics, MediaItem, PlayerConfig};
use immersive_player::input::Key;
use immersive_player::player::{
    DriverCommand, DriverEvent, MediaSurface, PlayableSource, PlayerDriver, SessionParams,
    ShareOutcome, ShareRequest, ShareTarget, SourcePolicy,
};

/// Headless stand-in for the browser's media element: logs the imperative
/// calls the engine makes instead of playing anything.
struct LoggingSurface;

impl MediaSurface for LoggingSurface {
    fn mount(&mut self, source: &PlayableSource, generation: u64) {
        log::info!("surface: mount {} (generation {})", source.url(), generation);
    }

    fn play(&mut self) {
        log::info!("surface: play");
    }

    fn pause(&mut self) {
        log::info!("surface: pause");
    }

    fn unmount(&mut self) {
        log::info!("surface: unmount");
    }
}

struct LoggingShareTarget;

impl ShareTarget for LoggingShareTarget {
    fn native_share_available(&self) -> bool {
        false
    }

    fn native_share(&mut self, _request: &ShareRequest) -> ShareOutcome {
        ShareOutcome::Failed("no native share sheet in the demo shell".to_string())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
        log::info!("clipboard: {}", text);
        Ok(())
    }
}

fn sample_playlist() -> Vec<MediaItem> {
    vec![
        MediaItem {
            id: 1,
            title: "City council meeting highlights".to_string(),
            youtube_url: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
            file: None,
            likes_count: Some(1_500),
            view_count: Some(12_000),
        },
        MediaItem {
            id: 2,
            title: "Monsoon flooding on the riverside".to_string(),
            youtube_url: None,
            file: Some("videos/flooding.mp4".to_string()),
            likes_count: Some(230),
            view_count: Some(4_100),
        },
    ]
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = PlayerConfig::load()?;
    let playlist = match std::env::args().nth(1) {
        Some(path) => load_playlist(Path::new(&path))?,
        None => sample_playlist(),
    };

    let params = SessionParams {
        playlist,
        initial_index: 0,
        policy: SourcePolicy::Any,
        page_url: "https://localhost/videos".to_string(),
    };

    let (driver, mut events) = PlayerDriver::spawn(
        params,
        config,
        Box::new(LoggingSurface),
        Box::new(LoggingShareTarget),
        Arc::new(LogDiagnostics),
    );

    std::thread::spawn(move || {
        while let Ok(event) = events.blocking_recv() {
            match event {
                DriverEvent::StateChanged(snapshot) => println!(
                    "[{}/{}] {} - {} (likes {}, views {})",
                    snapshot.index + 1,
                    snapshot.playlist_len,
                    snapshot.phase.display_text(),
                    snapshot.title,
                    snapshot.like_label,
                    snapshot.view_label,
                ),
                DriverEvent::Notice(_) => println!("Link copied to clipboard!"),
                DriverEvent::Closed => {
                    println!("Player closed.");
                    break;
                }
            }
        }
    });

    println!("Commands: left, right, space, like, share, esc, quit");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match line.trim() {
            "left" => DriverCommand::Key(Key::ArrowLeft),
            "right" => DriverCommand::Key(Key::ArrowRight),
            "space" => DriverCommand::Key(Key::Space),
            "like" => DriverCommand::ToggleLike,
            "share" => DriverCommand::Share,
            "esc" => DriverCommand::Key(Key::Escape),
            "quit" => break,
            "" => continue,
            other => {
                println!("Unknown command: {}", other);
                continue;
            }
        };
        if driver.send(command).is_err() {
            break;
        }
    }

    Ok(())
}
