use std::sync::Mutex;

/// Diagnostic sink injected into the playback controllers.
///
/// The engine has no hidden dependency on a global logging channel; every
/// controller reports through one of these, so tests can substitute a
/// recording or no-op implementation.
pub trait Diagnostics: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default implementation, forwards to the `log` facade.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }

    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}

/// Swallows everything.
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Captures messages so tests can assert on what was reported.
#[derive(Default)]
pub struct RecordingDiagnostics {
    entries: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|entry| entry.contains(needle))
    }

    fn push(&self, level: &str, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(format!("{}: {}", level, message));
        }
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn debug(&self, message: &str) {
        self.push("debug", message);
    }

    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}
