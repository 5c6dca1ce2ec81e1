//! Activity log: the one line every action reports back to the user

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// How an outcome should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
            Severity::Error => "ERROR",
        }
    }
}

/// Result of a file operation as reported to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub severity: Severity,
}

impl Outcome {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Sink for activity lines, injected into the dispatcher
pub trait ActivityLog {
    /// Reports an outcome and makes it the status bar line
    fn record(&mut self, message: &str, severity: Severity);

    /// An info line that leaves the status bar untouched
    fn note(&mut self, message: &str);

    /// The most recent line, shown in the status bar
    fn last(&self) -> Option<&Outcome>;
}

/// Forwards every line to `tracing` and remembers the latest one
#[derive(Debug, Default)]
pub struct TracingLog {
    last: Option<Outcome>,
}

impl TracingLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivityLog for TracingLog {
    fn record(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(target: "imgsort::activity", "{message}"),
            Severity::Success | Severity::Info => {
                tracing::info!(target: "imgsort::activity", severity = severity.label(), "{message}")
            }
        }
        self.last = Some(Outcome {
            message: message.to_string(),
            severity,
        });
    }

    fn note(&mut self, message: &str) {
        tracing::info!(target: "imgsort::activity", severity = Severity::Info.label(), "{message}");
    }

    fn last(&self) -> Option<&Outcome> {
        self.last.as_ref()
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    pub lines: Vec<Outcome>,
    /// Index into `lines` of the latest recorded outcome
    last: Option<usize>,
}

impl ActivityLog for MemoryLog {
    fn record(&mut self, message: &str, severity: Severity) {
        self.last = Some(self.lines.len());
        self.lines.push(Outcome {
            message: message.to_string(),
            severity,
        });
    }

    fn note(&mut self, message: &str) {
        self.lines.push(Outcome::info(message));
    }

    fn last(&self) -> Option<&Outcome> {
        self.last.and_then(|i| self.lines.get(i))
    }
}

/// Log file location (~/.cache/imgsort/imgsort.log on Linux)
pub fn log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("imgsort")
        .join("imgsort.log")
}

/// Installs a tracing subscriber that appends to the log file.
///
/// The terminal belongs to the UI, so nothing is ever written to stdout or
/// stderr. Verbosity follows `RUST_LOG` and defaults to `info`.
pub fn init_tracing() -> std::io::Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(env_filter)
        .try_init();

    Ok(path)
}
