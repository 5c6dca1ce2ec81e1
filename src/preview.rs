//! Opening the selected image in an external viewer, and the metadata shown
//! in the details column.

use crate::error::{ImgsortError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default upper bound on how long a viewer may run
pub const DEFAULT_PREVIEW_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the preview command on its own current-thread runtime.
///
/// The call blocks the caller until the child exits or the timeout expires;
/// an expired child is killed.
pub struct PreviewRunner {
    runtime: tokio::runtime::Runtime,
    /// Program and leading arguments; the image path is appended
    command: Option<Vec<String>>,
    timeout: Duration,
}

impl PreviewRunner {
    /// `command` of `None` falls back to the platform opener
    pub fn new(command: Option<Vec<String>>, timeout: Duration) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let command = command.filter(|parts| !parts.is_empty());
        Ok(Self {
            runtime,
            command,
            timeout,
        })
    }

    /// Opens `path`, trying each candidate command until one succeeds
    pub fn run(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ImgsortError::NotFound(path.to_path_buf()));
        }

        let mut last_err = None;
        for command in self.commands(path) {
            let label = command_label(&command);
            tracing::debug!(command = %label, path = %path.display(), "starting preview");
            match self.runtime.block_on(run_with_timeout(command, self.timeout)) {
                Ok(()) => return Ok(()),
                // A hung viewer is final; trying another one would hang again
                Err(e @ ImgsortError::Timeout { .. }) => return Err(e),
                Err(e) => {
                    tracing::debug!(error = %e, "preview command failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ImgsortError::Io {
            action: "Opening",
            path: path.to_path_buf(),
            source: io::Error::other("no preview command available"),
        }))
    }

    fn commands(&self, path: &Path) -> Vec<Command> {
        match &self.command {
            Some(parts) => {
                let mut command = Command::new(&parts[0]);
                command.args(&parts[1..]).arg(path);
                vec![command]
            }
            None => open::commands(path).into_iter().map(Command::from).collect(),
        }
    }
}

/// Splits a configured command line on whitespace
pub fn parse_command(line: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = line.split_whitespace().map(String::from).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

fn command_label(command: &Command) -> String {
    command.as_std().get_program().to_string_lossy().into_owned()
}

async fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<()> {
    let label = command_label(&command);
    command
        .stdin(Stdio::inherit())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| ImgsortError::Io {
        action: "Starting preview command",
        path: PathBuf::from(&label),
        source,
    })?;

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => Err(ImgsortError::Io {
            action: "Running preview command",
            path: PathBuf::from(&label),
            source: io::Error::other(format!("exited with {}", status)),
        }),
        Ok(Err(source)) => Err(ImgsortError::Io {
            action: "Waiting for preview command",
            path: PathBuf::from(&label),
            source,
        }),
        Err(_) => {
            let _ = child.kill().await;
            Err(ImgsortError::Timeout {
                command: label,
                secs: timeout.as_secs(),
            })
        }
    }
}

/// What the details column shows for the selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    /// Pixel size, when the header can be decoded
    pub dimensions: Option<(u32, u32)>,
}

impl FileDetails {
    pub fn read(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self {
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
            // Only the header is read, not the pixel data
            dimensions: image::image_dimensions(path).ok(),
        })
    }
}
