//! Error types shared by the triage engine

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImgsortError {
    /// The source file vanished between the scan and the operation
    #[error("File \"{}\" not found", .0.display())]
    NotFound(PathBuf),

    /// A create/rename/copy/unlink call failed
    #[error("{action} \"{}\": {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Refusing to clobber an existing file at the destination
    #[error("Destination \"{}\" already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("No image files available")]
    EmptyIndex,

    #[error("No destination bound to index {0}")]
    InvalidTarget(usize),

    #[error("Preview command `{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ImgsortError {
    /// Wraps an io error, promoting `NotFound` to the dedicated variant
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                action,
                path,
                source,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ImgsortError>;
