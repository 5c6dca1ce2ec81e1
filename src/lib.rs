//! imgsort - a terminal image triage library
//!
//! This crate provides the core of the imgsort application: the file index,
//! the selection and key-routing state machines, and the file operations that
//! sort images into destination directories.

pub mod activity;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod preview;
pub mod tui;

// Re-export primary types for convenience
pub use activity::{ActivityLog, Outcome, Severity, TracingLog};
pub use config::UserConfig;
pub use domain::{
    Action, ActionDispatcher, DeleteMode, Entry, FileIndex, FileOps, InputRouter, Key,
    ScanOptions, SelectionState, Session, Sources, Step, TransferMode,
};
pub use error::{ImgsortError, Result};
pub use preview::PreviewRunner;
