// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::domain::file_ops::{default_trash_dir, DeleteMode, TransferMode};
use crate::domain::router::MAX_ADDRESSABLE_TARGETS;
use crate::domain::selection::DEFAULT_SCROLL_MARGIN;
use crate::domain::{ScanOptions, Sources, DEFAULT_EXTENSIONS, DEFAULT_MAX_DISPLAY_LEN};
use crate::preview::{parse_command, DEFAULT_PREVIEW_TIMEOUT};
use clap::{ArgAction, Parser};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the built-in color scheme
pub const DEFAULT_THEME: &str = "default";

/// imgsort - sort a directory of images into destination folders
///
/// Walk through the images one by one and send each to a destination with a
/// single key press.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgsort")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the images to sort
    #[arg(short = 'i', long = "input-dir")]
    pub input_dir: PathBuf,

    /// Destination directories, addressed by keys 1-0, then Alt or Esc plus a
    /// digit, then backtick plus a digit
    #[arg(short = 'o', long = "output-dirs", num_args = 1.., required = true)]
    pub output_dirs: Vec<PathBuf>,

    /// Also list images in the input directory's immediate subdirectories
    #[arg(short = 't', long = "tree", action = ArgAction::SetTrue)]
    pub tree: bool,

    /// Copy files to destinations instead of moving them
    #[arg(short = 'c', long = "copy", action = ArgAction::SetTrue)]
    pub copy: bool,

    /// Unlink deleted files instead of moving them to the trash directory
    #[arg(long = "permanent-delete", action = ArgAction::SetTrue)]
    pub permanent_delete: bool,

    /// Ask before deleting a file
    #[arg(long = "confirm-delete", action = ArgAction::SetTrue)]
    pub confirm_delete: bool,

    /// Number files sent to a destination, in the given base (0 disables)
    ///
    /// Without a value the base is 10.
    #[arg(
        short = 'a',
        long = "auto-rename",
        value_name = "BASE",
        num_args = 0..=1,
        default_value = "0",
        default_missing_value = "10"
    )]
    pub auto_rename: u32,

    /// Image extensions to list (repeatable); defaults to png, jpg, jpeg, tiff, bmp
    #[arg(short = 'e', long = "ext")]
    pub extensions: Vec<String>,

    /// Color scheme name from colorschemes.json
    #[arg(long = "theme")]
    pub theme: Option<String>,

    /// Maximum characters of a file name shown in the list
    #[arg(long = "name-width", default_value_t = DEFAULT_MAX_DISPLAY_LEN)]
    pub name_width: usize,

    /// Trailing path segments shown in full for destinations
    #[arg(long = "dir-depth", default_value_t = 3)]
    pub dir_depth: usize,

    /// Rows kept between the cursor and the list edge
    #[arg(long = "scroll-margin")]
    pub scroll_margin: Option<usize>,

    /// Viewer command; the image path is appended (default: system opener)
    #[arg(long = "preview-cmd")]
    pub preview_cmd: Option<String>,

    /// Seconds before a running viewer is killed
    #[arg(long = "preview-timeout", value_name = "SECS")]
    pub preview_timeout: Option<u64>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.input_dir.exists() {
            return Err(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            ));
        }

        if !self.input_dir.is_dir() {
            return Err(format!(
                "Input path is not a directory: {}",
                self.input_dir.display()
            ));
        }

        if self.output_dirs.is_empty() {
            return Err("At least one output directory is required".to_string());
        }

        if self.auto_rename == 1 || self.auto_rename > 36 {
            return Err(format!(
                "Invalid auto-rename base: {}. Use 0 to disable or a base from 2 to 36",
                self.auto_rename
            ));
        }

        if self.name_width < 6 {
            return Err(format!(
                "name-width ({}) must be at least 6",
                self.name_width
            ));
        }

        if self.dir_depth == 0 {
            return Err("dir-depth must be at least 1".to_string());
        }

        if self.preview_timeout == Some(0) {
            return Err("preview-timeout must be at least 1 second".to_string());
        }

        if let Some(ext) = self.extensions.iter().find(|e| normalize_extension(e).is_empty()) {
            return Err(format!("Invalid extension: '{}'", ext));
        }

        Ok(())
    }

    /// Warnings that don't prevent startup
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.output_dirs.len() > MAX_ADDRESSABLE_TARGETS {
            warnings.push(format!(
                "{} output directories given; only the first {} can be reached by keys",
                self.output_dirs.len(),
                MAX_ADDRESSABLE_TARGETS
            ));
        }
        warnings
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Configuration derived from CLI arguments and the user config file
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub output_dirs: Vec<PathBuf>,
    pub tree: bool,
    pub transfer_mode: TransferMode,
    pub delete_mode: DeleteMode,
    pub confirm_delete: bool,
    pub auto_rename_base: u32,
    pub extensions: HashSet<String>,
    pub theme: String,
    pub name_width: usize,
    pub dir_depth: usize,
    pub scroll_margin: usize,
    pub preview_command: Option<Vec<String>>,
    pub preview_timeout: Duration,
}

impl AppConfig {
    /// Layers flags over the user config over built-in defaults
    pub fn from_args(args: Args, user: &UserConfig) -> Self {
        let delete_mode = if args.permanent_delete {
            DeleteMode::Permanent
        } else {
            DeleteMode::Trash(user.trash_dir.clone().unwrap_or_else(default_trash_dir))
        };

        let extensions = if args.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            args.extensions.iter().map(|e| normalize_extension(e)).collect()
        };

        let preview_command = args
            .preview_cmd
            .as_deref()
            .or(user.preview_command.as_deref())
            .and_then(parse_command);

        let preview_timeout = args
            .preview_timeout
            .or(user.preview_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PREVIEW_TIMEOUT);

        AppConfig {
            input_dir: args.input_dir,
            output_dirs: args.output_dirs,
            tree: args.tree,
            transfer_mode: if args.copy {
                TransferMode::Copy
            } else {
                TransferMode::Move
            },
            delete_mode,
            confirm_delete: args.confirm_delete,
            auto_rename_base: args.auto_rename,
            extensions,
            theme: args
                .theme
                .or_else(|| user.theme.clone())
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
            name_width: args.name_width,
            dir_depth: args.dir_depth,
            scroll_margin: args
                .scroll_margin
                .or(user.scroll_margin)
                .unwrap_or(DEFAULT_SCROLL_MARGIN),
            preview_command,
            preview_timeout,
        }
    }

    pub fn sources(&self) -> Sources {
        Sources {
            root: self.input_dir.clone(),
            tree: self.tree,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self.extensions.clone(),
            max_display_len: self.name_width,
        }
    }
}
