//! Filesystem-mutating primitives.
//!
//! Each public operation reports an [`Outcome`] and never returns an error;
//! the private `try_*` helpers do the work with `?` and the boundary turns
//! their result into a message.

use crate::activity::Outcome;
use crate::error::{ImgsortError, Result};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension used for auto-renamed files when the target holds no numbered file
pub const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Move,
    Copy,
}

impl TransferMode {
    fn past_tense(self) -> &'static str {
        match self {
            TransferMode::Move => "Moved",
            TransferMode::Copy => "Copied",
        }
    }
}

/// What deleting a file means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteMode {
    /// Relocate into this directory, keeping the file name
    Trash(PathBuf),
    /// Unlink the file
    Permanent,
}

/// `~/.trash/imgsort`
pub fn default_trash_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".trash")
        .join("imgsort")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOps {
    /// Numeral base for auto-renaming; `None` keeps original names
    auto_rename: Option<u32>,
    delete_mode: DeleteMode,
}

impl FileOps {
    /// `auto_rename_base` of 0 disables auto-renaming; other values are
    /// clamped into the supported radix range 2..=36.
    pub fn new(auto_rename_base: u32, delete_mode: DeleteMode) -> Self {
        let auto_rename = match auto_rename_base {
            0 => None,
            base => Some(base.clamp(2, 36)),
        };
        Self {
            auto_rename,
            delete_mode,
        }
    }

    pub fn transfer(&self, source: &Path, target_dir: &Path, mode: TransferMode) -> Outcome {
        let name = display_file_name(source);
        match self.try_transfer(source, target_dir, mode) {
            Ok(dest) => Outcome::success(format!(
                "{} \"{}\" to \"{}\"",
                mode.past_tense(),
                name,
                dest.display()
            )),
            Err(e) => Outcome::error(e.to_string()),
        }
    }

    pub fn delete(&self, source: &Path) -> Outcome {
        let name = display_file_name(source);
        match (self.try_delete(source), &self.delete_mode) {
            (Ok(()), DeleteMode::Trash(dir)) => Outcome::success(format!(
                "File \"{}\" successfully moved to \"{}\"",
                name,
                dir.display()
            )),
            (Ok(()), DeleteMode::Permanent) => Outcome::success(format!(
                "File \"{}\" permanently deleted from \"{}\"",
                name,
                source.parent().unwrap_or(source).display()
            )),
            (Err(e), _) => Outcome::error(e.to_string()),
        }
    }

    /// Renames within the parent directory.
    ///
    /// `new_name` is a base name: the original suffix is appended unless the
    /// name already ends in one of `extensions` (lowercase, no dot). An empty
    /// name leaves the file alone.
    pub fn rename(&self, source: &Path, new_name: &str, extensions: &HashSet<String>) -> Outcome {
        let name = display_file_name(source);
        match try_rename(source, new_name, extensions) {
            Ok(Some(dest)) => Outcome::success(format!(
                "File \"{}\" successfully renamed to \"{}\"",
                name,
                display_file_name(&dest)
            )),
            Ok(None) => Outcome::info(format!("File \"{}\" left unchanged", name)),
            Err(e) => Outcome::error(e.to_string()),
        }
    }

    fn try_transfer(&self, source: &Path, target_dir: &Path, mode: TransferMode) -> Result<PathBuf> {
        if !source.exists() {
            return Err(ImgsortError::NotFound(source.to_path_buf()));
        }

        fs::create_dir_all(target_dir)
            .map_err(|e| ImgsortError::io("Creating directory", target_dir, e))?;

        let file_name = match self.auto_rename {
            Some(radix) => next_available_name(target_dir, radix),
            None => display_file_name(source),
        };
        let dest = target_dir.join(file_name);
        if dest.exists() {
            return Err(ImgsortError::AlreadyExists(dest));
        }

        match mode {
            TransferMode::Move => relocate(source, &dest, "Moving file")?,
            TransferMode::Copy => {
                if let Err(e) = copy_preserving(source, &dest) {
                    let _ = fs::remove_file(&dest);
                    return Err(ImgsortError::io("Copying file", source, e));
                }
            }
        }

        tracing::debug!(source = %source.display(), dest = %dest.display(), ?mode, "transfer done");
        Ok(dest)
    }

    fn try_delete(&self, source: &Path) -> Result<()> {
        if !source.exists() {
            return Err(ImgsortError::NotFound(source.to_path_buf()));
        }

        match &self.delete_mode {
            DeleteMode::Trash(trash_dir) => {
                fs::create_dir_all(trash_dir)
                    .map_err(|e| ImgsortError::io("Creating trash directory", trash_dir, e))?;
                let dest = trash_dir.join(display_file_name(source));
                relocate(source, &dest, "Moving file to trash")
            }
            DeleteMode::Permanent => fs::remove_file(source)
                .map_err(|e| ImgsortError::io("Permanently deleting file", source, e)),
        }
    }
}

fn try_rename(
    source: &Path,
    new_name: &str,
    extensions: &HashSet<String>,
) -> Result<Option<PathBuf>> {
    if !source.exists() {
        return Err(ImgsortError::NotFound(source.to_path_buf()));
    }

    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Ok(None);
    }
    if new_name.contains('/') || new_name.contains(std::path::MAIN_SEPARATOR) {
        return Err(ImgsortError::io(
            "Renaming file",
            source,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "new name must not contain a path separator",
            ),
        ));
    }

    let has_image_suffix = Path::new(new_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e.to_lowercase()));
    let file_name = match source.extension() {
        Some(ext) if !has_image_suffix => format!("{}.{}", new_name, ext.to_string_lossy()),
        _ => new_name.to_string(),
    };
    let dest = source
        .parent()
        .map(|p| p.join(&file_name))
        .unwrap_or_else(|| PathBuf::from(&file_name));

    if dest == source {
        return Ok(None);
    }
    if dest.exists() {
        return Err(ImgsortError::AlreadyExists(dest));
    }

    fs::rename(source, &dest).map_err(|e| ImgsortError::io("Renaming file", source, e))?;
    Ok(Some(dest))
}

/// First positive integer missing from the numerically named files in
/// `target_dir`, formatted in `radix`, with an extension.
///
/// The extension is taken from the last numbered file seen during the scan,
/// or [`DEFAULT_EXTENSION`] when there is none. A missing directory counts as
/// empty.
///
/// Above base 10 only lowercase digits count, matching the names this
/// function produces. A lowercase word spelled entirely in the radix's digits
/// (`cafe` in base 16, any alphanumeric stem in base 36) is still a number.
pub fn next_available_name(target_dir: &Path, radix: u32) -> String {
    let radix = radix.clamp(2, 36);
    let mut taken: Vec<u64> = Vec::new();
    let mut extension: Option<String> = None;

    if let Ok(entries) = fs::read_dir(target_dir) {
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.is_empty()
                || !stem
                    .chars()
                    .all(|c| c.is_digit(radix) && !c.is_ascii_uppercase())
            {
                continue;
            }
            // Overlong digit runs cannot collide with a small candidate
            let Ok(number) = u64::from_str_radix(stem, radix) else {
                continue;
            };

            taken.push(number);
            if let Some(ext) = path.extension() {
                extension = Some(ext.to_string_lossy().into_owned());
            }
        }
    }

    taken.sort_unstable();
    let mut candidate: u64 = 1;
    for number in taken {
        if number == candidate {
            candidate += 1;
        } else if number > candidate {
            break;
        }
    }

    format!(
        "{}.{}",
        format_radix(candidate, radix),
        extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    )
}

fn format_radix(mut value: u64, radix: u32) -> String {
    if radix == 10 {
        return value.to_string();
    }

    let base = u64::from(radix);
    let mut digits = Vec::new();
    loop {
        let digit = (value % base) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        value /= base;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().collect()
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Atomic rename, falling back to copy + unlink across filesystems.
///
/// If the source cannot be removed after copying, the copy is discarded so
/// the file exists in exactly one place.
fn relocate(source: &Path, dest: &Path, action: &'static str) -> Result<()> {
    let rename_err = match fs::rename(source, dest) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ImgsortError::NotFound(source.to_path_buf()))
        }
        Err(e) => e,
    };

    tracing::debug!(error = %rename_err, "rename failed, falling back to copy");
    if copy_preserving(source, dest).is_err() {
        let _ = fs::remove_file(dest);
        return Err(ImgsortError::io(action, source, rename_err));
    }
    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(dest);
        return Err(ImgsortError::io(action, source, e));
    }
    Ok(())
}

/// Copies contents and permissions, then carries the modification time over
fn copy_preserving(source: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(source, dest)?;
    let modified = fs::metadata(source)?.modified()?;
    // Best effort: a read-only copy cannot be reopened for writing
    if let Ok(file) = fs::File::options().write(true).open(dest) {
        let _ = file.set_modified(modified);
    }
    Ok(())
}
