use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::path::{Component, Path, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Shortens every path segment except the last `depth` to its first character.
///
/// `/home/user/pictures/sorted/cats` with depth 2 becomes `/h/u/p/sorted/cats`.
/// Paths with `depth` segments or fewer are returned unchanged.
pub fn abbreviate_path(path: &Path, depth: usize) -> String {
    let mut root = String::new();
    let segments: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::CurDir => Some(".".to_string()),
            Component::ParentDir => Some("..".to_string()),
            Component::Prefix(prefix) => {
                root.push_str(&prefix.as_os_str().to_string_lossy());
                None
            }
            Component::RootDir => {
                root.push(MAIN_SEPARATOR);
                None
            }
        })
        .collect();

    if segments.len() <= depth {
        return path.display().to_string();
    }

    let cut = segments.len() - depth;
    let parts: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if i < cut {
                segment.chars().next().map(String::from).unwrap_or_default()
            } else {
                segment.clone()
            }
        })
        .collect();

    format!("{}{}", root, parts.join(MAIN_SEPARATOR_STR))
}

/// Format file size in human-readable form
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.1} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.1} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.1} KB", size as f64 / KB as f64)
    } else {
        format!("{} B", size)
    }
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
