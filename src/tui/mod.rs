// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::{StyleToken, Theme};
pub use helpers::{abbreviate_path, centered_rect, format_file_size};
pub use input::{
    handle_confirm_input, handle_prompt_input, key_from_event, ConfirmAction, PromptAction,
    RenamePrompt,
};

use crate::activity::{Outcome, Severity};
use crate::domain::router::{Pending, Tier};
use crate::domain::{Session, TransferMode};
use crate::preview::FileDetails;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::path::{Path, PathBuf};

/// Rows below the columns: status line and footer
const BOTTOM_ROWS: u16 = 2;

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main file browsing view
    Browsing,
    /// Help overlay visible
    Help,
    /// Waiting for y/n before deleting this file
    ConfirmDelete(PathBuf),
    /// Typing a new name for a file
    Rename(RenamePrompt),
}

/// Everything one frame draws
pub struct View<'a> {
    pub session: &'a Session,
    pub targets: &'a [PathBuf],
    pub status: Option<&'a Outcome>,
    pub pending: Pending,
    pub mode: TransferMode,
    pub dir_depth: usize,
    pub theme: &'a Theme,
}

/// Height in rows of the file list inside its border, for a terminal of `area`
pub fn list_viewport_height(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(BOTTOM_ROWS + 2)).max(1)
}

/// Renders the three columns plus status line and footer
pub fn render(frame: &mut Frame, view: &View) {
    let theme = view.theme;
    let constraints = [Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)];
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if theme.mirror_vertical {
            [constraints[2], constraints[1], constraints[0]]
        } else {
            constraints
        })
        .split(frame.area());
    let (columns_area, status_area, footer_area) = if theme.mirror_vertical {
        (rows[2], rows[1], rows[0])
    } else {
        (rows[0], rows[1], rows[2])
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(2, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(columns_area);
    let (list_area, targets_area) = if theme.mirror {
        (columns[2], columns[0])
    } else {
        (columns[0], columns[2])
    };

    render_file_list(frame, list_area, view);
    render_details(frame, columns[1], view);
    render_targets(frame, targets_area, view);
    render_status(frame, status_area, view);
    render_footer(frame, footer_area, theme);
}

/// Draws whichever overlay `state` calls for
pub fn render_overlay(frame: &mut Frame, state: &ViewState, theme: &Theme) {
    match state {
        ViewState::Browsing => {}
        ViewState::Help => render_help_overlay(frame, theme),
        ViewState::ConfirmDelete(path) => render_confirm_delete_overlay(frame, path, theme),
        ViewState::Rename(prompt) => render_rename_overlay(frame, prompt, theme),
    }
}

fn bordered(title: String, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.style(StyleToken::Border))
}

fn render_file_list(frame: &mut Frame, area: Rect, view: &View) {
    let theme = view.theme;
    let session = view.session;
    let title = match session.selection.cursor {
        Some(cursor) => format!(" Images {}/{} ", cursor + 1, session.index.len()),
        None => " Images ".to_string(),
    };
    let block = bordered(title, theme);

    if session.is_empty() {
        let banner = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No images found",
                theme.style(StyleToken::Info).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(banner, area);
        return;
    }

    let lines: Vec<Line> = session
        .selection
        .visible_range()
        .filter_map(|i| session.index.get(i).map(|entry| (i, entry)))
        .map(|(i, entry)| {
            let style = if Some(i) == session.selection.cursor {
                theme.cursor_style()
            } else {
                theme.style(StyleToken::Text)
            };
            Line::from(Span::styled(entry.display_name.clone(), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_details(frame: &mut Frame, area: Rect, view: &View) {
    let theme = view.theme;
    let label = theme.style(StyleToken::Info);
    let text = theme.style(StyleToken::Text);

    let lines = match view.session.current() {
        Some(entry) => {
            let folder = entry
                .path
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Name:      ", label),
                    Span::styled(entry.file_name(), text.add_modifier(Modifier::BOLD)),
                ]),
                Line::from(vec![
                    Span::styled("Folder:    ", label),
                    Span::styled(folder, text),
                ]),
            ];

            match FileDetails::read(&entry.path) {
                Ok(details) => {
                    lines.push(Line::from(vec![
                        Span::styled("Size:      ", label),
                        Span::styled(format_file_size(details.size), text),
                    ]));
                    if let Some(modified) = details.modified {
                        lines.push(Line::from(vec![
                            Span::styled("Modified:  ", label),
                            Span::styled(modified.format("%Y-%m-%d %H:%M").to_string(), text),
                        ]));
                    }
                    if let Some((width, height)) = details.dimensions {
                        lines.push(Line::from(vec![
                            Span::styled("Pixels:    ", label),
                            Span::styled(format!("{}×{}", width, height), text),
                        ]));
                    }
                }
                Err(e) => lines.push(Line::from(Span::styled(
                    format!("Unavailable: {}", e),
                    theme.style(StyleToken::Error),
                ))),
            }
            lines
        }
        None => vec![Line::from(Span::styled("Nothing selected", label))],
    };

    let paragraph = Paragraph::new(lines)
        .block(bordered(" Details ".to_string(), theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_targets(frame: &mut Frame, area: Rect, view: &View) {
    let theme = view.theme;
    let verb = match view.mode {
        TransferMode::Move => "Move to",
        TransferMode::Copy => "Copy to",
    };
    let prefix = match view.pending {
        Pending::AwaitingDigit(Tier::Escape) => " [M-]",
        Pending::AwaitingDigit(Tier::Backtick) => " [`]",
        _ => "",
    };

    let lines: Vec<Line> = view
        .targets
        .iter()
        .enumerate()
        .map(|(i, target)| {
            let (key, key_style) = match Tier::key_label(i) {
                Some(key) => (key, theme.style(StyleToken::TextHighlight)),
                None => ("-".to_string(), theme.style(StyleToken::Border)),
            };
            Line::from(vec![
                Span::styled(format!("{:>3} ", key), key_style.add_modifier(Modifier::BOLD)),
                Span::styled(
                    abbreviate_path(target, view.dir_depth),
                    theme.style(StyleToken::Text),
                ),
            ])
        })
        .collect();

    let block = bordered(format!(" {}{} ", verb, prefix), theme);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn severity_style(severity: Severity, theme: &Theme) -> Style {
    match severity {
        Severity::Info => theme.style(StyleToken::Info),
        Severity::Success => theme.style(StyleToken::Success),
        Severity::Error => theme.style(StyleToken::Error),
    }
}

fn render_status(frame: &mut Frame, area: Rect, view: &View) {
    let line = match view.status {
        Some(outcome) => {
            let style = severity_style(outcome.severity, view.theme);
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", outcome.severity.label()),
                    style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(outcome.message.clone(), style),
            ])
        }
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect, theme: &Theme) {
    let key = theme.style(StyleToken::TextHighlight).add_modifier(Modifier::BOLD);
    let text = theme.style(StyleToken::Text);
    let hints = [
        ("j/k", "move"),
        ("1-0", "send"),
        ("d", "delete"),
        ("r", "rename"),
        ("Enter", "open"),
        ("?", "help"),
        ("q", "quit"),
    ];

    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(k, label)| {
            [
                Span::styled(format!(" {} ", k), key),
                Span::styled(format!("{} ", label), text),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn overlay_block(title: &'static str, border: Style, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(theme.style(StyleToken::Text))
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme) {
    let help_area = centered_rect(60, 80, frame.area());

    // Clear background
    frame.render_widget(Clear, help_area);

    let block = overlay_block(" Help ", theme.style(StyleToken::TextHighlight), theme);
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let key = theme.style(StyleToken::TextHighlight).add_modifier(Modifier::BOLD);
    let bindings = [
        ("↓ / j", "Next image"),
        ("↑ / k", "Previous image"),
        ("1 … 0", "Send to destination 1-10"),
        ("Esc 1 … 0", "Send to destination 11-20 (or Alt+digit)"),
        ("` 1 … 0", "Send to destination 21-30"),
        ("Del / d", "Delete image"),
        ("F2 / r", "Rename image"),
        ("Enter", "Open in viewer"),
        ("?", "Toggle help"),
        ("q / Esc", "Quit"),
    ];

    let mut help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            key.add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
    ];
    help_lines.extend(bindings.iter().map(|(keys, what)| {
        Line::from(vec![
            Span::styled(format!("{:>10}  ", keys), key),
            Span::styled(format!("{:<40}", what), theme.style(StyleToken::Text)),
        ])
    }));
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press ? or Esc to close",
        theme.style(StyleToken::Info),
    )));

    let paragraph = Paragraph::new(help_lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Renders the confirmation dialog for the delete action
pub fn render_confirm_delete_overlay(frame: &mut Frame, path: &Path, theme: &Theme) {
    let confirm_area = centered_rect(50, 40, frame.area());

    // Clear background
    frame.render_widget(Clear, confirm_area);

    let block = overlay_block(" Confirm Delete ", theme.style(StyleToken::Error), theme);
    let inner = block.inner(confirm_area);
    frame.render_widget(block, confirm_area);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let yes = theme.style(StyleToken::Success).add_modifier(Modifier::BOLD);
    let no = theme.style(StyleToken::Error).add_modifier(Modifier::BOLD);

    let confirm_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this image?",
            theme.style(StyleToken::Text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(name, theme.style(StyleToken::TextHighlight))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", yes),
            Span::raw("es  "),
            Span::styled("[Enter]", yes),
            Span::raw("     "),
            Span::styled("[N]", no),
            Span::raw("o  "),
            Span::styled("[Esc]", no),
        ]),
    ];

    let paragraph = Paragraph::new(confirm_lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

/// Renders the rename prompt
pub fn render_rename_overlay(frame: &mut Frame, prompt: &RenamePrompt, theme: &Theme) {
    let area = centered_rect(60, 30, frame.area());

    // Clear background
    frame.render_widget(Clear, area);

    let block = overlay_block(" Rename ", theme.style(StyleToken::TextHighlight), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let current = prompt
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let lines = vec![
        Line::from(vec![
            Span::styled("Current: ", theme.style(StyleToken::Info)),
            Span::styled(current, theme.style(StyleToken::Text)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("New name: ", theme.style(StyleToken::Info)),
            Span::styled(
                format!("{}_", prompt.buffer),
                theme.style(StyleToken::TextHighlight).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to rename, Esc to cancel. The extension is kept if omitted.",
            theme.style(StyleToken::Border),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
