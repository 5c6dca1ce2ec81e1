use crate::domain::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;

/// Converts a terminal key event into a domain key.
///
/// Releases and repeats are dropped, as are keys the router never binds.
pub fn key_from_event(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match (key.code, key.modifiers) {
        // Ctrl+C behaves like q
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Key::Char('q')),
        (KeyCode::Char(c), m) if m.contains(KeyModifiers::ALT) => Some(Key::Alt(c)),
        (KeyCode::Char(c), _) => Some(Key::Char(c)),
        (KeyCode::Down, _) => Some(Key::Down),
        (KeyCode::Up, _) => Some(Key::Up),
        (KeyCode::Enter, _) => Some(Key::Enter),
        (KeyCode::Esc, _) => Some(Key::Esc),
        (KeyCode::Delete, _) => Some(Key::Delete),
        (KeyCode::F(n), _) => Some(Key::F(n)),
        _ => None,
    }
}

/// Answer to the delete confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Confirm,
    Cancel,
    None,
}

/// Maps keyboard events to confirmation actions
/// Used when ViewState is ConfirmDelete
pub fn handle_confirm_input(key: KeyEvent) -> ConfirmAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => ConfirmAction::Confirm,
        (KeyCode::Char('Y'), KeyModifiers::NONE) => ConfirmAction::Confirm,
        (KeyCode::Char('Y'), KeyModifiers::SHIFT) => ConfirmAction::Confirm,
        (KeyCode::Enter, KeyModifiers::NONE) => ConfirmAction::Confirm,

        // Cancel: n or Esc
        (KeyCode::Char('n'), KeyModifiers::NONE) => ConfirmAction::Cancel,
        (KeyCode::Char('N'), KeyModifiers::NONE) => ConfirmAction::Cancel,
        (KeyCode::Char('N'), KeyModifiers::SHIFT) => ConfirmAction::Cancel,
        (KeyCode::Esc, KeyModifiers::NONE) => ConfirmAction::Cancel,

        _ => ConfirmAction::None,
    }
}

/// Line editor state for the rename prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePrompt {
    pub path: PathBuf,
    pub buffer: String,
}

impl RenamePrompt {
    /// Starts empty; submitting nothing keeps the old name
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            buffer: String::new(),
        }
    }
}

/// Result of feeding one key to the rename prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Submit(String),
    Cancel,
    Edited,
    Ignored,
}

pub fn handle_prompt_input(prompt: &mut RenamePrompt, key: KeyEvent) -> PromptAction {
    if key.kind != KeyEventKind::Press {
        return PromptAction::Ignored;
    }

    match key.code {
        KeyCode::Enter => PromptAction::Submit(prompt.buffer.clone()),
        KeyCode::Esc => PromptAction::Cancel,
        KeyCode::Backspace => {
            prompt.buffer.pop();
            PromptAction::Edited
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            prompt.buffer.clear();
            PromptAction::Edited
        }
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            prompt.buffer.push(c);
            PromptAction::Edited
        }
        _ => PromptAction::Ignored,
    }
}
