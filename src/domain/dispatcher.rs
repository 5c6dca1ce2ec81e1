//! Executes routed actions against the filesystem and the session.
//!
//! Each call consumes the current [`Session`] and hands back the next one
//! together with a [`Step`] telling the event loop what to do next.

use super::file_ops::{FileOps, TransferMode};
use super::router::{Action, Direction};
use super::{ScanOptions, Session, Sources};
use crate::activity::{ActivityLog, Outcome, Severity};
use crate::error::{ImgsortError, Result};
use std::path::{Path, PathBuf};

/// What the event loop should do after a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
    /// Ask for a new name for this file, then call [`ActionDispatcher::rename`]
    PromptRename(PathBuf),
    /// Ask before deleting, then call [`ActionDispatcher::delete_confirmed`]
    ConfirmDelete(PathBuf),
    /// Run the preview command, then call [`ActionDispatcher::record_preview`]
    Preview(PathBuf),
    ToggleHelp,
}

pub struct ActionDispatcher<L: ActivityLog> {
    ops: FileOps,
    targets: Vec<PathBuf>,
    mode: TransferMode,
    confirm_delete: bool,
    sources: Sources,
    scan: ScanOptions,
    log: L,
}

impl<L: ActivityLog> ActionDispatcher<L> {
    pub fn new(
        ops: FileOps,
        targets: Vec<PathBuf>,
        mode: TransferMode,
        sources: Sources,
        scan: ScanOptions,
        log: L,
    ) -> Self {
        Self {
            ops,
            targets,
            mode,
            confirm_delete: false,
            sources,
            scan,
            log,
        }
    }

    pub fn with_confirm_delete(mut self, confirm_delete: bool) -> Self {
        self.confirm_delete = confirm_delete;
        self
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Most recent activity line
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.log.last()
    }

    /// Initial scan of the configured sources
    pub fn load_session(&self, viewport_height: usize, scroll_margin: usize) -> Session {
        Session::load(&self.sources, &self.scan, viewport_height, scroll_margin)
    }

    pub fn dispatch(&mut self, action: Action, session: Session) -> (Session, Step) {
        match action {
            Action::Navigate(direction) => {
                let selection = match direction {
                    Direction::Down => session.selection.move_down(),
                    Direction::Up => session.selection.move_up(),
                };
                let session = Session { selection, ..session };
                let message = match session.current() {
                    Some(entry) => {
                        format!("Cursor {} to \"{}\"", direction.label(), entry.file_name())
                    }
                    None => ImgsortError::EmptyIndex.to_string(),
                };
                self.log.note(&message);
                (session, Step::Continue)
            }
            Action::MoveOrCopy(index) => self.transfer(index, session),
            Action::Delete => match self.require_current(&session) {
                Some(path) if self.confirm_delete => (session, Step::ConfirmDelete(path)),
                Some(path) => {
                    let session = self.delete_confirmed(&path, session);
                    (session, Step::Continue)
                }
                None => (session, Step::Continue),
            },
            Action::RenameStart => match self.require_current(&session) {
                Some(path) => {
                    self.log.note(&format!("Renaming \"{}\"", file_name(&path)));
                    (session, Step::PromptRename(path))
                }
                None => (session, Step::Continue),
            },
            Action::Open => match self.require_current(&session) {
                Some(path) => (session, Step::Preview(path)),
                None => (session, Step::Continue),
            },
            Action::Help => {
                self.log.note("Showing help");
                (session, Step::ToggleHelp)
            }
            Action::Quit => {
                self.record(Outcome::info("Quitting imgsort"));
                (session, Step::Quit)
            }
            Action::Noop => (session, Step::Continue),
        }
    }

    /// Deletes `path` according to the configured delete mode and rescans
    pub fn delete_confirmed(&mut self, path: &Path, session: Session) -> Session {
        let outcome = self.ops.delete(path);
        self.record(outcome);
        session.reload(&self.sources, &self.scan)
    }

    /// Records that a pending delete was declined
    pub fn delete_cancelled(&mut self, path: &Path) {
        self.record(Outcome::info(format!("Kept \"{}\"", file_name(path))));
    }

    /// Renames `path` to `new_name` and rescans
    pub fn rename(&mut self, path: &Path, new_name: &str, session: Session) -> Session {
        let outcome = self.ops.rename(path, new_name, &self.scan.extensions);
        let changed = outcome.severity == Severity::Success;
        self.record(outcome);
        if changed {
            session.reload(&self.sources, &self.scan)
        } else {
            session
        }
    }

    /// Reports how the preview command for `path` went
    pub fn record_preview(&mut self, path: &Path, result: Result<()>) {
        let outcome = match result {
            Ok(()) => Outcome::success(format!("Opened \"{}\"", path.display())),
            Err(e) => Outcome::error(e.to_string()),
        };
        self.record(outcome);
    }

    fn transfer(&mut self, index: usize, session: Session) -> (Session, Step) {
        let Some(target) = index.checked_sub(1).and_then(|i| self.targets.get(i)) else {
            // Unbound destinations are ignored; the status bar keeps its line
            self.log.note(&ImgsortError::InvalidTarget(index).to_string());
            return (session, Step::Continue);
        };
        let target = target.clone();

        let Some(path) = self.require_current(&session) else {
            return (session, Step::Continue);
        };

        let outcome = self.ops.transfer(&path, &target, self.mode);
        self.record(outcome);
        (session.reload(&self.sources, &self.scan), Step::Continue)
    }

    /// Path under the cursor, or an `EmptyIndex` line when there is none
    fn require_current(&mut self, session: &Session) -> Option<PathBuf> {
        match session.current() {
            Some(entry) => Some(entry.path.clone()),
            None => {
                self.record(Outcome::info(ImgsortError::EmptyIndex.to_string()));
                None
            }
        }
    }

    fn record(&mut self, outcome: Outcome) {
        self.log.record(&outcome.message, outcome.severity);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::MemoryLog;
    use crate::domain::file_ops::DeleteMode;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        input: PathBuf,
        outputs: Vec<PathBuf>,
        trash: PathBuf,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir(&input).unwrap();
        for name in files {
            fs::write(input.join(name), name.as_bytes()).unwrap();
        }
        let outputs = vec![
            temp_dir.path().join("out/cats"),
            temp_dir.path().join("out/dogs"),
        ];
        let trash = temp_dir.path().join("trash");
        Fixture {
            _temp_dir: temp_dir,
            input,
            outputs,
            trash,
        }
    }

    fn dispatcher(fx: &Fixture, mode: TransferMode) -> ActionDispatcher<MemoryLog> {
        ActionDispatcher::new(
            FileOps::new(0, DeleteMode::Trash(fx.trash.clone())),
            fx.outputs.clone(),
            mode,
            Sources::flat(&fx.input),
            ScanOptions::default(),
            MemoryLog::default(),
        )
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_navigate_logs_one_line_each() {
            let fx = fixture(&["a.png", "b.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (session, step) = dispatcher.dispatch(Action::Navigate(Direction::Down), session);
            assert_eq!(step, Step::Continue);
            assert_eq!(session.selection.cursor, Some(1));

            let (session, _) = dispatcher.dispatch(Action::Navigate(Direction::Down), session);
            assert_eq!(session.selection.cursor, Some(0));

            let lines = &dispatcher.log().lines;
            assert_eq!(lines.len(), 2);
            assert!(lines.iter().all(|l| l.severity == Severity::Info));
            assert!(lines[0].message.starts_with("Cursor down"));
            // Notes leave the status bar alone
            assert!(dispatcher.last_outcome().is_none());
        }

        #[test]
        fn test_navigate_on_empty_index() {
            let fx = fixture(&[]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (session, _) = dispatcher.dispatch(Action::Navigate(Direction::Up), session);

            assert_eq!(session.selection.cursor, None);
            assert_eq!(dispatcher.log().lines.len(), 1);
        }

        #[test]
        fn test_noop_is_silent_and_help_logs() {
            let fx = fixture(&["a.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (session, step) = dispatcher.dispatch(Action::Noop, session);
            assert_eq!(step, Step::Continue);
            assert!(dispatcher.log().lines.is_empty());

            let (_, step) = dispatcher.dispatch(Action::Help, session);
            assert_eq!(step, Step::ToggleHelp);
            assert_eq!(dispatcher.log().lines.len(), 1);
        }

        #[test]
        fn test_quit_logs_once() {
            let fx = fixture(&[]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (_, step) = dispatcher.dispatch(Action::Quit, session);
            assert_eq!(step, Step::Quit);
            assert_eq!(dispatcher.log().lines.len(), 1);
        }
    }

    mod transfer_tests {
        use super::*;

        #[test]
        fn test_move_to_missing_target_then_reload() {
            let fx = fixture(&["a.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);
            assert_eq!(session.index.len(), 1);

            let (session, step) = dispatcher.dispatch(Action::MoveOrCopy(2), session);

            assert_eq!(step, Step::Continue);
            assert!(fx.outputs[1].join("a.png").exists());
            assert!(!fx.input.join("a.png").exists());
            assert!(session.is_empty());
            assert_eq!(session.selection.cursor, None);
            assert_eq!(dispatcher.log().lines.len(), 1);
            assert_eq!(
                dispatcher.last_outcome().map(|o| o.severity),
                Some(Severity::Success)
            );
        }

        #[test]
        fn test_copy_keeps_entry_listed() {
            let fx = fixture(&["a.png", "b.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Copy);
            let session = dispatcher.load_session(10, 2);

            let (session, _) = dispatcher.dispatch(Action::MoveOrCopy(1), session);

            assert_eq!(session.index.len(), 2);
            assert!(fx.input.join("a.png").exists() || fx.input.join("b.png").exists());
            assert_eq!(fs::read_dir(&fx.outputs[0]).unwrap().count(), 1);
        }

        #[test]
        fn test_unbound_target_is_not_an_error() {
            let fx = fixture(&["a.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (session, step) = dispatcher.dispatch(Action::MoveOrCopy(3), session);
            assert_eq!(step, Step::Continue);
            let (session, _) = dispatcher.dispatch(Action::MoveOrCopy(0), session);

            assert_eq!(session.index.len(), 1);
            let lines = &dispatcher.log().lines;
            assert_eq!(lines.len(), 2);
            assert!(lines.iter().all(|l| l.severity == Severity::Info));
            assert!(dispatcher.last_outcome().is_none());
        }

        #[test]
        fn test_move_on_empty_index_reports_once() {
            let fx = fixture(&[]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (_, step) = dispatcher.dispatch(Action::MoveOrCopy(1), session);

            assert_eq!(step, Step::Continue);
            assert_eq!(dispatcher.log().lines.len(), 1);
            assert_eq!(dispatcher.log().lines[0].severity, Severity::Info);
            assert!(!fx.outputs[0].exists());
        }

        #[test]
        fn test_cursor_stays_on_next_file_after_move() {
            let fx = fixture(&["a.png", "b.png", "c.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);
            let (session, _) = dispatcher.dispatch(Action::Navigate(Direction::Down), session);
            let moved = session.current().unwrap().path.clone();

            let (session, _) = dispatcher.dispatch(Action::MoveOrCopy(1), session);

            assert_eq!(session.index.len(), 2);
            assert_eq!(session.selection.cursor, Some(1));
            assert!(session.index.handles().all(|h| h != moved));
        }
    }

    mod delete_tests {
        use super::*;

        #[test]
        fn test_delete_without_confirmation() {
            let fx = fixture(&["a.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (session, step) = dispatcher.dispatch(Action::Delete, session);

            assert_eq!(step, Step::Continue);
            assert!(session.is_empty());
            assert!(fx.trash.join("a.png").exists());
            assert_eq!(dispatcher.log().lines.len(), 1);
        }

        #[test]
        fn test_delete_with_confirmation() {
            let fx = fixture(&["a.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move).with_confirm_delete(true);
            let session = dispatcher.load_session(10, 2);

            let (session, step) = dispatcher.dispatch(Action::Delete, session);
            let path = fx.input.join("a.png");
            assert_eq!(step, Step::ConfirmDelete(path.clone()));
            assert!(path.exists());
            assert!(dispatcher.log().lines.is_empty());

            let session = dispatcher.delete_confirmed(&path, session);
            assert!(session.is_empty());
            assert!(!path.exists());
        }

        #[test]
        fn test_delete_cancelled_keeps_file() {
            let fx = fixture(&["a.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move).with_confirm_delete(true);
            let path = fx.input.join("a.png");

            dispatcher.delete_cancelled(&path);

            assert!(path.exists());
            assert_eq!(
                dispatcher.last_outcome(),
                Some(&Outcome::info("Kept \"a.png\""))
            );
        }
    }

    mod rename_tests {
        use super::*;

        #[test]
        fn test_rename_flow() {
            let fx = fixture(&["IMG_1.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (session, step) = dispatcher.dispatch(Action::RenameStart, session);
            let path = fx.input.join("IMG_1.png");
            assert_eq!(step, Step::PromptRename(path.clone()));
            assert_eq!(dispatcher.log().lines.len(), 1);

            let session = dispatcher.rename(&path, "sunset", session);
            assert_eq!(session.current().unwrap().file_name(), "sunset.png");
            assert_eq!(dispatcher.log().lines.len(), 2);
            assert_eq!(
                dispatcher.last_outcome().map(|o| o.severity),
                Some(Severity::Success)
            );
        }

        #[test]
        fn test_rename_with_dotted_name_stays_indexed() {
            let fx = fixture(&["IMG_1.jpg"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);
            let path = fx.input.join("IMG_1.jpg");

            let session = dispatcher.rename(&path, "2023.05.01", session);

            assert_eq!(session.index.len(), 1);
            assert_eq!(session.current().unwrap().file_name(), "2023.05.01.jpg");
        }

        #[test]
        fn test_empty_rename_is_info() {
            let fx = fixture(&["IMG_1.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);
            let path = fx.input.join("IMG_1.png");

            let session = dispatcher.rename(&path, "", session);

            assert_eq!(session.current().unwrap().file_name(), "IMG_1.png");
            assert_eq!(dispatcher.log().lines[0].severity, Severity::Info);
        }
    }

    mod preview_tests {
        use super::*;

        #[test]
        fn test_open_requests_preview() {
            let fx = fixture(&["a.png"]);
            let mut dispatcher = dispatcher(&fx, TransferMode::Move);
            let session = dispatcher.load_session(10, 2);

            let (_, step) = dispatcher.dispatch(Action::Open, session);
            let path = fx.input.join("a.png");
            assert_eq!(step, Step::Preview(path.clone()));

            dispatcher.record_preview(
                &path,
                Err(ImgsortError::Timeout {
                    command: "feh".to_string(),
                    secs: 1,
                }),
            );
            let last = dispatcher.last_outcome().unwrap();
            assert!(last.is_error());
            assert!(last.message.contains("timed out"));
        }
    }
}
