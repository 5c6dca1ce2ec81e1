use imgsort::activity::{init_tracing, TracingLog};
use imgsort::cli::{AppConfig, Args};
use imgsort::config::UserConfig;
use imgsort::domain::{ActionDispatcher, FileOps, InputRouter, Step};
use imgsort::preview::PreviewRunner;
use imgsort::tui::{
    handle_confirm_input, handle_prompt_input, key_from_event, list_viewport_height, render,
    render_overlay, ConfirmAction, PromptAction, RenamePrompt, Theme, View, ViewState,
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{io, time::Duration};

/// How long a prefix key waits for its digit
const PREFIX_TIMEOUT: Duration = Duration::from_millis(500);

type Dispatcher = ActionDispatcher<TracingLog>;

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    for warning in args.warnings() {
        eprintln!("Warning: {}", warning);
    }

    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let config = AppConfig::from_args(args, &user_config);

    match init_tracing() {
        Ok(path) => tracing::info!(log = %path.display(), input = %config.input_dir.display(), "imgsort starting"),
        Err(e) => eprintln!("Warning: Failed to open log file: {}", e),
    }

    run_app_with_config(&config)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> io::Result<()> {
    let theme = Theme::load(&config.theme);
    let preview = PreviewRunner::new(config.preview_command.clone(), config.preview_timeout)?;
    let ops = FileOps::new(config.auto_rename_base, config.delete_mode.clone());
    let mut dispatcher = ActionDispatcher::new(
        ops,
        config.output_dirs.clone(),
        config.transfer_mode,
        config.sources(),
        config.scan_options(),
        TracingLog::new(),
    )
    .with_confirm_delete(config.confirm_delete);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut dispatcher, &preview, &theme, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "event loop failed");
    }
    result
}

/// Suspends the TUI terminal to allow external programs to run
fn suspend_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Resumes the TUI terminal after external program exits
fn resume_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

fn full_area(width: u16, height: u16) -> Rect {
    Rect::new(0, 0, width, height)
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
    dispatcher: &mut Dispatcher,
    preview: &PreviewRunner,
    theme: &Theme,
    config: &AppConfig,
) -> io::Result<()> {
    let size = terminal.size()?;
    let viewport = list_viewport_height(full_area(size.width, size.height));
    let mut session = dispatcher.load_session(viewport, config.scroll_margin);
    tracing::info!(files = session.index.len(), "index loaded");

    let mut router = InputRouter::new();
    let mut view_state = ViewState::Browsing;

    loop {
        terminal.draw(|frame| {
            let view = View {
                session: &session,
                targets: dispatcher.targets(),
                status: dispatcher.last_outcome(),
                pending: router.pending(),
                mode: dispatcher.mode(),
                dir_depth: config.dir_depth,
                theme,
            };
            render(frame, &view);
            render_overlay(frame, &view_state, theme);
        })?;

        // Block for the next event; only a pending prefix bounds the wait
        let event = if router.is_pending() {
            if event::poll(PREFIX_TIMEOUT)? {
                Some(event::read()?)
            } else {
                None
            }
        } else {
            Some(event::read()?)
        };

        let Some(event) = event else {
            let action = router.flush();
            let (next, step) = dispatcher.dispatch(action, session);
            session = next;
            if handle_step(step, terminal, dispatcher, preview, &mut view_state)? {
                break;
            }
            continue;
        };

        let key = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            Event::Resize(width, height) => {
                session.selection = session
                    .selection
                    .with_viewport(list_viewport_height(full_area(width, height)));
                continue;
            }
            _ => continue,
        };

        // Handle overlay-specific input
        match &mut view_state {
            ViewState::Help => {
                // Any key closes help
                view_state = ViewState::Browsing;
                continue;
            }
            ViewState::ConfirmDelete(path) => {
                match handle_confirm_input(key) {
                    ConfirmAction::Confirm => {
                        session = dispatcher.delete_confirmed(path, session);
                        view_state = ViewState::Browsing;
                    }
                    ConfirmAction::Cancel => {
                        dispatcher.delete_cancelled(path);
                        view_state = ViewState::Browsing;
                    }
                    ConfirmAction::None => {}
                }
                continue;
            }
            ViewState::Rename(prompt) => {
                match handle_prompt_input(prompt, key) {
                    PromptAction::Submit(name) => {
                        session = dispatcher.rename(&prompt.path, &name, session);
                        view_state = ViewState::Browsing;
                    }
                    PromptAction::Cancel => view_state = ViewState::Browsing,
                    PromptAction::Edited | PromptAction::Ignored => {}
                }
                continue;
            }
            ViewState::Browsing => {}
        }

        let Some(key) = key_from_event(key) else {
            continue;
        };
        tracing::debug!(?key, "key press");

        let action = router.route(key, dispatcher.targets().len());
        let (next, step) = dispatcher.dispatch(action, session);
        session = next;
        if handle_step(step, terminal, dispatcher, preview, &mut view_state)? {
            break;
        }
    }

    Ok(())
}

/// Applies a dispatch step; returns true when the loop should end
fn handle_step<B: ratatui::backend::Backend + std::io::Write>(
    step: Step,
    terminal: &mut Terminal<B>,
    dispatcher: &mut Dispatcher,
    preview: &PreviewRunner,
    view_state: &mut ViewState,
) -> io::Result<bool> {
    match step {
        Step::Continue => {}
        Step::Quit => return Ok(true),
        Step::ToggleHelp => *view_state = ViewState::Help,
        Step::ConfirmDelete(path) => *view_state = ViewState::ConfirmDelete(path),
        Step::PromptRename(path) => *view_state = ViewState::Rename(RenamePrompt::new(path)),
        Step::Preview(path) => {
            // Suspend terminal before opening external program
            suspend_terminal(terminal)?;

            // Blocks until the viewer exits or times out
            let result = preview.run(&path);

            // Resume terminal after external program exits
            resume_terminal(terminal)?;
            dispatcher.record_preview(&path, result);
        }
    }
    Ok(false)
}
