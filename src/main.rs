//! Windows System Admin CLI
//!
//! Live inventories of services, drivers, processes, modules, network
//! connections, scheduled tasks, installed programs, environment
//! variables and top-level windows, with state-dependent actions on each
//! entry. Runs as an interactive terminal UI by default, or as a
//! scriptable console when a subcommand is given.
//!
//! Controls (interactive mode):
//! - Tab / Shift+Tab / 1-9: Switch inventory
//! - ↑/↓, PgUp/PgDn, Home/End: Navigate
//! - Enter: Open action menu for the selection
//! - /: Filter, Esc: clear filter
//! - r: Refresh now, [ / ]: Change auto-refresh rate
//! - ?: Help, q: Quit

use std::process::ExitCode;

#[cfg(windows)]
fn main() -> ExitCode {
    use clap::Parser;
    use winadmin_cli::console;

    #[derive(Parser)]
    #[command(name = "winadmin", version, about = "Windows system administration CLI")]
    struct Cli {
        #[command(subcommand)]
        command: Option<console::Command>,
    }

    let cli = Cli::parse();
    match cli.command {
        Some(command) => {
            use tracing_subscriber::EnvFilter;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
            ExitCode::from(console::run(command).clamp(0, u8::MAX as i32) as u8)
        }
        None => match tui::run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("terminal error: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(not(windows))]
fn main() -> ExitCode {
    eprintln!(
        "{} inspects Windows subsystems and only runs on Windows.",
        winadmin_cli::constants::DISPLAY_NAME
    );
    ExitCode::FAILURE
}

#[cfg(windows)]
mod tui {
    use std::io;
    use std::time::{Duration, Instant};

    use crossterm::{
        cursor::{Hide, Show},
        event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
        execute,
        terminal::{
            self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen,
        },
    };

    use winadmin_cli::app::{build_inventories, App, Mode};
    use winadmin_cli::constants::VISIBLE_ROWS_OVERHEAD;
    use winadmin_cli::core::RefreshMode;
    use winadmin_cli::ui::render;

    pub fn run() -> io::Result<()> {
        let mut stdout = io::stdout();

        // Set up terminal
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, DisableLineWrap, Hide)?;

        let result = event_loop(&mut stdout);

        // Restore terminal even when the loop errored
        execute!(stdout, Show, EnableLineWrap, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(stdout: &mut io::Stdout) -> io::Result<()> {
        let mut app = App::new(build_inventories());
        app.refresh_active(RefreshMode::Full);
        let mut last_refresh = Instant::now();

        loop {
            render(stdout, &mut app)?;

            let refresh_interval = Duration::from_millis(app.refresh_interval_ms);
            let timeout = refresh_interval
                .checked_sub(last_refresh.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                if let Event::Key(key_event) = event::read()? {
                    // Only handle key PRESS events, ignore Release and Repeat
                    if key_event.kind != KeyEventKind::Press {
                        continue;
                    }

                    // A keypress acknowledges the message line
                    app.message = None;

                    if matches!(app.mode, Mode::Help) {
                        app.mode = Mode::Normal;
                        continue;
                    }
                    if matches!(app.mode, Mode::Filter) {
                        handle_filter_keys(&mut app, key_event.code);
                        continue;
                    }
                    if matches!(app.mode, Mode::ActionMenu { .. }) {
                        handle_menu_keys(&mut app, key_event.code);
                        continue;
                    }
                    if matches!(app.mode, Mode::FilenamePrompt { .. }) {
                        handle_prompt_keys(&mut app, key_event.code);
                        continue;
                    }
                    if handle_normal_keys(&mut app, key_event.code, key_event.modifiers)? {
                        break;
                    }
                }
            }

            // Field-only refresh on the timer; membership changes wait for
            // an explicit refresh so the selection stays put.
            if last_refresh.elapsed() >= Duration::from_millis(app.refresh_interval_ms) {
                app.refresh_active(RefreshMode::Auto);
                last_refresh = Instant::now();
            }
        }
        Ok(())
    }

    /// Handles key events while editing the filter
    fn handle_filter_keys(app: &mut App, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                app.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                app.tabs[app.active_tab].filter.pop();
                app.rebuild_visible();
            }
            KeyCode::Char(c) => {
                app.tabs[app.active_tab].filter.push(c);
                app.rebuild_visible();
            }
            _ => {}
        }
    }

    /// Handles key events while the action menu is open
    fn handle_menu_keys(app: &mut App, code: KeyCode) {
        match code {
            KeyCode::Enter => app.confirm_menu_action(),
            KeyCode::Esc => app.mode = Mode::Normal,
            KeyCode::Up => {
                if let Mode::ActionMenu { selected, .. } = &mut app.mode {
                    *selected = selected.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if let Mode::ActionMenu { actions, selected } = &mut app.mode {
                    if *selected + 1 < actions.len() {
                        *selected += 1;
                    }
                }
            }
            _ => {}
        }
    }

    /// Handles key events while the filename prompt is open
    fn handle_prompt_keys(app: &mut App, code: KeyCode) {
        match code {
            KeyCode::Enter => app.confirm_filename(),
            KeyCode::Esc => app.mode = Mode::Normal,
            KeyCode::Backspace => {
                if let Mode::FilenamePrompt { input, .. } = &mut app.mode {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Mode::FilenamePrompt { input, .. } = &mut app.mode {
                    input.push(c);
                }
            }
            _ => {}
        }
    }

    /// Handles key events in normal mode. Returns true if app should exit.
    fn handle_normal_keys(
        app: &mut App,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Tab => app.next_tab(),
            KeyCode::BackTab => app.previous_tab(),
            KeyCode::Char(c @ '1'..='9') => {
                app.select_tab(c as usize - '1' as usize);
            }
            KeyCode::Enter => app.open_action_menu(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                app.refresh_active(RefreshMode::Full);
            }
            KeyCode::Char('/') => {
                app.mode = Mode::Filter;
            }
            KeyCode::Esc => {
                app.tabs[app.active_tab].filter.clear();
                app.rebuild_visible();
            }
            KeyCode::Char('[') => app.slow_down_refresh(),
            KeyCode::Char(']') => app.speed_up_refresh(),
            KeyCode::Char('?') => {
                app.mode = Mode::Help;
            }
            KeyCode::Up => app.move_up(),
            KeyCode::Down => app.move_down(),
            KeyCode::PageUp => {
                let (_, h) = terminal::size()?;
                app.page_up((h as usize).saturating_sub(VISIBLE_ROWS_OVERHEAD));
            }
            KeyCode::PageDown => {
                let (_, h) = terminal::size()?;
                app.page_down((h as usize).saturating_sub(VISIBLE_ROWS_OVERHEAD));
            }
            KeyCode::Home => app.jump_to_start(),
            KeyCode::End => app.jump_to_end(),
            _ => {}
        }
        Ok(false)
    }
}
