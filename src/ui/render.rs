//! Terminal rendering logic

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::app::{App, Mode};
use crate::constants::{DISPLAY_NAME, VISIBLE_ROWS_OVERHEAD};
use crate::core::VisualState;

use super::help::render_help_overlay;
use super::menu::{render_action_menu, render_filename_prompt};

/// Color for one entity row, keyed by its snapshot state.
fn state_color(state: VisualState) -> Color {
    match state {
        VisualState::Active => Color::Green,
        VisualState::Inactive => Color::DarkGrey,
        VisualState::Transitional => Color::Yellow,
        VisualState::Unavailable => Color::DarkRed,
        VisualState::Neutral => Color::White,
    }
}

/// Renders the UI to the terminal
pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let width = width as usize;
    let height = height as usize;

    execute!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;

    render_header(stdout, width)?;
    render_tab_bar(stdout, app, width)?;
    render_filter_bar(stdout, app, width)?;

    let visible_rows = height.saturating_sub(VISIBLE_ROWS_OVERHEAD);
    let widths = column_layout(app, visible_rows, width);
    render_column_headers(stdout, app, &widths, width)?;
    render_entity_table(stdout, app, &widths, visible_rows, width)?;
    render_footer(stdout, app, width, height)?;

    match &app.mode {
        Mode::ActionMenu { actions, selected } => {
            render_action_menu(stdout, actions, *selected, width, height)?;
        }
        Mode::FilenamePrompt { input, .. } => {
            render_filename_prompt(stdout, input, width, height)?;
        }
        Mode::Help => {
            render_help_overlay(stdout, width, height)?;
        }
        _ => {}
    }

    stdout.flush()
}

/// Renders the application header
fn render_header(stdout: &mut io::Stdout, width: usize) -> io::Result<()> {
    execute!(
        stdout,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!(" {:width$}", DISPLAY_NAME, width = width.saturating_sub(1))),
        ResetColor,
        Print("\r\n")
    )
}

/// Renders one highlighted tab per inventory
fn render_tab_bar(stdout: &mut io::Stdout, app: &App, width: usize) -> io::Result<()> {
    let mut used = 0usize;
    execute!(stdout, Print(" "))?;
    for (i, inventory) in app.inventories.iter().enumerate() {
        let label = format!(" {}:{} ", i + 1, inventory.title());
        if used + label.len() >= width {
            break;
        }
        used += label.len();
        if i == app.active_tab {
            execute!(
                stdout,
                SetBackgroundColor(Color::DarkCyan),
                SetForegroundColor(Color::Black),
                Print(&label),
                ResetColor
            )?;
        } else {
            execute!(stdout, SetForegroundColor(Color::DarkGrey), Print(&label), ResetColor)?;
        }
    }
    execute!(stdout, Print("\r\n"))
}

/// Renders the filter bar
fn render_filter_bar(stdout: &mut io::Stdout, app: &App, width: usize) -> io::Result<()> {
    let tab = app.active_tab_state();
    if matches!(app.mode, Mode::Filter) {
        execute!(
            stdout,
            SetBackgroundColor(Color::DarkYellow),
            SetForegroundColor(Color::Black),
            Print(format!(
                " Filter: {}█{:width$}",
                tab.filter,
                "",
                width = width.saturating_sub(tab.filter.len() + 10)
            )),
            ResetColor,
            Print("\r\n")
        )
    } else if !tab.filter.is_empty() {
        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print(format!(
                " Filter: \"{}\" ({}/{} shown, / to edit, Esc to clear)",
                tab.filter,
                tab.visible.len(),
                app.active_inventory().len()
            )),
            ResetColor,
            Print("\r\n")
        )
    } else {
        execute!(stdout, Print("\r\n"))
    }
}

/// Column widths for the active inventory, fitted to the visible rows.
fn column_layout(app: &App, visible_rows: usize, width: usize) -> Vec<usize> {
    let inventory = app.active_inventory();
    let tab = app.active_tab_state();
    let columns = inventory.columns();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();

    for &index in tab.visible.iter().skip(tab.scroll_offset).take(visible_rows) {
        if let Some(cells) = inventory.row(index) {
            for (w, cell) in widths.iter_mut().zip(&cells) {
                *w = (*w).max(cell.len());
            }
        }
    }

    // The last column absorbs whatever space is left.
    let fixed: usize = widths.iter().take(widths.len().saturating_sub(1)).sum::<usize>()
        + 2 * widths.len();
    if let Some(last) = widths.last_mut() {
        *last = (*last).min(width.saturating_sub(fixed).max(8));
    }
    widths
}

/// Truncation that tolerates non-ASCII cell content.
fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn format_row(cells: &[String], widths: &[usize], width: usize) -> String {
    let mut line = String::with_capacity(width);
    for (cell, &w) in cells.iter().zip(widths) {
        line.push_str(&format!(" {:<w$} ", clip(cell, w), w = w));
    }
    clip(&line, width)
}

/// Renders column headers
fn render_column_headers(
    stdout: &mut io::Stdout,
    app: &App,
    widths: &[usize],
    width: usize,
) -> io::Result<()> {
    let columns: Vec<String> = app
        .active_inventory()
        .columns()
        .iter()
        .map(|c| c.to_string())
        .collect();
    let header = format_row(&columns, widths, width);
    execute!(
        stdout,
        SetBackgroundColor(Color::DarkGrey),
        SetForegroundColor(Color::White),
        Print(format!("{:width$}", header, width = width)),
        ResetColor,
        Print("\r\n")
    )
}

/// Renders the entity table for the active tab
fn render_entity_table(
    stdout: &mut io::Stdout,
    app: &mut App,
    widths: &[usize],
    visible_rows: usize,
    width: usize,
) -> io::Result<()> {
    // Keep the selection on screen.
    let tab = &mut app.tabs[app.active_tab];
    if tab.selected_index < tab.scroll_offset {
        tab.scroll_offset = tab.selected_index;
    } else if visible_rows > 0 && tab.selected_index >= tab.scroll_offset + visible_rows {
        tab.scroll_offset = tab.selected_index - visible_rows + 1;
    }

    let inventory = app.inventories[app.active_tab].as_ref();
    let tab = &app.tabs[app.active_tab];
    for (i, &index) in tab
        .visible
        .iter()
        .enumerate()
        .skip(tab.scroll_offset)
        .take(visible_rows)
    {
        let cells = inventory.row(index).unwrap_or_default();
        let line = format_row(&cells, widths, width);
        if i == tab.selected_index {
            execute!(
                stdout,
                SetBackgroundColor(Color::White),
                SetForegroundColor(Color::Black),
                Print(format!("{:width$}", line, width = width)),
                ResetColor,
                Print("\r\n")
            )?;
        } else {
            execute!(
                stdout,
                SetForegroundColor(state_color(inventory.visual_state(index))),
                Print(line),
                ResetColor,
                Print("\r\n")
            )?;
        }
    }
    Ok(())
}

/// Renders the footer: message line plus the key hint line
fn render_footer(
    stdout: &mut io::Stdout,
    app: &App,
    width: usize,
    height: usize,
) -> io::Result<()> {
    execute!(stdout, MoveTo(0, height.saturating_sub(2) as u16))?;
    if let Some(message) = &app.message {
        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print(format!(" {:width$}", message, width = width.saturating_sub(1))),
            ResetColor
        )?;
    } else {
        execute!(stdout, Print(format!("{:width$}", "", width = width)))?;
    }

    execute!(stdout, MoveTo(0, height.saturating_sub(1) as u16))?;
    let hints = format!(
        " Tab:Switch  Enter:Actions  r:Refresh  /:Filter  [ ]:Rate({}ms)  ?:Help  q:Quit",
        app.refresh_interval_ms
    );
    execute!(
        stdout,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!("{:width$}", hints, width = width)),
        ResetColor
    )?;
    Ok(())
}
