//! Help overlay rendering

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::constants::HELP_DIALOG_WIDTH;

/// Help content definition
const HELP_LINES: &[(&str, &str)] = &[
    ("", ""),
    ("NAVIGATION", ""),
    ("  Up/Down", "Move selection up/down"),
    ("  PgUp/PgDn", "Scroll by page"),
    ("  Home/End", "Jump to first/last entry"),
    ("  Tab/Shift+Tab", "Next/previous inventory"),
    ("  1-9", "Jump to inventory"),
    ("", ""),
    ("ACTIONS", ""),
    ("  Enter", "Open action menu for selection"),
    ("  Esc", "Close menu / clear filter"),
    ("", ""),
    ("VIEW OPTIONS", ""),
    ("  /", "Filter the current inventory"),
    ("  r", "Refresh now"),
    ("  [", "Slow down auto-refresh"),
    ("  ]", "Speed up auto-refresh"),
    ("", ""),
    ("OTHER", ""),
    ("  ?", "Show/hide this help"),
    ("  q", "Quit application"),
    ("  Ctrl+C", "Quit application"),
];

/// Renders the help overlay showing all keyboard shortcuts
pub fn render_help_overlay(
    stdout: &mut io::Stdout,
    width: usize,
    height: usize,
) -> io::Result<()> {
    let box_width = HELP_DIALOG_WIDTH;
    let inner_width = box_width - 2;
    let box_height = (HELP_LINES.len() + 4).min(height.saturating_sub(2));
    let start_x = (width.saturating_sub(box_width)) / 2;
    let start_y = (height.saturating_sub(box_height)) / 2;

    let draw_bordered_line =
        |stdout: &mut io::Stdout, y: usize, content: &str, fg: Color| -> io::Result<()> {
            execute!(stdout, MoveTo(start_x as u16, y as u16))?;
            let padded: String = format!("{:<w$}", content, w = inner_width)
                .chars()
                .take(inner_width)
                .collect();
            execute!(
                stdout,
                SetBackgroundColor(Color::DarkBlue),
                SetForegroundColor(fg),
                Print("│"),
                Print(&padded),
                Print("│"),
                ResetColor
            )
        };

    // Top border and title
    execute!(stdout, MoveTo(start_x as u16, start_y as u16))?;
    execute!(
        stdout,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!("┌{}┐", "─".repeat(inner_width))),
        ResetColor
    )?;

    let title = "Keyboard Shortcuts";
    let pad = (inner_width.saturating_sub(title.len())) / 2;
    let title_line = format!(
        "{:>pad$}{}{:<rpad$}",
        "",
        title,
        "",
        pad = pad,
        rpad = inner_width - pad - title.len()
    );
    draw_bordered_line(stdout, start_y + 1, &title_line, Color::Yellow)?;

    execute!(stdout, MoveTo(start_x as u16, (start_y + 2) as u16))?;
    execute!(
        stdout,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!("├{}┤", "─".repeat(inner_width))),
        ResetColor
    )?;

    for (i, (key, desc)) in HELP_LINES.iter().enumerate() {
        let y = start_y + 3 + i;
        if y >= start_y + box_height - 1 {
            break;
        }

        if key.is_empty() && desc.is_empty() {
            draw_bordered_line(stdout, y, "", Color::White)?;
        } else if desc.is_empty() {
            draw_bordered_line(stdout, y, &format!(" {}", key), Color::Cyan)?;
        } else {
            let key_col = 16;
            execute!(stdout, MoveTo(start_x as u16, y as u16))?;
            execute!(
                stdout,
                SetBackgroundColor(Color::DarkBlue),
                SetForegroundColor(Color::White),
                Print("│"),
                SetForegroundColor(Color::Green),
                Print(&format!(" {:<kw$}", key, kw = key_col)),
                SetForegroundColor(Color::White),
                Print(&format!("{:<dw$}", desc, dw = inner_width - key_col - 1)),
                Print("│"),
                ResetColor
            )?;
        }
    }

    // Bottom border with hint
    execute!(
        stdout,
        MoveTo(start_x as u16, (start_y + box_height - 1) as u16)
    )?;
    let hint = " Press any key to close ";
    let hint_pad = (inner_width.saturating_sub(hint.len())) / 2;
    execute!(
        stdout,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print("└"),
        Print(&"─".repeat(hint_pad)),
        SetForegroundColor(Color::Yellow),
        Print(hint),
        SetForegroundColor(Color::White),
        Print(&"─".repeat(inner_width - hint_pad - hint.len())),
        Print("┘"),
        ResetColor
    )?;

    stdout.flush()
}
