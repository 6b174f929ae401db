//! Action menu and filename prompt overlays

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::constants::{ACTION_MENU_WIDTH, DIALOG_MARGIN};
use crate::core::Action;

fn draw_border_line(
    stdout: &mut io::Stdout,
    x: usize,
    y: usize,
    left: &str,
    right: &str,
    inner: usize,
) -> io::Result<()> {
    execute!(stdout, MoveTo(x as u16, y as u16))?;
    execute!(
        stdout,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!("{}{}{}", left, "─".repeat(inner), right)),
        ResetColor
    )
}

/// Renders the action menu for the selected entity.
pub fn render_action_menu(
    stdout: &mut io::Stdout,
    actions: &[Action],
    selected: usize,
    width: usize,
    height: usize,
) -> io::Result<()> {
    let box_width = ACTION_MENU_WIDTH.min(width.saturating_sub(DIALOG_MARGIN));
    let inner = box_width - 2;
    let box_height = (actions.len() + 2).min(height.saturating_sub(2));
    let x = (width.saturating_sub(box_width)) / 2;
    let y = (height.saturating_sub(box_height)) / 2;

    draw_border_line(stdout, x, y, "┌", "┐", inner)?;
    for (i, action) in actions.iter().take(box_height - 2).enumerate() {
        execute!(stdout, MoveTo(x as u16, (y + 1 + i) as u16))?;
        let label = format!(" {:<w$}", action.name, w = inner - 1);
        if i == selected {
            execute!(
                stdout,
                SetBackgroundColor(Color::DarkBlue),
                SetForegroundColor(Color::White),
                Print("│"),
                SetBackgroundColor(Color::White),
                SetForegroundColor(Color::Black),
                Print(&label),
                SetBackgroundColor(Color::DarkBlue),
                SetForegroundColor(Color::White),
                Print("│"),
                ResetColor
            )?;
        } else {
            execute!(
                stdout,
                SetBackgroundColor(Color::DarkBlue),
                SetForegroundColor(Color::White),
                Print(format!("│{}│", label)),
                ResetColor
            )?;
        }
    }
    draw_border_line(stdout, x, y + box_height - 1, "└", "┘", inner)?;

    stdout.flush()
}

/// Renders the destination prompt for a file-export action.
pub fn render_filename_prompt(
    stdout: &mut io::Stdout,
    input: &str,
    width: usize,
    height: usize,
) -> io::Result<()> {
    let box_width = (width.saturating_sub(DIALOG_MARGIN)).min(60);
    let inner = box_width - 2;
    let x = (width.saturating_sub(box_width)) / 2;
    let y = height / 2;

    draw_border_line(stdout, x, y.saturating_sub(1), "┌", "┐", inner)?;
    execute!(stdout, MoveTo(x as u16, y as u16))?;
    let mut shown = format!(" Save to: {}█", input);
    let len = shown.chars().count();
    if len > inner {
        // Keep the cursor end of long paths visible.
        shown = shown.chars().skip(len - inner).collect();
    }
    execute!(
        stdout,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!("│{:<w$}│", shown, w = inner)),
        ResetColor
    )?;
    draw_border_line(stdout, x, y + 1, "└", "┘", inner)?;

    stdout.flush()
}
