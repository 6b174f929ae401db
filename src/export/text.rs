//! Plain-text exporter
//!
//! Renders the display cells as an aligned table: one header line, one line
//! per record, columns padded to the widest cell.

use super::{ExportBatch, ExportError, Exporter};

/// Spaces between columns
const COLUMN_GAP: usize = 2;

pub struct TextExporter;

impl Exporter for TextExporter {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn render(&self, batch: &ExportBatch<'_>) -> Result<String, ExportError> {
        let widths = column_widths(batch);
        let mut out = String::new();

        push_row(
            &mut out,
            &widths,
            batch.columns.iter().map(|c| c.to_string()),
        );
        for row in &batch.rows {
            push_row(&mut out, &widths, row.iter().cloned());
        }

        Ok(out)
    }
}

/// Widest cell per column, including the header.
fn column_widths(batch: &ExportBatch<'_>) -> Vec<usize> {
    let mut widths: Vec<usize> = batch.columns.iter().map(|c| c.len()).collect();
    for row in &batch.rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }
    widths
}

fn push_row(out: &mut String, widths: &[usize], cells: impl Iterator<Item = String>) {
    let cells: Vec<String> = cells.collect();
    let last = cells.len().saturating_sub(1);
    for (i, cell) in cells.iter().enumerate() {
        if i == last {
            out.push_str(cell);
        } else {
            let width = widths.get(i).copied().unwrap_or(cell.len());
            out.push_str(&format!("{:<width$}", cell, width = width + COLUMN_GAP));
        }
    }
    out.push('\n');
}
