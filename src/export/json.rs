//! JSON exporter
//!
//! Renders the full serialized records (not just the display cells), so an
//! external consumer can re-import every field the inventory captured.

use super::{ExportBatch, ExportError, Exporter};

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn render(&self, batch: &ExportBatch<'_>) -> Result<String, ExportError> {
        let payload = serde_json::to_string_pretty(&batch.values)?;
        Ok(payload)
    }
}
