//! Exporters and the exporter registry
//!
//! An exporter renders a batch of entity records into a string payload; the
//! controller decides whether that payload goes to a file or to the
//! clipboard. The registry is built explicitly during application startup
//! (ordered, testable) and then shared read-only by every controller for the
//! process lifetime; there is no unregister.

mod json;
mod text;

use thiserror::Error;

pub use json::JsonExporter;
pub use text::TextExporter;

/// Rendering failure inside an exporter.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// One batch of records from a single inventory, prepared for rendering.
pub struct ExportBatch<'a> {
    /// Inventory title ("Services", "Processes", ...)
    pub title: &'a str,
    /// Column headers for tabular formats
    pub columns: &'static [&'static str],
    /// Display cells per record, aligned with `columns`
    pub rows: Vec<Vec<String>>,
    /// Full serialized records for structured formats
    pub values: Vec<serde_json::Value>,
}

/// Renders an export batch into a text payload.
pub trait Exporter {
    /// Format name used for registry lookup ("JSON", "Text").
    /// Lookup is case-sensitive and exact.
    fn name(&self) -> &'static str;

    /// Renders the batch.
    fn render(&self, batch: &ExportBatch<'_>) -> Result<String, ExportError>;
}

/// Registry mapping format name -> exporter, owning all registered
/// exporters for the process lifetime.
pub struct ExporterRegistry {
    exporters: Vec<Box<dyn Exporter>>,
}

impl ExporterRegistry {
    /// Empty registry; formats are added with [`register`](Self::register).
    pub fn new() -> Self {
        Self {
            exporters: Vec::new(),
        }
    }

    /// Registry pre-populated with the built-in JSON and text exporters,
    /// as used by both front-ends.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JsonExporter));
        registry.register(Box::new(TextExporter));
        registry
    }

    /// Adds an exporter. A later registration under an existing name is
    /// shadowed by the earlier one.
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters.push(exporter);
    }

    /// Case-sensitive exact lookup; `None` on miss.
    pub fn find(&self, name: &str) -> Option<&dyn Exporter> {
        self.exporters
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.as_ref())
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> ExportBatch<'static> {
        ExportBatch {
            title: "Services",
            columns: &["Name", "State"],
            rows: vec![
                vec!["Spooler".into(), "Running".into()],
                vec!["W32Time".into(), "Stopped".into()],
            ],
            values: vec![
                serde_json::json!({"name": "Spooler", "state": "Running"}),
                serde_json::json!({"name": "W32Time", "state": "Stopped"}),
            ],
        }
    }

    #[test]
    fn find_is_exact_and_case_sensitive() {
        let registry = ExporterRegistry::with_defaults();
        assert!(registry.find("JSON").is_some());
        assert!(registry.find("Text").is_some());
        assert!(registry.find("json").is_none());
        assert!(registry.find("unknown-format").is_none());
    }

    #[test]
    fn json_export_round_trips_field_values() {
        let registry = ExporterRegistry::with_defaults();
        let exporter = registry.find("JSON").unwrap();
        let payload = exporter.render(&batch()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "Spooler");
        assert_eq!(entries[1]["state"], "Stopped");
    }

    #[test]
    fn text_export_aligns_columns_under_a_header() {
        let registry = ExporterRegistry::with_defaults();
        let exporter = registry.find("Text").unwrap();
        let payload = exporter.render(&batch()).unwrap();

        let lines: Vec<&str> = payload.lines().collect();
        assert!(lines[0].contains("Name") && lines[0].contains("State"));
        assert!(lines.iter().any(|l| l.contains("Spooler")));
        // All data rows start their second column at the same offset
        let offset = lines[0].find("State").unwrap();
        assert_eq!(lines[1].find("Running"), Some(offset));
        assert_eq!(lines[2].find("Stopped"), Some(offset));
    }

    #[test]
    fn first_registration_wins_on_name_clash() {
        struct Fake;
        impl Exporter for Fake {
            fn name(&self) -> &'static str {
                "JSON"
            }
            fn render(&self, _: &ExportBatch<'_>) -> Result<String, ExportError> {
                Ok("fake".into())
            }
        }

        let mut registry = ExporterRegistry::with_defaults();
        registry.register(Box::new(Fake));
        let payload = registry.find("JSON").unwrap().render(&batch()).unwrap();
        assert_ne!(payload, "fake");
    }
}
