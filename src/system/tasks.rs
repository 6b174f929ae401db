//! Scheduled-task enumeration and control via schtasks.exe
//!
//! The scheduler is queried with `schtasks /Query /FO CSV /V` and mutated
//! with `/Run`, `/End` and `/Change`. The verbose CSV repeats its header
//! row per task folder, so the parser re-detects headers and maps columns
//! by name instead of position.

use std::process::{Command, Output};

use tracing::trace;

use crate::core::{ActionError, ActionOutcome, Provider, RefreshError, Verb};
use crate::model::TaskEntry;

/// Splits one CSV line, honoring quoted fields and doubled quotes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Column positions within one header section of the verbose output.
struct Columns {
    task_name: usize,
    status: Option<usize>,
    state: Option<usize>,
    last_run: Option<usize>,
    next_run: Option<usize>,
    last_result: Option<usize>,
}

impl Columns {
    fn from_header(fields: &[String]) -> Option<Self> {
        let find = |name: &str| fields.iter().position(|f| f == name);
        Some(Self {
            task_name: find("TaskName")?,
            status: find("Status"),
            state: find("Scheduled Task State"),
            last_run: find("Last Run Time"),
            next_run: find("Next Run Time"),
            last_result: find("Last Result"),
        })
    }
}

fn optional_field(fields: &[String], index: Option<usize>) -> Option<String> {
    let value = fields.get(index?)?.trim();
    if value.is_empty() || value == "N/A" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parses the verbose CSV into task records. Rows for the same task (one
/// per trigger) are emitted as-is; the container keeps the first.
fn parse_task_csv(csv: &str) -> Vec<TaskEntry> {
    let mut tasks = Vec::new();
    let mut columns: Option<Columns> = None;

    for line in csv.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(line);
        if fields.first().map(String::as_str) == Some("HostName") {
            columns = Columns::from_header(&fields);
            continue;
        }
        let Some(cols) = &columns else { continue };
        let Some(path) = fields.get(cols.task_name) else {
            continue;
        };
        if !path.starts_with('\\') {
            continue;
        }

        let status = optional_field(&fields, cols.status).unwrap_or_default();
        let state = optional_field(&fields, cols.state);
        tasks.push(TaskEntry {
            name: path.rsplit('\\').next().unwrap_or(path).to_string(),
            path: path.clone(),
            enabled: state.as_deref() == Some("Enabled"),
            running: status == "Running",
            status,
            last_run: optional_field(&fields, cols.last_run),
            next_run: optional_field(&fields, cols.next_run),
            last_result: optional_field(&fields, cols.last_result)
                .and_then(|v| v.parse::<i32>().ok()),
        });
    }

    tasks
}

/// Enumerates every registered scheduled task.
pub struct TaskProvider;

impl Provider<TaskEntry> for TaskProvider {
    fn snapshot(&mut self) -> Result<Vec<TaskEntry>, RefreshError> {
        let output = Command::new("schtasks")
            .args(["/Query", "/FO", "CSV", "/V"])
            .output()
            .map_err(|e| RefreshError::Enumerate {
                kind: "tasks",
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(RefreshError::Enumerate {
                kind: "tasks",
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(parse_task_csv(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Runs, ends, enables and disables tasks through schtasks.
pub struct TaskExecutor;

impl TaskExecutor {
    fn schtasks(&self, args: &[&str], target: &TaskEntry) -> Result<(), ActionError> {
        trace!(task = %target.path, ?args, "schtasks");
        let output: Output = Command::new("schtasks").args(args).output()?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // schtasks reports an unregistered task name in prose.
        if stderr.contains("does not exist") {
            return Err(ActionError::TargetVanished {
                id: target.path.clone(),
            });
        }
        Err(ActionError::Os {
            operation: "schtasks",
            reason: stderr,
        })
    }
}

impl crate::core::Executor<TaskEntry> for TaskExecutor {
    fn run(&mut self, verb: Verb, target: &TaskEntry) -> Result<ActionOutcome, ActionError> {
        let path = target.path.as_str();
        match verb {
            Verb::RunTask => {
                self.schtasks(&["/Run", "/TN", path], target)?;
                Ok(ActionOutcome::Requested(format!("Run requested for {}", target.name)))
            }
            Verb::EndTask => {
                self.schtasks(&["/End", "/TN", path], target)?;
                Ok(ActionOutcome::Requested(format!("End requested for {}", target.name)))
            }
            Verb::EnableTask => {
                self.schtasks(&["/Change", "/TN", path, "/ENABLE"], target)?;
                Ok(ActionOutcome::Requested(format!("{} enabled", target.name)))
            }
            Verb::DisableTask => {
                self.schtasks(&["/Change", "/TN", path, "/DISABLE"], target)?;
                Ok(ActionOutcome::Requested(format!("{} disabled", target.name)))
            }
            _ => Err(ActionError::NotApplicable {
                action: "action",
                target: target.name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_fields_respect_quotes() {
        let fields = split_csv_line(r#""\Folder\Task","Ready","a ""quoted"" word""#);
        assert_eq!(fields, vec!["\\Folder\\Task", "Ready", "a \"quoted\" word"]);
    }

    #[test]
    fn repeated_headers_are_redetected() {
        let csv = "\
\"HostName\",\"TaskName\",\"Status\",\"Last Run Time\",\"Next Run Time\",\"Last Result\",\"Scheduled Task State\"\n\
\"PC\",\"\\Maintenance\\Defrag\",\"Ready\",\"N/A\",\"12/01/2026 03:00:00\",\"0\",\"Enabled\"\n\
\"HostName\",\"TaskName\",\"Status\",\"Last Run Time\",\"Next Run Time\",\"Last Result\",\"Scheduled Task State\"\n\
\"PC\",\"\\Backup\\Nightly\",\"Running\",\"11/30/2026 02:00:00\",\"N/A\",\"267009\",\"Disabled\"\n";
        let tasks = parse_task_csv(csv);
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].path, "\\Maintenance\\Defrag");
        assert_eq!(tasks[0].name, "Defrag");
        assert!(tasks[0].enabled);
        assert!(!tasks[0].running);
        assert_eq!(tasks[0].last_run, None);
        assert_eq!(tasks[0].last_result, Some(0));

        assert!(tasks[1].running);
        assert!(!tasks[1].enabled);
        assert_eq!(tasks[1].last_result, Some(267009));
    }

    #[test]
    fn non_task_rows_are_skipped() {
        let csv = "\nINFO: There are no scheduled tasks presently available at your access level.\n";
        assert!(parse_task_csv(csv).is_empty());
    }
}
