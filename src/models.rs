//! Task data model (wire types shared with the remote task service)
//!
//! Uses String timestamps for maximum compatibility with the service.

use serde::{Deserialize, Serialize};

/// Source of a synchronization task, selected by the `datatype` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "datatype", rename_all = "lowercase")]
pub enum Source {
    /// Tabular data read from a spreadsheet file.
    Spreadsheet {
        file_url: String,
        sheet_name: String,
        /// Zero-based row index of the header row (edited as one-based).
        headers_row: u32,
        /// Column headers to carry over to the destination, in order.
        headers: Vec<String>,
    },
    /// Rows produced by a query against the remote system.
    Query { query: String },
}

/// Destination of a synchronization task.
///
/// The query destination exists on the wire but is not implemented by the
/// service; the console refuses to submit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "datatype", rename_all = "lowercase")]
pub enum Destination {
    Spreadsheet { file_url: String, sheet_name: String },
    Query,
}

/// A synchronization task as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    /// Number of repetitions; `0` means unlimited.
    pub sync_times: u32,
    /// Seconds between runs. Always a multiple of 60 when produced here.
    pub sync_rate: u32,
    pub source: Source,
    pub destination: Destination,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub last_run: Option<String>,
    /// `true` success, `false` failure, `None` never run.
    #[serde(default)]
    pub last_result: Option<bool>,
}

/// Body of a create/update request. The service owns id and run state, so
/// neither is ever submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub name: String,
    pub sync_times: u32,
    pub sync_rate: u32,
    pub source: Source,
    pub destination: Destination,
}

/// Execution state reported by the service after a run-state command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Stopped,
}

impl RunState {
    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}

/// A partial mutation affecting only execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunCommand {
    Start,
    Stop,
    Restart,
}

impl RunCommand {
    /// Path segment of the PATCH request.
    pub fn as_str(self) -> &'static str {
        match self {
            RunCommand::Start => "start",
            RunCommand::Stop => "stop",
            RunCommand::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_discriminator_selects_exactly_one_shape() {
        let source: Source = serde_json::from_value(serde_json::json!({
            "datatype": "spreadsheet",
            "file_url": "https://files.example.com/in.xlsx",
            "sheet_name": "Sheet1",
            "headers_row": 0,
            "headers": ["Id", "Amount"],
        }))
        .unwrap();
        assert!(matches!(source, Source::Spreadsheet { .. }));

        let source: Source = serde_json::from_value(serde_json::json!({
            "datatype": "query",
            "query": "SELECT id FROM transaction",
        }))
        .unwrap();
        assert_eq!(
            source,
            Source::Query {
                query: "SELECT id FROM transaction".into()
            }
        );
    }

    #[test]
    fn payload_serializes_variant_fields_only() {
        let payload = TaskPayload {
            name: "Daily revenue".into(),
            sync_times: 0,
            sync_rate: 120,
            source: Source::Query {
                query: "SELECT * FROM revenue".into(),
            },
            destination: Destination::Spreadsheet {
                file_url: "https://files.example.com/out.xlsx".into(),
                sheet_name: "Export".into(),
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["source"]["datatype"], "query");
        assert!(value["source"].get("file_url").is_none());
        assert_eq!(value["destination"]["datatype"], "spreadsheet");
        assert_eq!(value["destination"]["sheet_name"], "Export");
    }

    #[test]
    fn task_with_no_runs_deserializes_defaults() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "B",
            "sync_times": 1,
            "sync_rate": 60,
            "source": { "datatype": "query", "query": "SELECT 1" },
            "destination": {
                "datatype": "spreadsheet",
                "file_url": "https://files.example.com/b.xlsx",
                "sheet_name": "S",
            },
        }))
        .unwrap();

        assert!(!task.running);
        assert_eq!(task.last_run, None);
        assert_eq!(task.last_result, None);
    }

    #[test]
    fn run_state_parses_wire_strings() {
        assert_eq!(
            serde_json::from_str::<RunState>("\"running\"").unwrap(),
            RunState::Running
        );
        assert_eq!(
            serde_json::from_str::<RunState>("\"stopped\"").unwrap(),
            RunState::Stopped
        );
    }
}
