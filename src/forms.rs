//! Task form decoding and the display/wire boundary conversions
//!
//! The form edits sync rate in whole minutes and the headers row as a
//! one-based number; the service stores seconds and a zero-based index.
//! Conversions happen here and only here.

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Destination, Source, Task, TaskPayload};

/// Submit-button discriminator carried in the form body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Post,
    Put,
    Delete,
}

/// Datatype choice offered by the source/destination selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datatype {
    Spreadsheet,
    Query,
}

impl Datatype {
    pub const ALL: [Datatype; 2] = [Datatype::Spreadsheet, Datatype::Query];

    /// Wire value, also used as the option value in the selects.
    pub fn as_str(self) -> &'static str {
        match self {
            Datatype::Spreadsheet => "spreadsheet",
            Datatype::Query => "query",
        }
    }

    /// Human label shown in the selects.
    pub fn label(self) -> &'static str {
        match self {
            Datatype::Spreadsheet => "Spreadsheet file",
            Datatype::Query => "SuiteQL query",
        }
    }

    /// Parse a submitted select value; the placeholder option is empty.
    pub fn from_param(value: &str) -> Option<Datatype> {
        match value {
            "spreadsheet" => Some(Datatype::Spreadsheet),
            "query" => Some(Datatype::Query),
            _ => None,
        }
    }
}

/// Raw task form fields, exactly as the browser posts them.
///
/// Also decoded from the query string when a datatype select re-submits the
/// form for re-rendering, so every field is optional here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sync_times: Option<String>,
    #[serde(default)]
    pub sync_rate: Option<String>,
    #[serde(default)]
    pub source_datatype: Option<String>,
    #[serde(default)]
    pub source_file_url: Option<String>,
    #[serde(default)]
    pub source_sheet_name: Option<String>,
    #[serde(default)]
    pub source_headers_row: Option<String>,
    #[serde(default)]
    pub source_headers: Option<String>,
    #[serde(default)]
    pub source_query: Option<String>,
    #[serde(default)]
    pub destination_datatype: Option<String>,
    #[serde(default)]
    pub destination_file_url: Option<String>,
    #[serde(default)]
    pub destination_sheet_name: Option<String>,
    #[serde(default)]
    pub intent: Option<Intent>,
}

/// Reasons a submission cannot be turned into a service payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required.")]
    Missing(&'static str),
    #[error("{0} must be a whole number (at least {1}).")]
    Number(&'static str, u32),
    #[error("The query destination isn't implemented yet. Please choose another destination datatype.")]
    QueryDestination,
}

impl TaskForm {
    /// Build the create/update payload, applying the boundary conversions.
    ///
    /// Only fields of the selected source/destination variants are read;
    /// everything else the form may have carried is dropped. Selecting the
    /// query destination is refused here, before any request is built.
    pub fn to_payload(&self) -> Result<TaskPayload, FormError> {
        let name = required(&self.name, "Task name")?;
        let sync_times = number(&self.sync_times, "Times to execute", 0)?;
        let sync_rate = number(&self.sync_rate, "Synchronization rate", 1)? * 60;

        let source = match self.source_datatype() {
            Some(Datatype::Spreadsheet) => Source::Spreadsheet {
                file_url: required(&self.source_file_url, "Source file URL")?,
                sheet_name: required(&self.source_sheet_name, "Source sheet name")?,
                headers_row: number(&self.source_headers_row, "Headers row number", 1)? - 1,
                headers: split_headers(&required(&self.source_headers, "Headers")?),
            },
            Some(Datatype::Query) => Source::Query {
                query: required(&self.source_query, "SuiteQL query")?,
            },
            None => return Err(FormError::Missing("Source datatype")),
        };

        let destination = match self.destination_datatype() {
            Some(Datatype::Spreadsheet) => Destination::Spreadsheet {
                file_url: required(&self.destination_file_url, "Destination file URL")?,
                sheet_name: required(&self.destination_sheet_name, "Destination sheet name")?,
            },
            Some(Datatype::Query) => return Err(FormError::QueryDestination),
            None => return Err(FormError::Missing("Destination datatype")),
        };

        Ok(TaskPayload {
            name,
            sync_times,
            sync_rate,
            source,
            destination,
        })
    }

    pub fn source_datatype(&self) -> Option<Datatype> {
        self.source_datatype.as_deref().and_then(Datatype::from_param)
    }

    pub fn destination_datatype(&self) -> Option<Datatype> {
        self.destination_datatype
            .as_deref()
            .and_then(Datatype::from_param)
    }

    /// True once any field carries input (a datatype-change re-submission).
    pub fn is_echo(&self) -> bool {
        self.name.is_some()
            || self.source_datatype.is_some()
            || self.destination_datatype.is_some()
    }
}

/// Display-level form values used to render the task form.
#[derive(Debug, Clone, Default)]
pub struct FormFill {
    pub name: String,
    /// Repetition count, as typed.
    pub sync_times: String,
    /// Whole minutes.
    pub sync_rate: String,
    pub source_datatype: Option<Datatype>,
    pub source_file_url: String,
    pub source_sheet_name: String,
    /// One-based row number.
    pub source_headers_row: String,
    /// Newline-joined header list.
    pub source_headers: String,
    pub source_query: String,
    pub destination_datatype: Option<Datatype>,
    pub destination_file_url: String,
    pub destination_sheet_name: String,
}

impl FormFill {
    /// Prefill from a fetched task, applying the inverse conversions.
    pub fn from_task(task: &Task) -> Self {
        let mut fill = FormFill {
            name: task.name.clone(),
            sync_times: task.sync_times.to_string(),
            sync_rate: (task.sync_rate / 60).to_string(),
            ..FormFill::default()
        };

        match &task.source {
            Source::Spreadsheet {
                file_url,
                sheet_name,
                headers_row,
                headers,
            } => {
                fill.source_datatype = Some(Datatype::Spreadsheet);
                fill.source_file_url = file_url.clone();
                fill.source_sheet_name = sheet_name.clone();
                fill.source_headers_row = (headers_row + 1).to_string();
                fill.source_headers = headers.join("\n");
            }
            Source::Query { query } => {
                fill.source_datatype = Some(Datatype::Query);
                fill.source_query = query.clone();
            }
        }

        match &task.destination {
            Destination::Spreadsheet {
                file_url,
                sheet_name,
            } => {
                fill.destination_datatype = Some(Datatype::Spreadsheet);
                fill.destination_file_url = file_url.clone();
                fill.destination_sheet_name = sheet_name.clone();
            }
            Destination::Query => fill.destination_datatype = Some(Datatype::Query),
        }

        fill
    }

    /// Echo the user's entries back into the form unchanged.
    pub fn from_form(form: &TaskForm) -> Self {
        FormFill {
            name: form.name.clone().unwrap_or_default(),
            sync_times: form.sync_times.clone().unwrap_or_default(),
            sync_rate: form.sync_rate.clone().unwrap_or_default(),
            source_datatype: form.source_datatype(),
            source_file_url: form.source_file_url.clone().unwrap_or_default(),
            source_sheet_name: form.source_sheet_name.clone().unwrap_or_default(),
            source_headers_row: form.source_headers_row.clone().unwrap_or_default(),
            source_headers: form.source_headers.clone().unwrap_or_default(),
            source_query: form.source_query.clone().unwrap_or_default(),
            destination_datatype: form.destination_datatype(),
            destination_file_url: form.destination_file_url.clone().unwrap_or_default(),
            destination_sheet_name: form.destination_sheet_name.clone().unwrap_or_default(),
        }
    }
}

fn required(value: &Option<String>, label: &'static str) -> Result<String, FormError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(FormError::Missing(label)),
    }
}

fn number(value: &Option<String>, label: &'static str, min: u32) -> Result<u32, FormError> {
    let parsed = value
        .as_deref()
        .map(str::trim)
        .and_then(|v| v.parse::<u32>().ok());
    match parsed {
        Some(n) if n >= min => Ok(n),
        _ => Err(FormError::Number(label, min)),
    }
}

/// One header per textarea line. Browsers post CRLF line endings.
fn split_headers(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spreadsheet_form() -> TaskForm {
        TaskForm {
            name: Some("Daily revenue".into()),
            sync_times: Some("0".into()),
            sync_rate: Some("2".into()),
            source_datatype: Some("spreadsheet".into()),
            source_file_url: Some("https://files.example.com/in.xlsx".into()),
            source_sheet_name: Some("Sheet1".into()),
            source_headers_row: Some("3".into()),
            source_headers: Some("Id\r\nAmount\r\nDate".into()),
            destination_datatype: Some("spreadsheet".into()),
            destination_file_url: Some("https://files.example.com/out.xlsx".into()),
            destination_sheet_name: Some("Export".into()),
            intent: Some(Intent::Post),
            ..TaskForm::default()
        }
    }

    #[test]
    fn sync_rate_is_transmitted_in_seconds() {
        let payload = spreadsheet_form().to_payload().unwrap();
        assert_eq!(payload.sync_rate, 120);
    }

    #[test]
    fn headers_row_is_transmitted_zero_based() {
        let payload = spreadsheet_form().to_payload().unwrap();
        match payload.source {
            Source::Spreadsheet { headers_row, .. } => assert_eq!(headers_row, 2),
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn headers_textarea_splits_on_newlines() {
        let payload = spreadsheet_form().to_payload().unwrap();
        match payload.source {
            Source::Spreadsheet { headers, .. } => {
                assert_eq!(headers, vec!["Id", "Amount", "Date"]);
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn prefill_round_trips_the_displayed_values() {
        let payload = spreadsheet_form().to_payload().unwrap();
        let task = Task {
            id: 7,
            name: payload.name,
            sync_times: payload.sync_times,
            sync_rate: payload.sync_rate,
            source: payload.source,
            destination: payload.destination,
            running: false,
            last_run: None,
            last_result: None,
        };

        let fill = FormFill::from_task(&task);
        assert_eq!(fill.sync_rate, "2");
        assert_eq!(fill.source_headers_row, "3");
        assert_eq!(fill.source_headers, "Id\nAmount\nDate");
    }

    #[test]
    fn query_destination_is_refused() {
        let form = TaskForm {
            destination_datatype: Some("query".into()),
            ..spreadsheet_form()
        };
        assert_eq!(form.to_payload(), Err(FormError::QueryDestination));
    }

    #[test]
    fn unselected_variant_fields_are_dropped() {
        let form = TaskForm {
            source_datatype: Some("query".into()),
            source_query: Some("SELECT * FROM revenue".into()),
            ..spreadsheet_form()
        };
        let payload = form.to_payload().unwrap();
        assert_eq!(
            payload.source,
            Source::Query {
                query: "SELECT * FROM revenue".into()
            }
        );
    }

    #[test]
    fn blank_required_fields_are_reported_by_label() {
        let form = TaskForm {
            name: Some("   ".into()),
            ..spreadsheet_form()
        };
        assert_eq!(form.to_payload(), Err(FormError::Missing("Task name")));

        let form = TaskForm {
            sync_rate: Some("0".into()),
            ..spreadsheet_form()
        };
        assert_eq!(
            form.to_payload(),
            Err(FormError::Number("Synchronization rate", 1))
        );
    }
}
