//! HTML views for the console
//!
//! Pages are plain strings; every interpolated value goes through `escape`.
//! The list page carries a meta refresh so the table re-fetches itself every
//! ten seconds for as long as it is displayed.

use crate::forms::{Datatype, FormFill};
use crate::models::Task;

pub const APP_TITLE: &str = "Syncer Console";

/// Warning shown in place of destination fields for the query datatype.
pub const UNIMPLEMENTED_DESTINATION: &str =
    "This isn't yet implemented! Please choose another destination datatype.";

/// Seconds between list-page refreshes.
const REFRESH_SECS: u32 = 10;

const STYLESHEET: &str = r#"<link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet">"#;

/// Escape a value for interpolation into HTML text or attributes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page chrome. Every page title flows through here.
fn layout(title: &str, refresh_secs: Option<u32>, body: &str) -> String {
    let refresh = refresh_secs
        .map(|secs| format!("<meta http-equiv=\"refresh\" content=\"{secs}\">\n"))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}<title>{title} | {APP_TITLE}</title>
{STYLESHEET}
</head>
<body>
<nav class="navbar navbar-expand-lg bg-body-secondary">
  <div class="container-fluid">
    <a href="/" class="navbar-brand my-2">{APP_TITLE}</a>
    <ul class="navbar-nav nav-underline mx-auto">
      <li class="nav-item"><a href="/" class="nav-link">Home</a></li>
      <li class="nav-item"><a href="/tasks" class="nav-link">Tasks</a></li>
    </ul>
  </div>
</nav>
<main class="py-3">
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn alert_banner(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(
            r#"<div class="container"><div class="alert alert-danger" role="alert">{}</div></div>"#,
            escape(message),
        ),
        None => String::new(),
    }
}

/// Landing page.
pub fn home() -> String {
    layout(
        "Home",
        None,
        r#"<div class="text-center mt-5">
<h1 class="mt-5">A web application that manages data synchronization tasks.</h1>
</div>"#,
    )
}

/// Dedicated error display rendered in place of a view's content.
pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        None,
        &format!(r#"<h1 class="text-center mt-5">{}</h1>"#, escape(message)),
    )
}

/// The task list view. `alert` carries a failed operation's message.
pub fn task_table(tasks: &[Task], alert: Option<&str>) -> String {
    let content = if tasks.is_empty() {
        r#"<h1 class="text-center">No tasks to show!</h1>"#.to_string()
    } else {
        let rows: String = tasks
            .iter()
            .enumerate()
            .map(|(index, task)| task_row(index, task))
            .collect();
        format!(
            r#"<div class="table-responsive">
<table class="table table-striped align-middle text-center">
<thead>
<tr><th scope="col">#</th><th scope="col">Name</th><th scope="col">State</th><th scope="col">Last Run</th><th scope="col">Actions</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>
</div>"#
        )
    };

    let body = format!(
        r#"{alert}<div class="container text-end"><a href="/tasks/create" class="btn btn-outline-success">New task</a><hr></div>
{content}"#,
        alert = alert_banner(alert),
    );

    layout("Tasks", Some(REFRESH_SECS), &body)
}

fn task_row(index: usize, task: &Task) -> String {
    let (last_status, text_color) = match task.last_result {
        Some(true) => (
            format!("Success - {}", task.last_run.as_deref().unwrap_or("N/A")),
            "text-success",
        ),
        Some(false) => (
            format!("Fail - {}", task.last_run.as_deref().unwrap_or("N/A")),
            "text-danger",
        ),
        None => ("N/A".to_string(), "text-body"),
    };

    let actions = if task.running {
        concat!(
            r#"<button class="btn btn-link text-danger" name="intent" value="stop">Stop</button>"#,
            r#"<button class="btn btn-link text-warning" name="intent" value="restart">Restart</button>"#,
        )
    } else {
        r#"<button class="btn btn-link" name="intent" value="start">Start</button>"#
    };

    format!(
        r#"<tr>
<th scope="row">{number}</th>
<td><a href="/tasks/{id}" class="btn btn-outline-secondary border-0 fw-medium">{name}</a></td>
<td>{state}</td>
<td class="{text_color}">{last_status}</td>
<td><form method="post" action="/tasks/{id}/run">{actions}</form></td>
</tr>
"#,
        number = index + 1,
        id = task.id,
        name = escape(&task.name),
        state = if task.running { "Running" } else { "Stopped" },
        last_status = escape(&last_status),
    )
}

/// The dual-mode task form. Edit mode when `task_id` is present.
///
/// The form's default method is GET: changing a datatype select re-submits
/// it so the server re-renders with exactly one fieldset per side visible.
/// The submit buttons override the method to POST and carry the intent.
pub fn task_form(task_id: Option<i64>, fill: &FormFill, alert: Option<&str>) -> String {
    let action = match task_id {
        Some(id) => format!("/tasks/{id}"),
        None => "/tasks/create".to_string(),
    };

    let heading = match task_id {
        Some(_) => String::new(),
        None => "<h1>Task Creation</h1>\n<hr>\n".to_string(),
    };

    let buttons = match task_id {
        Some(_) => concat!(
            r#"<button type="submit" formmethod="post" class="btn btn-primary me-2" name="intent" value="put">Save</button>"#,
            r#"<button type="submit" formmethod="post" class="btn btn-danger" name="intent" value="delete">Delete</button>"#,
        ),
        None => {
            r#"<button type="submit" formmethod="post" class="btn btn-primary" name="intent" value="post">Create</button>"#
        }
    };

    let body = format!(
        r#"{alert}<div class="container">
{heading}<form method="get" action="{action}">
{name}{sync_times}{sync_rate}{source_select}{source_fields}{destination_select}{destination_fields}{buttons}
</form>
</div>"#,
        alert = alert_banner(alert),
        name = text_input("name", "Task name", &fill.name),
        sync_times = number_input("sync_times", "Times to execute (0: infinity)", &fill.sync_times, 0),
        sync_rate = number_input("sync_rate", "Synchronization rate (minutes)", &fill.sync_rate, 1),
        source_select = datatype_select("source_datatype", "Source datatype", fill.source_datatype),
        source_fields = source_fields(fill),
        destination_select =
            datatype_select("destination_datatype", "Destination datatype", fill.destination_datatype),
        destination_fields = destination_fields(fill),
    );

    let title = match task_id {
        Some(_) => fill.name.as_str(),
        None => "Create Task",
    };

    layout(title, None, &body)
}

fn source_fields(fill: &FormFill) -> String {
    match fill.source_datatype {
        Some(Datatype::Spreadsheet) => format!(
            "{}{}{}{}",
            text_input("source_file_url", "Source file URL", &fill.source_file_url),
            text_input("source_sheet_name", "Source sheet name", &fill.source_sheet_name),
            number_input(
                "source_headers_row",
                "Headers row number",
                &fill.source_headers_row,
                1,
            ),
            format!(
                r#"<div class="input-group mb-3">
<span class="input-group-text">Headers to include<br>in the destination<br>(one header per line)</span>
<textarea class="form-control" name="source_headers" rows="5" required>{}</textarea>
</div>
"#,
                escape(&fill.source_headers),
            ),
        ),
        Some(Datatype::Query) => text_input("source_query", "SuiteQL query", &fill.source_query),
        None => String::new(),
    }
}

fn destination_fields(fill: &FormFill) -> String {
    match fill.destination_datatype {
        Some(Datatype::Spreadsheet) => format!(
            "{}{}",
            text_input(
                "destination_file_url",
                "Destination file URL",
                &fill.destination_file_url,
            ),
            text_input(
                "destination_sheet_name",
                "Destination sheet name",
                &fill.destination_sheet_name,
            ),
        ),
        Some(Datatype::Query) => format!(
            "<h3 class=\"text-center text-danger\">{UNIMPLEMENTED_DESTINATION}</h3>\n"
        ),
        None => String::new(),
    }
}

fn datatype_select(name: &str, label: &str, selected: Option<Datatype>) -> String {
    let mut options = String::new();
    if selected.is_none() {
        options.push_str(r#"<option value="" selected></option>"#);
    }
    for datatype in Datatype::ALL {
        let marker = if selected == Some(datatype) { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{value}"{marker}>{label}</option>"#,
            value = datatype.as_str(),
            label = datatype.label(),
        ));
    }

    format!(
        r#"<div class="form-floating mb-3">
<select class="form-select" id="{name}" name="{name}" onchange="this.form.submit()" required>{options}</select>
<label for="{name}">{label}</label>
</div>
"#,
    )
}

fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div class="form-floating mb-3">
<input class="form-control" id="{name}" name="{name}" placeholder="{label}" value="{value}" required>
<label for="{name}">{label}</label>
</div>
"#,
        value = escape(value),
    )
}

fn number_input(name: &str, label: &str, value: &str, min: u32) -> String {
    format!(
        r#"<div class="form-floating mb-3">
<input type="number" class="form-control" id="{name}" name="{name}" placeholder="{label}" min="{min}" value="{value}" required>
<label for="{name}">{label}</label>
</div>
"#,
        value = escape(value),
    )
}
