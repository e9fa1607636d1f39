//! HTTP routes for the console
//!
//! Every handler renders a full page. Mutations either redirect back to the
//! task list or re-render the originating view with an alert banner; initial
//! fetch failures render the dedicated error page in place of content.

use axum::{
    Router,
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::client::{ClientError, TaskClient};
use crate::forms::{FormFill, Intent, TaskForm};
use crate::models::{RunCommand, RunState};
use crate::views;

/// Application state shared across handlers
pub struct AppState {
    pub client: TaskClient,
}

impl AppState {
    pub fn new(client: TaskClient) -> Arc<Self> {
        Arc::new(Self { client })
    }
}

/// Create the console router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/tasks", get(list_tasks))
        .route("/tasks/create", get(create_form).post(submit_create))
        .route("/tasks/{id}", get(edit_form).post(submit_edit))
        .route("/tasks/{id}/run", post(run_command))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home() -> Html<String> {
    Html(views::home())
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> Response {
    render_list(&state, None, None).await
}

/// Fetch the task list and render it, optionally overlaying a just-confirmed
/// run state on one row and/or an alert from a failed operation.
async fn render_list(
    state: &AppState,
    overlay: Option<(i64, RunState)>,
    alert: Option<&str>,
) -> Response {
    match state.client.list().await {
        Ok(mut tasks) => {
            if let Some((id, run_state)) = overlay
                && let Some(task) = tasks.iter_mut().find(|task| task.id == id)
            {
                task.running = run_state.is_running();
            }
            Html(views::task_table(&tasks, alert)).into_response()
        }
        Err(err) => fetch_error(err),
    }
}

/// An initial fetch failed: show the error display scoped to this view.
fn fetch_error(err: ClientError) -> Response {
    tracing::error!(error = %err, "task service fetch failed");
    let status = match &err {
        ClientError::Service { status, .. } => *status,
        ClientError::Http(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Html(views::error_page(&err.user_message()))).into_response()
}

#[derive(Debug, Deserialize)]
struct RunForm {
    intent: RunCommand,
}

/// Start/stop/restart one task, then re-render the list. On success the
/// returned state is applied to the row; on failure the list shows the
/// service-confirmed state unchanged, plus the alert.
async fn run_command(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<RunForm>,
) -> Response {
    match state.client.run(id, form.intent).await {
        Ok(run_state) => {
            tracing::info!(
                task_id = id,
                command = form.intent.as_str(),
                state = ?run_state,
                "run-state command applied"
            );
            render_list(&state, Some((id, run_state)), None).await
        }
        Err(err) => {
            tracing::error!(
                task_id = id,
                command = form.intent.as_str(),
                error = %err,
                "run-state command failed"
            );
            render_list(&state, None, Some(&err.user_message())).await
        }
    }
}

/// Create form. Query params are present when a datatype select re-submitted
/// the form; they echo the user's entries into the re-render.
async fn create_form(Query(query): Query<TaskForm>) -> Html<String> {
    Html(views::task_form(None, &FormFill::from_form(&query), None))
}

async fn submit_create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TaskForm>,
) -> Response {
    let alert = match form.intent {
        Some(Intent::Post) => match form.to_payload() {
            Ok(payload) => match state.client.create(&payload).await {
                Ok(()) => return Redirect::to("/tasks").into_response(),
                Err(err) => err.user_message(),
            },
            Err(err) => err.to_string(),
        },
        _ => "Unsupported form intent.".to_string(),
    };

    tracing::warn!(alert = %alert, "task creation failed");
    Html(views::task_form(None, &FormFill::from_form(&form), Some(&alert))).into_response()
}

/// Edit form: prefilled from the fetched task, unless a datatype change
/// re-submitted the form, in which case the user's entries win.
async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<TaskForm>,
) -> Response {
    if query.is_echo() {
        return Html(views::task_form(Some(id), &FormFill::from_form(&query), None)).into_response();
    }

    match state.client.get(id).await {
        Ok(task) => {
            Html(views::task_form(Some(id), &FormFill::from_task(&task), None)).into_response()
        }
        Err(err) => fetch_error(err),
    }
}

async fn submit_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> Response {
    let alert = match form.intent {
        Some(Intent::Put) => match form.to_payload() {
            Ok(payload) => match state.client.update(id, &payload).await {
                Ok(()) => return Redirect::to("/tasks").into_response(),
                Err(err) => err.user_message(),
            },
            Err(err) => err.to_string(),
        },
        Some(Intent::Delete) => match state.client.delete(id).await {
            Ok(()) => return Redirect::to("/tasks").into_response(),
            Err(err) => err.user_message(),
        },
        _ => "Unsupported form intent.".to_string(),
    };

    tracing::warn!(task_id = id, alert = %alert, "task edit failed");
    Html(views::task_form(Some(id), &FormFill::from_form(&form), Some(&alert))).into_response()
}
