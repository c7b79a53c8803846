//! Registry serve command
//!
//! Runs a local registry process behind the same two HTTP surfaces the
//! client speaks on a real mesh: a gateway dry-run endpoint for reads and
//! a messenger message-log endpoint for writes. Messages are handled
//! inline, so a result is always ready by the time a poll arrives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use skillmesh_registry::{RegistryHandle, RegistryProcess};
use skillmesh_types::RegistryRequest;

use crate::commands::Command;
use crate::error::CliResult;
use crate::output::{self, OutputStyle};

/// Host a development registry over the mesh wire protocol
pub struct ServeCommand {
    port: u16,
    process_id: String,
}

impl ServeCommand {
    pub fn new(port: u16, process_id: String) -> Self {
        Self { port, process_id }
    }
}

#[derive(Clone)]
struct ServeState {
    process_id: String,
    handle: RegistryHandle,
    results: Arc<Mutex<HashMap<String, Value>>>,
}

impl ServeState {
    fn new(process_id: String, handle: RegistryHandle) -> Self {
        Self {
            process_id,
            handle,
            results: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

fn app(state: ServeState) -> Router {
    Router::new()
        .route("/dry-run", post(dry_run))
        .route("/processes/:pid/messages", post(post_message))
        .route("/processes/:pid/results/:message_id", get(get_result))
        .with_state(state)
}

/// Wrap a handler payload the way a process reply travels on the wire
fn wrap_payload(payload: &Value) -> Result<Value, Response> {
    let data = serde_json::to_string(payload).map_err(|e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("failed to encode reply: {e}"),
        )
    })?;
    Ok(json!({"messages": [{"data": data}]}))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

async fn dry_run(
    State(state): State<ServeState>,
    Query(params): Query<HashMap<String, String>>,
    Json(request): Json<RegistryRequest>,
) -> Response {
    if params.get("process-id").map(String::as_str) != Some(state.process_id.as_str()) {
        return error_response(StatusCode::NOT_FOUND, "unknown process");
    }
    debug!(action = %request.action, "dry-run request");

    match state.handle.call(request).await {
        Ok(payload) => match wrap_payload(&payload) {
            Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Err(response) => response,
        },
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn post_message(
    State(state): State<ServeState>,
    Path(pid): Path<String>,
    body: Bytes,
) -> Response {
    if pid != state.process_id {
        return error_response(StatusCode::NOT_FOUND, "unknown process");
    }
    let request: RegistryRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("message is not a valid request: {e}"),
            )
        }
    };
    debug!(action = %request.action, "committed message");

    match state.handle.call(request).await {
        Ok(payload) => {
            let message_id = Uuid::new_v4().to_string();
            state
                .results
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(message_id.clone(), payload);
            (
                StatusCode::ACCEPTED,
                Json(json!({"messageId": message_id})),
            )
                .into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn get_result(
    State(state): State<ServeState>,
    Path((pid, message_id)): Path<(String, String)>,
) -> Response {
    if pid != state.process_id {
        return error_response(StatusCode::NOT_FOUND, "unknown process");
    }
    let payload = state
        .results
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(&message_id)
        .cloned();
    match payload {
        Some(payload) => match wrap_payload(&payload) {
            Ok(mut body) => {
                body["status"] = json!("done");
                (StatusCode::OK, Json(body)).into_response()
            }
            Err(response) => response,
        },
        None => error_response(StatusCode::NOT_FOUND, "unknown message"),
    }
}

#[async_trait]
impl Command for ServeCommand {
    async fn execute(&self) -> CliResult<()> {
        let (handle, _process) = RegistryProcess::spawn();
        let state = ServeState::new(self.process_id.clone(), handle);

        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;

        let style = OutputStyle::default();
        println!("{}", style.header("skillmesh dev registry"));
        println!("{}", style.key_value("Gateway", &format!("http://{addr}")));
        println!("{}", style.key_value("Messenger", &format!("http://{addr}")));
        println!("{}", style.key_value("Process id", &self.process_id));
        output::print_info("Press Ctrl-C to stop");

        axum::serve(listener, app(state)).await?;
        Ok(())
    }
}
