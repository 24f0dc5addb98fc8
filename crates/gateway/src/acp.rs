//! ACP run endpoints plus the plain-text query route.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use concierge_core::acp::{AgentList, RunError, RunMode, RunRequest, RunResponse};
use tracing::{error, info, warn};

use crate::SharedState;

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(RunError {
            code: code.into(),
            message: message.into(),
        }),
    )
        .into_response()
}

/// `GET /agents`
pub async fn list_agents(State(state): State<SharedState>) -> Json<AgentList> {
    Json(AgentList {
        agents: state.manifests(),
    })
}

/// `POST /runs` (synchronous mode only)
pub async fn create_run(
    State(state): State<SharedState>,
    Json(request): Json<RunRequest>,
) -> Response {
    let Some(agent) = state.agent(&request.agent_name) else {
        warn!(agent = %request.agent_name, "Run for unknown agent");
        return error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Agent {} not found", request.agent_name),
        );
    };

    if request.mode != RunMode::Sync {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "only sync runs are supported",
        );
    }

    let Some(input) = request.input_text().filter(|t| !t.trim().is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "run input contained no text",
        );
    };

    info!(agent = %request.agent_name, input_len = input.len(), "Run started");

    let mut response = match agent.run(input).await {
        Ok(reply) => RunResponse::completed(agent.name(), reply),
        Err(e) => {
            error!(agent = %request.agent_name, error = %e, "Run failed");
            RunResponse::failed(agent.name(), "server_error", e.to_string())
        }
    };
    response.session_id = request.session_id;
    Json(response).into_response()
}

/// `GET /query/{*input}`: run the personal assistant and return bare text.
pub async fn query(State(state): State<SharedState>, Path(input): Path<String>) -> Response {
    let Some(agent) = state.agent(concierge_agent::PERSONAL_ASSISTANT) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            "personal_assistant is not registered",
        );
    };

    match agent.run(&input).await {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            error!(error = %e, "Query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
