use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub bridge_state: String,
    pub node_state: String,
    pub network: String,
    pub developer_cluster: bool,
    pub debug_mode: bool,
}

// POST /rpc
//
// The body is forwarded to the call bridge untouched and the node's response
// text comes back byte-for-byte, RPC error payloads included.
pub async fn call_rpc(State(state): State<AppState>, body: String) -> Result<Response, ApiError> {
    let session = Arc::clone(&state.session);
    // The bridge blocks until the node answers.
    let response = tokio::task::spawn_blocking(move || session.bridge().call(&body)).await??;

    Ok(([(CONTENT_TYPE, "application/json")], response).into_response())
}

// GET /v1/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let session = &state.session;
    Json(StatusResponse {
        bridge_state: session.bridge().state().to_string(),
        node_state: session.node_state().to_string(),
        network: session.config().network_name().to_string(),
        developer_cluster: session.bridge().developer_cluster(),
        debug_mode: session.bridge().debug_mode(),
    })
}
