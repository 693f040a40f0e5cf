//!
//! jellio HTTP server
//! ------------------
//! Axum-based API surface for the configuration UI.
//!
//! Responsibilities:
//! - Serve the static UI shell, with an optional opaque config token in the
//!   path (decode failure is non-fatal; the UI falls back to defaults).
//! - Resolve the caller's identity per request, claims first, then device
//!   access token, before answering any protected route.
//! - Read-only host queries: server name, identity-scoped libraries,
//!   recent log lines; log clear is the only mutating call and it mutates
//!   a collaborator's buffer, not this core's state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config_token;
use crate::error::{AppError, AppResult};
use crate::host::{DeviceDirectory, LibraryService, LogEntry, LogStore, UserDirectory};
use crate::identity::{self, ClaimsContext, Identity};

const INDEX_HTML: &str = include_str!("../web/index.html");

/// Default window for `/logs` when no limit is given; matches the UI's fetch size.
const DEFAULT_LOG_LIMIT: usize = 100;
/// Hard cap so a hostile limit cannot unbound the window.
const MAX_LOG_LIMIT: usize = 1000;

/// Shared server state injected into all handlers. The bridge holds no
/// persistent state of its own; everything behind the Arcs is host-owned.
#[derive(Clone)]
pub struct AppState {
    pub server_name: String,
    pub users: Arc<dyn UserDirectory>,
    pub devices: Arc<dyn DeviceDirectory>,
    pub libraries: Arc<dyn LibraryService>,
    pub logs: Arc<dyn LogStore>,
}

/// Mount all routes against the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/configure", get(index))
        .route("/{config}/configure", get(index_with_config))
        .route("/server-info", get(server_info))
        .route("/logs", get(get_logs))
        .route("/logs/clear", post(clear_logs))
        .with_state(state)
}

/// Start the HTTP server bound to the given port.
pub async fn run(http_port: u16, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn index_with_config(Path(config): Path<String>) -> Html<&'static str> {
    // The token is decoded client-side to bootstrap UI state; here it is
    // only validated for logging. Failure is the UI's "use defaults" path.
    match config_token::decode(&config) {
        Some(cfg) => debug!(keys = cfg.len(), "configure shell requested with embedded config"),
        None => debug!("configure shell requested with undecodable config token"),
    }
    Html(INDEX_HTML)
}

#[derive(Debug, Deserialize)]
struct AuthParams {
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LogsParams {
    limit: Option<usize>,
    api_key: Option<String>,
}

/// Pull an explicit access token from its supported carriers, in order:
/// Authorization bearer, X-Access-Token header, api_key query param.
fn access_token_from(headers: &HeaderMap, api_key: Option<&str>) -> Option<String> {
    if let Some(v) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = v.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    if let Some(v) = headers.get("x-access-token").and_then(|v| v.to_str().ok()) {
        let v = v.trim();
        if !v.is_empty() {
            return Some(v.to_string());
        }
    }
    api_key.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Resolve the caller or fail with a detail-free 401. Identity is
/// re-resolved on every request; nothing is cached across requests.
fn resolve_caller(state: &AppState, headers: &HeaderMap, api_key: Option<&str>) -> AppResult<Identity> {
    let claims = ClaimsContext::from_headers(headers);
    if let Some(ident) = identity::resolve_from_claims(&claims, state.users.as_ref()) {
        return Ok(ident);
    }
    if let Some(token) = access_token_from(headers, api_key) {
        if let Some(ident) = identity::resolve_from_device_token(&token, state.devices.as_ref()) {
            return Ok(ident);
        }
    }
    Err(AppError::auth("unauthenticated", "no resolvable identity"))
}

async fn server_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AuthParams>,
) -> AppResult<Json<serde_json::Value>> {
    let ident = resolve_caller(&state, &headers, params.api_key.as_deref())?;
    let user = state
        .users
        .get_by_id(ident.user_id)
        .map_err(|e| AppError::upstream("user_directory", e.to_string()))?
        .ok_or_else(|| AppError::auth("unauthenticated", "no resolvable identity"))?;
    let libraries = state
        .libraries
        .libraries_visible_to(&user)
        .map_err(|e| AppError::upstream("library_service", e.to_string()))?;
    Ok(Json(json!({ "name": state.server_name, "libraries": libraries })))
}

async fn get_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LogsParams>,
) -> AppResult<Json<Vec<LogEntry>>> {
    let _ident = resolve_caller(&state, &headers, params.api_key.as_deref())?;
    let limit = params.limit.unwrap_or(DEFAULT_LOG_LIMIT).min(MAX_LOG_LIMIT);
    let entries = state
        .logs
        .recent(limit)
        .map_err(|e| AppError::upstream("log_store", e.to_string()))?;
    Ok(Json(entries))
}

async fn clear_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AuthParams>,
) -> AppResult<StatusCode> {
    let _ident = resolve_caller(&state, &headers, params.api_key.as_deref())?;
    state
        .logs
        .clear()
        .map_err(|e| AppError::upstream("log_store", e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(access_token_from(&headers, Some("other")), Some("abc".to_string()));
    }

    #[test]
    fn custom_header_and_param_fallbacks() {
        let mut headers = HeaderMap::new();
        headers.insert("x-access-token", HeaderValue::from_static("xyz"));
        assert_eq!(access_token_from(&headers, None), Some("xyz".to_string()));
        assert_eq!(access_token_from(&HeaderMap::new(), Some("qk")), Some("qk".to_string()));
        assert_eq!(access_token_from(&HeaderMap::new(), Some("  ")), None);
        assert_eq!(access_token_from(&HeaderMap::new(), None), None);
    }

    #[test]
    fn blank_bearer_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(access_token_from(&headers, None), None);
    }
}
