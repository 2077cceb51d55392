//! Session-Scoping Middleware.
//!
//! Runs on every route under the API prefix. Per request it moves through
//! `NoSession → Authenticating → (Scoped | Rejected)`:
//!
//! - no access token → 401, the downstream handler never runs
//! - login refused or backend unreachable → 400 with the cause, downstream
//!   handler never runs
//! - success → the session rides the request extensions in a `SessionCell`;
//!   after the downstream future completes the cell is drained, so a session
//!   the handler did not take is released here
//!
//! Headers used:
//! Warden-Access-Token: <token>
//! Warden-State-Path: <state-path>
//! Warden-Api-Url: <url>
//! Warden-Identity-Url: <url>

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::http::response::plain_error;
use crate::http::server::AppState;
use crate::vault::session::{LoginRequest, SessionCell};

pub const HEADER_ACCESS_TOKEN: &str = "warden-access-token";
pub const HEADER_STATE_PATH: &str = "warden-state-path";
pub const HEADER_API_URL: &str = "warden-api-url";
pub const HEADER_IDENTITY_URL: &str = "warden-identity-url";

pub async fn session_scope(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let access_token = header_value(&req, HEADER_ACCESS_TOKEN);
    if access_token.is_empty() {
        return plain_error(StatusCode::UNAUTHORIZED, "missing access token");
    }

    let login = LoginRequest {
        access_token,
        state_path: header_value(&req, HEADER_STATE_PATH),
        api_url: header_value(&req, HEADER_API_URL),
        identity_url: header_value(&req, HEADER_IDENTITY_URL),
    };

    // Every request gets its own session; nothing is pooled or reused.
    let session = match state.provider.establish(&login).await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = %err, "session establishment failed");
            return plain_error(
                StatusCode::BAD_REQUEST,
                &format!("failed to login to vault using access token: {err}"),
            );
        }
    };

    let cell = SessionCell::new(session);
    req.extensions_mut().insert(cell.clone());

    let response = next.run(req).await;

    // Backstop: if the handler never took the session, release it now,
    // before the response leaves this request's scope.
    drop(cell.take());

    response
}

fn header_value(req: &Request, name: &str) -> String {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
