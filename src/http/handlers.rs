//! Operation dispatchers for the secret endpoints.
//!
//! Every handler follows one shape: read and decode the body, take the
//! session out of the request extensions, invoke exactly one vault
//! capability, and write exactly one response. The session is owned by the
//! handler from the take onward and is released when the handler returns,
//! whichever arm it returns through.

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use crate::http::response::{json_response, plain_error, DispatchError};
use crate::vault::session::{Session, SessionCell};
use crate::vault::types::{
    SecretCreateRequest, SecretGetRequest, SecretIdentifiersRequest, SecretPutRequest,
    SecretsDeleteRequest, SecretsGetRequest,
};

/// Cap on buffered request bodies. Secret payloads are small; anything past
/// this is a client error.
const BODY_LIMIT: usize = 1024 * 1024;

/// Decode the operation payload and take the scoped session.
///
/// The body is fully consumed on every path. The session leaves its cell
/// here, so from the caller's perspective this is the acquisition point.
async fn scoped_request<T: DeserializeOwned>(
    req: Request,
) -> Result<(T, Session), DispatchError> {
    let (parts, body) = req.into_parts();

    let bytes = to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|err| DispatchError::BodyRead(err.to_string()))?;
    let payload = serde_json::from_slice(&bytes).map_err(DispatchError::MalformedPayload)?;

    let cell = parts
        .extensions
        .get::<SessionCell>()
        .ok_or(DispatchError::MissingSession)?;
    let session = cell.take().ok_or(DispatchError::InvalidSession)?;

    Ok((payload, session))
}

pub async fn get_secret(req: Request) -> Response {
    let (payload, session): (SecretGetRequest, Session) = match scoped_request(req).await {
        Ok(scoped) => scoped,
        Err(err) => return err.into_response(),
    };

    match session.get(&payload.id).await {
        Ok(secret) => json_response(&secret),
        Err(err) => plain_error(
            StatusCode::BAD_REQUEST,
            &format!("failed to get secret: {err}"),
        ),
    }
}

pub async fn get_secrets_by_ids(req: Request) -> Response {
    let (payload, session): (SecretsGetRequest, Session) = match scoped_request(req).await {
        Ok(scoped) => scoped,
        Err(err) => return err.into_response(),
    };

    match session.get_by_ids(&payload.ids).await {
        Ok(secrets) => json_response(&secrets),
        Err(err) => plain_error(
            StatusCode::BAD_REQUEST,
            &format!("failed to get secrets: {err}"),
        ),
    }
}

pub async fn list_secrets(req: Request) -> Response {
    let (payload, session): (SecretIdentifiersRequest, Session) = match scoped_request(req).await
    {
        Ok(scoped) => scoped,
        Err(err) => return err.into_response(),
    };

    match session.list(&payload.organization_id).await {
        Ok(identifiers) => json_response(&identifiers),
        Err(err) => plain_error(
            StatusCode::BAD_REQUEST,
            &format!("failed to list secrets: {err}"),
        ),
    }
}

pub async fn delete_secrets(req: Request) -> Response {
    let (payload, session): (SecretsDeleteRequest, Session) = match scoped_request(req).await {
        Ok(scoped) => scoped,
        Err(err) => return err.into_response(),
    };

    match session.delete(&payload.ids).await {
        Ok(outcome) => json_response(&outcome),
        // No verb prefix here: callers of the delete endpoint parse the
        // cause text as-is.
        Err(err) => plain_error(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

pub async fn create_secret(req: Request) -> Response {
    let (payload, session): (SecretCreateRequest, Session) = match scoped_request(req).await {
        Ok(scoped) => scoped,
        Err(err) => return err.into_response(),
    };

    match session.create(&payload).await {
        Ok(secret) => json_response(&secret),
        Err(err) => plain_error(
            StatusCode::BAD_REQUEST,
            &format!("failed to create secret: {err}"),
        ),
    }
}

pub async fn update_secret(req: Request) -> Response {
    let (payload, session): (SecretPutRequest, Session) = match scoped_request(req).await {
        Ok(scoped) => scoped,
        Err(err) => return err.into_response(),
    };

    match session.update(&payload).await {
        Ok(secret) => json_response(&secret),
        Err(err) => plain_error(
            StatusCode::BAD_REQUEST,
            &format!("failed to update secret: {err}"),
        ),
    }
}
