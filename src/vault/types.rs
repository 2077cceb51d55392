//! Vault wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// An endpoint override or default could not be parsed as a URL.
    #[error("invalid endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Connection-level failure: DNS, TCP, TLS, or a dropped stream.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The vault answered with a non-success status. The message is the
    /// vault's own error text and is surfaced to the caller verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Reading or writing the local login state file failed.
    #[error("state file error: {0}")]
    State(#[from] std::io::Error),

    /// The vault answered 2xx but the body did not match the expected shape.
    #[error("malformed vault response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Payload for fetching a single secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretGetRequest {
    pub id: String,
}

/// Payload for fetching a batch of secrets by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsGetRequest {
    pub ids: Vec<String>,
}

/// Payload for listing the secret identifiers of an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretIdentifiersRequest {
    pub organization_id: String,
}

/// Payload for deleting a batch of secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsDeleteRequest {
    pub ids: Vec<String>,
}

/// Payload for creating a secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretCreateRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub note: String,
    pub organization_id: String,
    #[serde(default)]
    pub project_ids: Vec<String>,
}

/// Payload for updating an existing secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretPutRequest {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub note: String,
    pub organization_id: String,
    #[serde(default)]
    pub project_ids: Vec<String>,
}

/// A full secret as returned by the vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretResponse {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub project_ids: Vec<String>,
}

/// A batch of full secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsResponse {
    pub data: Vec<SecretResponse>,
}

/// A secret identifier, without the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretIdentifier {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub organization_id: String,
}

/// The identifiers of all secrets in an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretIdentifiersResponse {
    pub data: Vec<SecretIdentifier>,
}

/// Per-id outcome of a batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretDeleteResult {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsDeleteResponse {
    pub data: Vec<SecretDeleteResult>,
}
