//! Vault API client.
//!
//! # Responsibilities
//! - Define the capability contract the rest of the gateway programs against
//! - Exchange an access token for a bearer at the identity endpoint
//! - Cache login state on disk so repeated logins with the same state path
//!   skip the token exchange while the bearer is still valid
//! - Perform secret CRUD calls against the API endpoint

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::vault::types::{
    SecretCreateRequest, SecretIdentifiersResponse, SecretPutRequest, SecretResponse,
    SecretsDeleteResponse, SecretsResponse, VaultError,
};

/// Capability contract for an authenticated vault session.
///
/// Implementations: `VaultClient` (production, HTTP), mock clients (tests).
#[async_trait]
pub trait SecretsClient: Send + Sync {
    /// Fetch a single secret by id.
    async fn get(&self, id: &str) -> Result<SecretResponse, VaultError>;

    /// Fetch a batch of secrets by id.
    async fn get_by_ids(&self, ids: &[String]) -> Result<SecretsResponse, VaultError>;

    /// List the secret identifiers of an organization.
    async fn list(&self, organization_id: &str) -> Result<SecretIdentifiersResponse, VaultError>;

    /// Create a secret from key, value, note, organization and project ids.
    async fn create(&self, secret: &SecretCreateRequest) -> Result<SecretResponse, VaultError>;

    /// Overwrite an existing secret.
    async fn update(&self, secret: &SecretPutRequest) -> Result<SecretResponse, VaultError>;

    /// Delete a batch of secrets by id.
    async fn delete(&self, ids: &[String]) -> Result<SecretsDeleteResponse, VaultError>;

    /// Release the client. Called exactly once, from `Session::drop`.
    fn close(&mut self);
}

/// An unauthenticated connection to the vault endpoints.
///
/// `login` consumes the connector, so an API client cannot exist without a
/// completed token exchange.
#[derive(Debug)]
pub struct VaultConnector {
    http: reqwest::Client,
    api_url: Url,
    identity_url: Url,
}

/// Login state cached at the caller-supplied state path.
#[derive(Serialize, Deserialize)]
struct LoginState {
    bearer: String,
    expires_at: u64,
}

/// Bearer grant returned by the identity endpoint.
#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
    expires_in: u64,
}

impl VaultConnector {
    /// Validate the endpoints and build the underlying HTTP client.
    pub fn new(api_url: &str, identity_url: &str) -> Result<Self, VaultError> {
        let api_url = Url::parse(api_url)?;
        let identity_url = Url::parse(identity_url)?;
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            api_url,
            identity_url,
        })
    }

    /// Exchange the access token for a bearer and produce an authenticated
    /// client. A still-valid bearer cached at `state_path` is reused.
    pub async fn login(
        self,
        access_token: &str,
        state_path: &Path,
    ) -> Result<VaultClient, VaultError> {
        let bearer = match read_cached_state(state_path) {
            Some(state) => {
                tracing::debug!(state_path = %state_path.display(), "reusing cached login state");
                state.bearer
            }
            None => self.exchange_token(access_token, state_path).await?,
        };

        Ok(VaultClient {
            http: self.http,
            api_url: self.api_url,
            bearer,
        })
    }

    async fn exchange_token(
        &self,
        access_token: &str,
        state_path: &Path,
    ) -> Result<String, VaultError> {
        let endpoint = join_endpoint(&self.identity_url, "connect/token");
        let response = self
            .http
            .post(endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("access_token", access_token),
            ])
            .send()
            .await?;

        let grant: TokenGrant = expect_json(response).await?;
        let state = LoginState {
            bearer: grant.access_token,
            expires_at: unix_now() + grant.expires_in,
        };
        write_state(state_path, &state)?;

        Ok(state.bearer)
    }
}

/// Authenticated, reqwest-backed vault client.
pub struct VaultClient {
    http: reqwest::Client,
    api_url: Url,
    bearer: String,
}

impl VaultClient {
    fn endpoint(&self, path: &str) -> String {
        join_endpoint(&self.api_url, path)
    }
}

#[async_trait]
impl SecretsClient for VaultClient {
    async fn get(&self, id: &str) -> Result<SecretResponse, VaultError> {
        let response = self
            .http
            .get(self.endpoint(&format!("secrets/{id}")))
            .bearer_auth(&self.bearer)
            .send()
            .await?;
        expect_json(response).await
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<SecretsResponse, VaultError> {
        let response = self
            .http
            .post(self.endpoint("secrets/get-by-ids"))
            .bearer_auth(&self.bearer)
            .json(&serde_json::json!({ "ids": ids }))
            .send()
            .await?;
        expect_json(response).await
    }

    async fn list(&self, organization_id: &str) -> Result<SecretIdentifiersResponse, VaultError> {
        let response = self
            .http
            .get(self.endpoint(&format!("organizations/{organization_id}/secrets")))
            .bearer_auth(&self.bearer)
            .send()
            .await?;
        expect_json(response).await
    }

    async fn create(&self, secret: &SecretCreateRequest) -> Result<SecretResponse, VaultError> {
        let response = self
            .http
            .post(self.endpoint("secrets"))
            .bearer_auth(&self.bearer)
            .json(secret)
            .send()
            .await?;
        expect_json(response).await
    }

    async fn update(&self, secret: &SecretPutRequest) -> Result<SecretResponse, VaultError> {
        let response = self
            .http
            .put(self.endpoint(&format!("secrets/{}", secret.id)))
            .bearer_auth(&self.bearer)
            .json(secret)
            .send()
            .await?;
        expect_json(response).await
    }

    async fn delete(&self, ids: &[String]) -> Result<SecretsDeleteResponse, VaultError> {
        let response = self
            .http
            .post(self.endpoint("secrets/delete"))
            .bearer_auth(&self.bearer)
            .json(&serde_json::json!({ "ids": ids }))
            .send()
            .await?;
        expect_json(response).await
    }

    fn close(&mut self) {
        // Dropping the reqwest client tears down its connection pool; the
        // cached state file stays, that is its purpose.
        tracing::debug!("vault client closed");
    }
}

fn join_endpoint(base: &Url, path: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), path)
}

async fn expect_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, VaultError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(VaultError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn read_cached_state(path: &Path) -> Option<LoginState> {
    let content = std::fs::read(path).ok()?;
    let state: LoginState = serde_json::from_slice(&content).ok()?;
    if state.expires_at <= unix_now() {
        return None;
    }
    Some(state)
}

fn write_state(path: &Path, state: &LoginState) -> Result<(), VaultError> {
    let content = serde_json::to_vec(state)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
