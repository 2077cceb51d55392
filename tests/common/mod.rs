//! Shared doubles and helpers for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;

use warden_gateway::config::GatewayConfig;
use warden_gateway::http::{GatewayServer, API_PREFIX};
use warden_gateway::vault::{
    LoginRequest, SecretCreateRequest, SecretIdentifiersResponse, SecretPutRequest,
    SecretResponse, SecretsClient, SecretsDeleteResponse, SecretsResponse, Session, SessionError,
    SessionProvider, VaultError,
};

/// Shared call accounting across provider and client doubles.
#[derive(Clone, Default)]
pub struct VaultCounters {
    /// Sessions handed out by the provider.
    pub established: Arc<AtomicUsize>,
    /// Client close calls (one per disposed session).
    pub closed: Arc<AtomicUsize>,
    /// Secret operations invoked on any session.
    pub calls: Arc<AtomicUsize>,
}

impl VaultCounters {
    pub fn established(&self) -> usize {
        self.established.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn api_err(message: &str) -> VaultError {
    VaultError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// Scriptable secrets client. Each operation returns the scripted error if
/// set, the scripted response otherwise.
#[derive(Clone, Default)]
pub struct MockSecrets {
    pub counters: VaultCounters,

    pub get_resp: SecretResponse,
    pub get_err: Option<String>,
    pub get_by_ids_resp: SecretsResponse,
    pub get_by_ids_err: Option<String>,
    pub list_resp: SecretIdentifiersResponse,
    pub list_err: Option<String>,
    pub delete_resp: SecretsDeleteResponse,
    pub delete_err: Option<String>,
    pub create_resp: SecretResponse,
    pub create_err: Option<String>,
    pub update_resp: SecretResponse,
    pub update_err: Option<String>,
}

#[async_trait]
impl SecretsClient for MockSecrets {
    async fn get(&self, _id: &str) -> Result<SecretResponse, VaultError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        match &self.get_err {
            Some(message) => Err(api_err(message)),
            None => Ok(self.get_resp.clone()),
        }
    }

    async fn get_by_ids(&self, _ids: &[String]) -> Result<SecretsResponse, VaultError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        match &self.get_by_ids_err {
            Some(message) => Err(api_err(message)),
            None => Ok(self.get_by_ids_resp.clone()),
        }
    }

    async fn list(&self, _org: &str) -> Result<SecretIdentifiersResponse, VaultError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        match &self.list_err {
            Some(message) => Err(api_err(message)),
            None => Ok(self.list_resp.clone()),
        }
    }

    async fn create(&self, _secret: &SecretCreateRequest) -> Result<SecretResponse, VaultError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        match &self.create_err {
            Some(message) => Err(api_err(message)),
            None => Ok(self.create_resp.clone()),
        }
    }

    async fn update(&self, _secret: &SecretPutRequest) -> Result<SecretResponse, VaultError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        match &self.update_err {
            Some(message) => Err(api_err(message)),
            None => Ok(self.update_resp.clone()),
        }
    }

    async fn delete(&self, _ids: &[String]) -> Result<SecretsDeleteResponse, VaultError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        match &self.delete_err {
            Some(message) => Err(api_err(message)),
            None => Ok(self.delete_resp.clone()),
        }
    }

    fn close(&mut self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Provider double: hands out a fresh mock session per request, or fails
/// every login with the scripted message.
#[derive(Default)]
pub struct MockProvider {
    pub fail: Option<String>,
    pub secrets: MockSecrets,
}

#[async_trait]
impl SessionProvider for MockProvider {
    async fn establish(&self, _login: &LoginRequest) -> Result<Session, SessionError> {
        if let Some(message) = &self.fail {
            return Err(SessionError::Login(VaultError::Api {
                status: 401,
                message: message.clone(),
            }));
        }
        self.secrets
            .counters
            .established
            .fetch_add(1, Ordering::SeqCst);
        Ok(Session::new(Box::new(self.secrets.clone())))
    }
}

/// Gateway router over the given provider, plain HTTP config.
pub fn gateway_router(provider: Arc<dyn SessionProvider>) -> Router {
    let mut config = GatewayConfig::default();
    config.listener.insecure = true;
    GatewayServer::new(config, provider).router()
}

/// Gateway config for in-process serving.
pub fn insecure_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.insecure = true;
    config
}

/// Request against an API-prefixed secret route.
pub fn api_request(method: Method, path: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("{API_PREFIX}{path}"));
    if let Some(token) = token {
        builder = builder.header("Warden-Access-Token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Collect a response body into a string.
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
