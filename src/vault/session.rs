//! Request-scoped vault sessions.
//!
//! A `Session` is created per request by a `SessionProvider`, handed to the
//! dispatching handler through the request extensions, and released when it
//! is dropped. Ownership does the bookkeeping: the handler moves the session
//! out of its `SessionCell`, so it can neither outlive the request nor be
//! closed twice.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use crate::vault::client::{SecretsClient, VaultConnector};
use crate::vault::types::{
    SecretCreateRequest, SecretIdentifiersResponse, SecretPutRequest, SecretResponse,
    SecretsDeleteResponse, SecretsResponse, VaultError,
};

/// Default vault endpoints and state location, used when the request carries
/// no override headers.
pub const DEFAULT_API_URL: &str = "https://api.warden.dev";
pub const DEFAULT_IDENTITY_URL: &str = "https://identity.warden.dev";
pub const DEFAULT_STATE_PATH: &str = ".warden-state";

/// Login details extracted from the request headers.
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub access_token: String,
    pub state_path: String,
    pub api_url: String,
    pub identity_url: String,
}

/// Errors establishing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend client could not be constructed.
    #[error("failed to create client: {0}")]
    Backend(#[source] VaultError),

    /// The client was constructed but the token exchange was refused.
    #[error("vault login: {0}")]
    Login(#[source] VaultError),
}

/// An authenticated vault handle owned by exactly one request.
///
/// The wrapped client is released in `Drop`, which covers every exit path of
/// the owning handler, including panics.
pub struct Session {
    client: Box<dyn SecretsClient>,
}

impl Session {
    pub fn new(client: Box<dyn SecretsClient>) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<SecretResponse, VaultError> {
        self.client.get(id).await
    }

    pub async fn get_by_ids(&self, ids: &[String]) -> Result<SecretsResponse, VaultError> {
        self.client.get_by_ids(ids).await
    }

    pub async fn list(
        &self,
        organization_id: &str,
    ) -> Result<SecretIdentifiersResponse, VaultError> {
        self.client.list(organization_id).await
    }

    pub async fn create(
        &self,
        secret: &SecretCreateRequest,
    ) -> Result<SecretResponse, VaultError> {
        self.client.create(secret).await
    }

    pub async fn update(&self, secret: &SecretPutRequest) -> Result<SecretResponse, VaultError> {
        self.client.update(secret).await
    }

    pub async fn delete(&self, ids: &[String]) -> Result<SecretsDeleteResponse, VaultError> {
        self.client.delete(ids).await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.client.close();
        tracing::debug!("vault session released");
    }
}

/// Carrier for a `Session` inside the request extensions.
///
/// `http::Extensions` requires inserted values to be `Clone`, and a session
/// must not be cloneable. The cell is the bridge: clones share one slot, and
/// the session can be taken from it at most once.
#[derive(Clone, Default)]
pub struct SessionCell {
    inner: Arc<Mutex<Option<Session>>>,
}

impl SessionCell {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// Move the session out of the cell. Subsequent calls return `None`.
    pub fn take(&self) -> Option<Session> {
        match self.inner.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        }
    }
}

/// Factory for authenticated sessions.
///
/// Implementations: `VaultSessionProvider` (production), mock providers
/// (tests). No caching anywhere: every call constructs and logs in afresh.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn establish(&self, login: &LoginRequest) -> Result<Session, SessionError>;
}

/// Production provider backed by the reqwest vault client.
#[derive(Debug, Default)]
pub struct VaultSessionProvider;

#[async_trait]
impl SessionProvider for VaultSessionProvider {
    async fn establish(&self, login: &LoginRequest) -> Result<Session, SessionError> {
        let api_url = set_or_default(&login.api_url, DEFAULT_API_URL);
        let identity_url = set_or_default(&login.identity_url, DEFAULT_IDENTITY_URL);
        let state_path = set_or_default(&login.state_path, DEFAULT_STATE_PATH);

        tracing::debug!(
            api = %api_url,
            identity = %identity_url,
            state_path = %state_path,
            "establishing vault session"
        );

        let connector =
            VaultConnector::new(&api_url, &identity_url).map_err(SessionError::Backend)?;
        let client = connector
            .login(&login.access_token, Path::new(&state_path))
            .await
            .map_err(SessionError::Login)?;

        Ok(Session::new(Box::new(client)))
    }
}

/// A value if non-empty, otherwise the default.
fn set_or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingClient {
        closed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SecretsClient for CountingClient {
        async fn get(&self, _id: &str) -> Result<SecretResponse, VaultError> {
            Ok(SecretResponse::default())
        }

        async fn get_by_ids(&self, _ids: &[String]) -> Result<SecretsResponse, VaultError> {
            Ok(SecretsResponse::default())
        }

        async fn list(&self, _org: &str) -> Result<SecretIdentifiersResponse, VaultError> {
            Ok(SecretIdentifiersResponse::default())
        }

        async fn create(&self, _s: &SecretCreateRequest) -> Result<SecretResponse, VaultError> {
            Ok(SecretResponse::default())
        }

        async fn update(&self, _s: &SecretPutRequest) -> Result<SecretResponse, VaultError> {
            Ok(SecretResponse::default())
        }

        async fn delete(&self, _ids: &[String]) -> Result<SecretsDeleteResponse, VaultError> {
            Ok(SecretsDeleteResponse::default())
        }

        fn close(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_session() -> (Session, Arc<AtomicUsize>) {
        let closed = Arc::new(AtomicUsize::new(0));
        let session = Session::new(Box::new(CountingClient {
            closed: closed.clone(),
        }));
        (session, closed)
    }

    #[test]
    fn test_drop_closes_exactly_once() {
        let (session, closed) = counting_session();
        drop(session);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cell_take_is_single_shot() {
        let (session, closed) = counting_session();
        let cell = SessionCell::new(session);
        let clone = cell.clone();

        let taken = cell.take();
        assert!(taken.is_some());
        assert!(clone.take().is_none(), "second take must come up empty");

        // Still alive while the taken session is held.
        assert_eq!(closed.load(Ordering::SeqCst), 0);
        drop(taken);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_cell_yields_nothing() {
        assert!(SessionCell::default().take().is_none());
    }

    #[test]
    fn test_set_or_default() {
        assert_eq!(set_or_default("", "fallback"), "fallback");
        assert_eq!(set_or_default("given", "fallback"), "given");
    }
}
