//! Vault backend integration subsystem.
//!
//! # Data Flow
//! ```text
//! Request headers
//!     → session.rs (LoginRequest, SessionProvider → Session)
//!     → client.rs (SecretsClient trait, reqwest-backed VaultClient)
//!     → types.rs (wire payloads and responses, VaultError)
//! ```
//!
//! # Design Decisions
//! - Capability trait (`SecretsClient`) instead of the concrete client, so
//!   the middleware and dispatchers are testable without network access
//! - A `Session` owns its client; disposal happens in `Drop`, so a session
//!   cannot be used after release and cannot be released twice
//! - No session pool or cache: every request logs in and closes its own client

pub mod client;
pub mod session;
pub mod types;

pub use client::{SecretsClient, VaultClient, VaultConnector};
pub use session::{
    LoginRequest, Session, SessionCell, SessionError, SessionProvider, VaultSessionProvider,
};
pub use types::{
    SecretCreateRequest, SecretDeleteResult, SecretGetRequest, SecretIdentifier,
    SecretIdentifiersRequest, SecretIdentifiersResponse, SecretPutRequest, SecretResponse,
    SecretsDeleteRequest, SecretsDeleteResponse, SecretsGetRequest, SecretsResponse, VaultError,
};
