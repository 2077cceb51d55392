//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, routes, layers)
//!     → middleware/session_scope.rs (headers → login → Session in extensions)
//!     → handlers.rs (body decode, vault call, response)
//!     → response.rs (status + body helpers)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, GatewayServer, API_PREFIX};
