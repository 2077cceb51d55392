//! warden-gateway
//!
//! A credential-scoped HTTP gateway for a secrets-manager backend.
//!
//! # Architecture Overview
//!
//! ```text
//! Client request
//!     → http::server (router, ambient layers)
//!     → http::middleware::session_scope
//!           headers → vault::session (login, one Session per request)
//!     → http::handlers (decode body, take Session, call vault, respond)
//!     → Session dropped = vault client closed
//!
//! Process
//!     main → lifecycle::signals (SIGINT/SIGTERM)
//!          → lifecycle::shutdown (drain races 15 s deadline)
//! ```
//!
//! Every request owns its own authenticated vault session; there is no pool,
//! no cache, and no way for a session to outlive or escape its request.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod vault;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
