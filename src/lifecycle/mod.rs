//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Parse flags → merge config → validate → bind listener → spawn server
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast trigger → drain races deadline →
//!     clean exit | forced exit
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → one shutdown trigger
//! ```
//!
//! # Design Decisions
//! - The listener has a single owner; only the lifecycle controller starts
//!   or stops it
//! - The drain/deadline race is a `select`, not a poll; the losing future is
//!   dropped, which is what cancels the timer on the clean path
//! - Exactly one of {clean exit, forced exit} happens per process

pub mod shutdown;
pub mod signals;

pub use shutdown::{race_drain, DrainOutcome, Shutdown};
