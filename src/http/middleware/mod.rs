//! Gateway middleware.

pub mod session_scope;

pub use session_scope::{
    session_scope, HEADER_ACCESS_TOKEN, HEADER_API_URL, HEADER_IDENTITY_URL, HEADER_STATE_PATH,
};
