//! Authentication module for the client-held session.
//!
//! This module provides:
//! - `Session`: the bearer token plus an optional user profile
//! - `SessionStore`: get/set/clear over client-persisted storage
//! - `credentials`: transient login and registration input with local validation
//!
//! A non-empty token is treated as authenticated. Nothing here checks
//! signatures or expiry; the remote service is the only authority.

pub mod credentials;
pub mod session;

pub use credentials::{is_valid_email, Credentials, Registration, MIN_PASSWORD_LENGTH};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore, User};
