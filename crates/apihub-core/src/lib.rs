//! Core library for apihub.
//!
//! This crate holds everything the front-ends share:
//! - `auth`: session model, credential validation and the session store
//! - `api`: the credential gateway that talks to the remote auth service
//! - `guard`: route partitioning and the per-navigation redirect decision
//! - `context`: the process-wide session holder with change notification
//! - `catalog`, `snippets`, `playground`: API reference material and live calls
//! - `config`: user configuration and environment overrides

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod context;
pub mod guard;
pub mod playground;
pub mod snippets;
pub mod utils;

pub use api::{AuthError, AuthGateway, HttpTransport};
pub use auth::{FileSessionStore, MemorySessionStore, Session, SessionStore, User};
pub use config::Config;
pub use context::{AuthResult, AuthState, SessionContext};
pub use guard::{ApiId, GuardDecision, Route, RouteGuard};
