//! Credential gateway for the remote authentication service.
//!
//! This module provides the `AuthGateway`, which validates credentials
//! locally and forwards register/login/logout to the auth service through
//! an `AuthTransport`. `HttpTransport` is the reqwest-backed transport.
//!
//! Every failure comes back as an `AuthError` variant; nothing here panics on
//! a bad response.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{AuthGateway, RegisterAck};
pub use error::{AuthError, TransportError};
pub use transport::{AuthTransport, HttpTransport, TransportResponse};
