//! Gateway for the remote authentication service.
//!
//! `AuthGateway` validates input locally, sends one request per operation
//! and turns the reply into a `Session`, a `RegisterAck` or an `AuthError`.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::auth::{Credentials, Registration, Session, User};

use super::error::truncate_body;
use super::{AuthError, AuthTransport, TransportResponse};

// ============================================================================
// Constants
// ============================================================================

/// Default base URL of the authentication service
pub const DEFAULT_AUTH_BASE_URL: &str = "https://user-authentication-api-jqfm.onrender.com/api/v2/users";

const LOGIN_PATH: &str = "login";
const REGISTER_PATH: &str = "register";
const LOGOUT_PATH: &str = "logout";

/// Reported when a successful login reply carries no token.
pub const INVALID_RESPONSE: &str = "Invalid response from server";

/// Acknowledgement of a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

pub struct AuthGateway<T> {
    transport: T,
}

impl<T: AuthTransport> AuthGateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create an account. Does not establish a session.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterAck, AuthError> {
        let registration = Registration::new(name, email, password);
        registration.validate()?;

        let body = json!({
            "name": registration.name,
            "email": registration.email,
            "password": registration.password,
        });
        let response = self.transport.post_json(REGISTER_PATH, &body, None).await?;
        let response = Self::check_response(response, REGISTER_PATH)?;

        // The ack body is informational; an unexpected shape still counts as success
        let ack = serde_json::from_str::<RegisterAck>(&response.body).unwrap_or_else(|e| {
            debug!(error = %e, "Registration ack body not understood");
            RegisterAck::default()
        });
        info!(email = %registration.email, "Registration acknowledged");
        Ok(ack)
    }

    /// Log in and return the new session. The caller decides where to keep it.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = Credentials::new(email, password);
        credentials.validate()?;

        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let response = self.transport.post_json(LOGIN_PATH, &body, None).await?;
        let response = Self::check_response(response, LOGIN_PATH)?;

        let session = Self::parse_login(&response.body)?;
        info!(email = %credentials.email, has_profile = session.user.is_some(), "Login accepted");
        Ok(session)
    }

    /// Tell the service the token is being discarded.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .transport
            .post_json(LOGOUT_PATH, &json!({}), Some(token))
            .await?;
        Self::check_response(response, LOGOUT_PATH)?;
        debug!("Logout acknowledged");
        Ok(())
    }

    fn check_response(
        response: TransportResponse,
        path: &str,
    ) -> Result<TransportResponse, AuthError> {
        if response.is_success() {
            Ok(response)
        } else {
            warn!(
                path,
                status = response.status,
                body = %truncate_body(&response.body),
                "Auth service rejected request"
            );
            Err(AuthError::from_status(response.status, &response.body))
        }
    }

    /// A login reply must be JSON with a non-empty string `token`. The `user`
    /// object is optional and dropped if malformed.
    fn parse_login(body: &str) -> Result<Session, AuthError> {
        let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
            warn!(error = %e, "Login reply is not JSON");
            AuthError::Protocol(INVALID_RESPONSE.to_string())
        })?;

        let token = value
            .get("token")
            .and_then(|t| t.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("Login reply has no token");
                AuthError::Protocol(INVALID_RESPONSE.to_string())
            })?;

        let user = value
            .get("user")
            .filter(|u| !u.is_null())
            .and_then(|u| match serde_json::from_value::<User>(u.clone()) {
                Ok(user) => Some(user),
                Err(e) => {
                    debug!(error = %e, "Dropping malformed user profile");
                    None
                }
            });

        Ok(Session::new(token.to_string(), user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::StubTransport;

    #[tokio::test]
    async fn test_login_success() {
        let stub = StubTransport::new()
            .respond(200, r#"{"token":"abc","user":{"id":"1","name":"Ali","email":"ali@example.com"}}"#);
        let gateway = AuthGateway::new(stub);

        let session = gateway.login("ali@example.com", "validpass").await.unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.user.as_ref().map(|u| u.name.as_str()), Some("Ali"));

        let calls = gateway.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "login");
        assert_eq!(calls[0].body["email"], "ali@example.com");
        assert_eq!(calls[0].body["password"], "validpass");
        assert!(calls[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_login_missing_token_is_protocol_error() {
        for body in [r#"{"user":{"id":"1"}}"#, r#"{"token":""}"#, r#"{"token":5}"#, "OK"] {
            let gateway = AuthGateway::new(StubTransport::new().respond(200, body));
            let err = gateway.login("ali@example.com", "validpass").await.unwrap_err();
            assert_eq!(err, AuthError::Protocol(INVALID_RESPONSE.to_string()));
        }
    }

    #[tokio::test]
    async fn test_login_malformed_user_is_dropped() {
        let stub = StubTransport::new().respond(200, r#"{"token":"t","user":"nope"}"#);
        let gateway = AuthGateway::new(stub);
        let session = gateway.login("ali@example.com", "validpass").await.unwrap();
        assert_eq!(session.token, "t");
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_login_validation_skips_network() {
        let gateway = AuthGateway::new(StubTransport::new());
        let cases = [
            ("", "validpass"),
            ("ali@example.com", ""),
            ("ali.example.com", "validpass"),
        ];
        for (email, password) in cases {
            let err = gateway.login(email, password).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)));
        }
        assert!(gateway.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_remote_rejection() {
        let stub = StubTransport::new().respond(401, r#"{"message":"Wrong password"}"#);
        let gateway = AuthGateway::new(stub);
        let err = gateway.login("ali@example.com", "validpass").await.unwrap_err();
        assert_eq!(
            err,
            AuthError::Remote {
                status: 401,
                message: Some("Wrong password".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_login_transport_failure() {
        let gateway = AuthGateway::new(StubTransport::new().fail("connection refused"));
        let err = gateway.login("ali@example.com", "validpass").await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(ref m) if m.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_register_success() {
        let body = r#"{"message":"User created","user":{"id":"9","name":"Noor","email":"noor@example.com"}}"#;
        let gateway = AuthGateway::new(StubTransport::new().respond(201, body));
        let ack = gateway.register(" Noor ", "noor@example.com", "secret1").await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("User created"));
        assert_eq!(ack.user.map(|u| u.id), Some("9".to_string()));

        let calls = gateway.transport().calls();
        assert_eq!(calls[0].path, "register");
        assert_eq!(calls[0].body["name"], "Noor");
    }

    #[tokio::test]
    async fn test_register_accepts_empty_ack() {
        let gateway = AuthGateway::new(StubTransport::new().respond(200, ""));
        let ack = gateway.register("Noor", "noor@example.com", "secret1").await.unwrap();
        assert_eq!(ack, RegisterAck::default());
    }

    #[tokio::test]
    async fn test_register_validation_skips_network() {
        let gateway = AuthGateway::new(StubTransport::new());
        assert!(gateway.register("Noor", "noor@example.com", "short").await.is_err());
        assert!(gateway.register("", "noor@example.com", "secret1").await.is_err());
        assert!(gateway.register("Noor", "noor@", "secret1").await.is_err());
        assert!(gateway.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_logout_sends_bearer() {
        let gateway = AuthGateway::new(StubTransport::new().respond(200, "{}"));
        gateway.logout("abc").await.unwrap();

        let calls = gateway.transport().calls();
        assert_eq!(calls[0].path, "logout");
        assert_eq!(calls[0].bearer.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_logout_reports_failure() {
        let gateway = AuthGateway::new(StubTransport::new().respond(500, "oops"));
        assert!(matches!(
            gateway.logout("abc").await,
            Err(AuthError::Remote { status: 500, message: None })
        ));
    }
}
