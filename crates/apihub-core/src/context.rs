//! Process-wide session holder.
//!
//! `SessionContext` is created once at startup from the session store and
//! passed to whatever needs session state. It owns the credential gateway,
//! writes the store on verified success and publishes every change on a
//! watch channel before the mutating call returns.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::{AuthGateway, AuthTransport};
use crate::auth::{Session, SessionStore, User};
use crate::guard::{GuardDecision, Route, RouteGuard};

const LOGIN_SUCCESS: &str = "Login successful";
const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
const REGISTER_SUCCESS: &str = "Registration successful! Please login.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";
const SAVE_FAILED: &str = "Could not save session";

/// Outcome of login/register as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthResult {
    pub success: bool,
    pub message: String,
}

impl AuthResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Snapshot published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthState {
    pub user: Option<User>,
    pub authenticated: bool,
}

impl AuthState {
    fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(s) if s.is_authenticated() => Self {
                user: s.user.clone(),
                authenticated: true,
            },
            _ => Self::default(),
        }
    }
}

pub struct SessionContext<T> {
    gateway: AuthGateway<T>,
    store: Arc<dyn SessionStore>,
    current: Mutex<Option<Session>>,
    tx: watch::Sender<AuthState>,
}

impl<T: AuthTransport> SessionContext<T> {
    /// Read the store once and start from whatever it holds. An unreadable
    /// store is cleared and the context starts signed out.
    pub fn new(gateway: AuthGateway<T>, store: Arc<dyn SessionStore>) -> Self {
        let initial = match store.get() {
            Ok(session) => session.filter(Session::is_authenticated),
            Err(e) => {
                warn!(error = %e, "Failed to read session store, starting signed out");
                if let Err(e) = store.clear() {
                    warn!(error = %e, "Failed to clear unreadable session store");
                }
                None
            }
        };
        debug!(authenticated = initial.is_some(), "Session context initialized");

        let (tx, _rx) = watch::channel(AuthState::from_session(initial.as_ref()));
        Self {
            gateway,
            store,
            current: Mutex::new(initial),
            tx,
        }
    }

    pub fn gateway(&self) -> &AuthGateway<T> {
        &self.gateway
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Swap the in-memory session and notify subscribers.
    fn replace(&self, session: Option<Session>) {
        let state = AuthState::from_session(session.as_ref());
        *self.lock() = session;
        self.tx.send_replace(state);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// True whenever a non-empty token is held. The token is not checked
    /// against the server.
    pub fn is_authenticated(&self) -> bool {
        self.lock().as_ref().is_some_and(Session::is_authenticated)
    }

    pub fn session(&self) -> Option<Session> {
        self.lock().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().as_ref().and_then(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.token.clone())
    }

    pub fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// Receive every state change. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    /// Run the route guard against the current session.
    pub fn guard(&self, route: Route) -> GuardDecision {
        RouteGuard::evaluate(route, self.is_authenticated())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> AuthResult {
        let session = match self.gateway.login(email, password).await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Login failed");
                return AuthResult::failure(e.user_message(LOGIN_FAILED));
            }
        };

        if let Err(e) = self.store.set(&session) {
            error!(error = %e, "Failed to save session");
            // Drop any partial write so the next start is signed out too
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear session store after failed save");
            }
            return AuthResult::failure(SAVE_FAILED);
        }
        self.replace(Some(session));
        info!("Signed in");
        AuthResult::success(LOGIN_SUCCESS)
    }

    /// Create an account. The user still has to log in afterwards.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthResult {
        match self.gateway.register(name, email, password).await {
            Ok(ack) => {
                debug!(remote_message = ?ack.message, "Registered");
                AuthResult::success(REGISTER_SUCCESS)
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                AuthResult::failure(e.user_message(REGISTER_FAILED))
            }
        }
    }

    /// Register and, on success, log in with the same credentials.
    pub async fn register_and_login(&self, name: &str, email: &str, password: &str) -> AuthResult {
        let registered = self.register(name, email, password).await;
        if !registered.success {
            return registered;
        }
        self.login(email, password).await
    }

    /// Sign out. The remote call is best-effort; the local session is
    /// cleared no matter what, so this never fails.
    pub async fn logout(&self) {
        if let Some(token) = self.token() {
            if let Err(e) = self.gateway.logout(&token).await {
                warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }
        if let Err(e) = self.store.clear() {
            error!(error = %e, "Failed to clear session store");
        }
        self.replace(None);
        info!("Signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::StubTransport;
    use crate::auth::{FileSessionStore, MemorySessionStore};
    use crate::guard::ApiId;

    fn context(stub: StubTransport) -> (SessionContext<StubTransport>, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let ctx = SessionContext::new(AuthGateway::new(stub), store.clone());
        (ctx, store)
    }

    fn signed_in(stub: StubTransport) -> (SessionContext<StubTransport>, Arc<MemorySessionStore>) {
        let session = Session::new("tok".to_string(), None);
        let store = Arc::new(MemorySessionStore::with_session(session));
        let ctx = SessionContext::new(AuthGateway::new(stub), store.clone());
        (ctx, store)
    }

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self) -> anyhow::Result<Option<Session>> {
            Err(anyhow::anyhow!("disk on fire"))
        }
        fn set(&self, _session: &Session) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
        fn clear(&self) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    #[tokio::test]
    async fn test_login_writes_store_and_notifies() {
        let (ctx, store) = context(StubTransport::new().respond(200, r#"{"token":"abc"}"#));
        let mut rx = ctx.subscribe();
        assert!(!rx.borrow_and_update().authenticated);

        let result = ctx.login("user@example.com", "validpass").await;
        assert_eq!(result, AuthResult::success(LOGIN_SUCCESS));
        assert!(ctx.is_authenticated());
        assert_eq!(store.get().unwrap().map(|s| s.token), Some("abc".to_string()));

        // Published before login returned
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().authenticated);
    }

    #[tokio::test]
    async fn test_login_without_token_leaves_store_empty() {
        let (ctx, store) = context(StubTransport::new().respond(200, r#"{"user":null}"#));
        let result = ctx.login("user@example.com", "validpass").await;
        assert_eq!(result, AuthResult::failure("Invalid response from server"));
        assert!(store.get().unwrap().is_none());
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_validation_failure() {
        let (ctx, _store) = context(StubTransport::new());
        let result = ctx.login("", "").await;
        assert!(!result.success);
        assert_eq!(result.message, "Email and password are required");
        assert!(ctx.gateway().transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_remote_message_and_fallback() {
        let (ctx, _store) = context(
            StubTransport::new()
                .respond(401, r#"{"message":"Invalid email or password"}"#)
                .respond(500, "")
                .fail("timed out"),
        );
        assert_eq!(ctx.login("a@b.co", "pw").await.message, "Invalid email or password");
        assert_eq!(ctx.login("a@b.co", "pw").await.message, LOGIN_FAILED);
        assert_eq!(ctx.login("a@b.co", "pw").await.message, LOGIN_FAILED);
    }

    #[tokio::test]
    async fn test_login_save_failure_is_reported() {
        let ctx = SessionContext::new(
            AuthGateway::new(StubTransport::new().respond(200, r#"{"token":"abc"}"#)),
            Arc::new(BrokenStore),
        );
        let result = ctx.login("user@example.com", "validpass").await;
        assert_eq!(result, AuthResult::failure(SAVE_FAILED));
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_save_stays_signed_out_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(crate::auth::session::TOKEN_KEY), "stale").unwrap();
        std::fs::create_dir(dir.path().join(crate::auth::session::USER_INFO_KEY)).unwrap();
        let store: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(dir.path().to_path_buf()));

        let ctx = SessionContext::new(
            AuthGateway::new(StubTransport::new().respond(200, r#"{"token":"abc"}"#)),
            store.clone(),
        );
        // The stale token signs the context in at startup
        assert!(ctx.is_authenticated());
        let result = ctx.login("user@example.com", "validpass").await;
        assert_eq!(result, AuthResult::failure(SAVE_FAILED));

        let restarted = SessionContext::new(AuthGateway::new(StubTransport::new()), store);
        assert!(!restarted.is_authenticated());
    }

    #[tokio::test]
    async fn test_broken_store_starts_signed_out() {
        let ctx =
            SessionContext::new(AuthGateway::new(StubTransport::new()), Arc::new(BrokenStore));
        assert!(!ctx.is_authenticated());
        // Logout still completes
        ctx.logout().await;
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_initializes_from_store() {
        let (ctx, _store) = signed_in(StubTransport::new());
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.token().as_deref(), Some("tok"));
        assert!(ctx.state().authenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_remote_fails() {
        let (ctx, store) = signed_in(StubTransport::new().fail("connection reset"));
        let mut rx = ctx.subscribe();

        ctx.logout().await;
        assert!(store.get().unwrap().is_none());
        assert!(!ctx.is_authenticated());
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().authenticated);

        let calls = ctx.gateway().transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_logout_twice() {
        let (ctx, store) = signed_in(StubTransport::new().respond(200, "{}"));
        ctx.logout().await;
        assert!(store.get().unwrap().is_none());
        ctx.logout().await;
        assert!(store.get().unwrap().is_none());

        // No token the second time, so no second remote call
        assert_eq!(ctx.gateway().transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_register_does_not_sign_in() {
        let (ctx, store) = context(StubTransport::new().respond(201, r#"{"message":"ok"}"#));
        let result = ctx.register("Hana", "hana@example.com", "secret1").await;
        assert_eq!(result, AuthResult::success(REGISTER_SUCCESS));
        assert!(!ctx.is_authenticated());
        assert!(store.get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_failure_messages() {
        let (ctx, _store) = context(
            StubTransport::new()
                .respond(400, r#"{"message":"Email already registered"}"#)
                .fail("dns"),
        );
        assert_eq!(
            ctx.register("Hana", "hana@example.com", "secret1").await.message,
            "Email already registered"
        );
        let result = ctx.register("Hana", "hana@example.com", "secret1").await;
        assert_eq!(result.message, REGISTER_FAILED);
        assert_eq!(
            ctx.register("Hana", "hana@example.com", "four").await.message,
            "Password must be at least 6 characters"
        );
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (ctx, _store) = context(
            StubTransport::new()
                .respond(201, "{}")
                .respond(200, r#"{"token":"fresh","user":{"id":"3","name":"Hana","email":"hana@example.com"}}"#),
        );
        let result = ctx.register_and_login("Hana", "hana@example.com", "secret1").await;
        assert!(result.success);
        assert_eq!(ctx.user().map(|u| u.name), Some("Hana".to_string()));

        let paths: Vec<_> = ctx.gateway().transport().calls().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["register", "login"]);
    }

    #[tokio::test]
    async fn test_guard_follows_session() {
        let (ctx, _store) = context(StubTransport::new().respond(200, r#"{"token":"abc"}"#));
        let docs = Route::Api(ApiId::Hadith);
        assert_eq!(ctx.guard(docs), GuardDecision::Redirect(Route::Login));
        assert_eq!(ctx.guard(Route::Login), GuardDecision::Allow);

        ctx.login("user@example.com", "validpass").await;
        assert_eq!(ctx.guard(docs), GuardDecision::Allow);
        assert_eq!(ctx.guard(Route::Login), GuardDecision::Redirect(Route::Home));
    }
}
