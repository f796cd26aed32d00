//! Application state management for the apihub TUI.
//!
//! This module contains the core `App` struct: the current route, form
//! state, playground state and the channel that background auth and
//! playground tasks report back on.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use apihub_core::catalog::{self, ApiDoc, EndpointDoc};
use apihub_core::playground::{ApiCall, ApiResponse, PlaygroundClient};
use apihub_core::snippets::{self, Language};
use apihub_core::{
    AuthGateway, AuthResult, AuthState, Config, FileSessionStore, GuardDecision, HttpTransport,
    Route, SessionContext, SessionStore,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 100;

/// Maximum length for name input.
const MAX_NAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for the try-it request line.
const MAX_REQUEST_LENGTH: usize = 200;

pub type Session = SessionContext<HttpTransport>;

/// Build the session context the way both the TUI and the CLI use it.
pub fn build_session(config: &Config) -> Result<Arc<Session>> {
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.storage_dir()?));
    build_session_with_store(config, store)
}

pub fn build_session_with_store(
    config: &Config,
    store: Arc<dyn SessionStore>,
) -> Result<Arc<Session>> {
    let transport = HttpTransport::new(&config.auth_base_url(), config.request_timeout())?;
    Ok(Arc::new(SessionContext::new(AuthGateway::new(transport), store)))
}

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Focused element of the login and register forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Password,
    Submit,
}

impl FormField {
    /// Next field. The login form has no name field.
    pub fn next(self, with_name: bool) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Password,
            FormField::Password => FormField::Submit,
            FormField::Submit if with_name => FormField::Name,
            FormField::Submit => FormField::Email,
        }
    }

    pub fn prev(self, with_name: bool) -> Self {
        match self {
            FormField::Name => FormField::Submit,
            FormField::Email if with_name => FormField::Name,
            FormField::Email => FormField::Submit,
            FormField::Password => FormField::Email,
            FormField::Submit => FormField::Password,
        }
    }
}

#[derive(Debug, Default)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

/// Focus area on an API page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFocus {
    Endpoints,
    TryIt,
}

/// Result types from background tasks.
enum TaskResult {
    Login(AuthResult),
    Register(AuthResult),
    LoggedOut,
    Playground {
        route: Route,
        endpoint: usize,
        result: Result<ApiResponse, String>,
    },
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub session: Arc<Session>,
    pub playground: PlaygroundClient,
    auth_rx: watch::Receiver<AuthState>,
    pub auth: AuthState,

    pub state: AppState,
    pub route: Route,
    pub status_message: Option<String>,
    /// An auth or playground request is in flight.
    pub pending: bool,

    pub form: FormState,
    pub form_focus: FormField,

    pub doc_focus: DocFocus,
    pub endpoint_selection: usize,
    pub language: Language,
    pub request_input: String,
    pub response: Option<Result<ApiResponse, String>>,

    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let session = build_session(&config)?;
        Self::with_session(config, session)
    }

    pub fn with_session(config: Config, session: Arc<Session>) -> Result<Self> {
        let playground = PlaygroundClient::new(config.clone())?;
        let auth_rx = session.subscribe();
        let auth = auth_rx.borrow().clone();
        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        debug!(authenticated = auth.authenticated, "App created");

        let form = FormState {
            email: config.last_email.clone().unwrap_or_default(),
            ..Default::default()
        };

        Ok(Self {
            config,
            session,
            playground,
            auth_rx,
            auth,
            state: AppState::Normal,
            route: Route::Home,
            status_message: None,
            pending: false,
            form,
            form_focus: FormField::Email,
            doc_focus: DocFocus::Endpoints,
            endpoint_selection: 0,
            language: Language::JavaScript,
            request_input: String::new(),
            response: None,
            task_rx,
            task_tx,
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Routes shown in the navbar for the current auth state.
    pub fn nav_routes(&self) -> Vec<Route> {
        Route::all()
            .into_iter()
            .filter(|r| match r {
                Route::Login | Route::Register => !self.auth.authenticated,
                Route::Logout => self.auth.authenticated,
                _ => true,
            })
            .collect()
    }

    /// Go to `requested`, or wherever the guard sends us instead.
    pub fn navigate(&mut self, requested: Route) {
        let decision = self.session.guard(requested);
        let target = decision.resolve(requested);
        if let GuardDecision::Redirect(to) = decision {
            info!(from = %requested, to = %to, "Navigation redirected");
            self.status_message = Some(match to {
                Route::Login => format!("Please login to view {}", requested.title()),
                _ => "You are already logged in".to_string(),
            });
        }
        self.enter(target);
    }

    fn enter(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        debug!(route = %route, "Entering route");
        self.route = route;
        self.form.error = None;
        self.form.password.clear();
        self.form_focus = if route == Route::Register {
            FormField::Name
        } else if self.form.email.is_empty() {
            FormField::Email
        } else {
            FormField::Password
        };
        self.doc_focus = DocFocus::Endpoints;
        self.endpoint_selection = 0;
        self.response = None;
        self.reset_request_input();
    }

    /// Move along the navbar, wrapping around.
    pub fn navigate_relative(&mut self, forward: bool) {
        let routes = self.nav_routes();
        let current = routes.iter().position(|r| *r == self.route).unwrap_or(0);
        let next = if forward {
            (current + 1) % routes.len()
        } else {
            (current + routes.len() - 1) % routes.len()
        };
        self.navigate(routes[next]);
    }

    pub fn navigate_index(&mut self, index: usize) {
        if let Some(route) = self.nav_routes().get(index).copied() {
            self.navigate(route);
        }
    }

    // =========================================================================
    // API pages
    // =========================================================================

    pub fn current_doc(&self) -> Option<&'static ApiDoc> {
        match self.route {
            Route::Api(id) => Some(catalog::get(id)),
            _ => None,
        }
    }

    pub fn selected_endpoint(&self) -> Option<&'static EndpointDoc> {
        self.current_doc()
            .and_then(|doc| doc.endpoints.get(self.endpoint_selection))
    }

    pub fn select_endpoint(&mut self, index: usize) {
        let Some(doc) = self.current_doc() else {
            return;
        };
        if index < doc.endpoints.len() {
            self.endpoint_selection = index;
            self.response = None;
            self.reset_request_input();
        }
    }

    /// Prefill the try-it line from the selected endpoint's example.
    pub fn reset_request_input(&mut self) {
        self.request_input = match self.selected_endpoint() {
            Some(endpoint) if endpoint.query.is_empty() => endpoint.example.to_string(),
            Some(endpoint) => {
                let query: Vec<String> = endpoint
                    .query
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                format!("{}?{}", endpoint.example, query.join("&"))
            }
            None => String::new(),
        };
    }

    pub fn snippet(&self) -> Option<String> {
        let doc = self.current_doc()?;
        let endpoint = self.selected_endpoint()?;
        Some(snippets::render(
            self.language,
            &self.config.base_url(doc.id),
            endpoint,
            doc.key,
        ))
    }

    // =========================================================================
    // Background operations
    // =========================================================================

    pub fn submit_login(&mut self) {
        if self.pending {
            return;
        }
        self.pending = true;
        self.form.error = None;
        let session = Arc::clone(&self.session);
        let tx = self.task_tx.clone();
        let email = self.form.email.clone();
        let password = std::mem::take(&mut self.form.password);
        tokio::spawn(async move {
            let result = session.login(&email, &password).await;
            let _ = tx.send(TaskResult::Login(result)).await;
        });
        self.status_message = Some("Logging in...".to_string());
    }

    pub fn submit_register(&mut self) {
        if self.pending {
            return;
        }
        self.pending = true;
        self.form.error = None;
        let session = Arc::clone(&self.session);
        let tx = self.task_tx.clone();
        let name = self.form.name.clone();
        let email = self.form.email.clone();
        let password = std::mem::take(&mut self.form.password);
        tokio::spawn(async move {
            let result = session.register(&name, &email, &password).await;
            let _ = tx.send(TaskResult::Register(result)).await;
        });
        self.status_message = Some("Creating account...".to_string());
    }

    pub fn submit_logout(&mut self) {
        if self.pending {
            return;
        }
        self.pending = true;
        let session = Arc::clone(&self.session);
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            session.logout().await;
            let _ = tx.send(TaskResult::LoggedOut).await;
        });
        self.status_message = Some("Logging out...".to_string());
    }

    /// Send the try-it line for the current API.
    pub fn send_request(&mut self) {
        let Route::Api(api) = self.route else {
            return;
        };
        if self.pending {
            return;
        }
        let call = ApiCall::parse(api, &self.request_input);
        // Checked up front so a missing key never reaches the network
        if let Err(e) = self.playground.prepare(&call) {
            self.response = Some(Err(e.to_string()));
            return;
        }

        self.pending = true;
        let client = self.playground.clone();
        let tx = self.task_tx.clone();
        let route = self.route;
        let endpoint = self.endpoint_selection;
        tokio::spawn(async move {
            let result = client.send(&call).await.map_err(|e| e.to_string());
            let _ = tx
                .send(TaskResult::Playground {
                    route,
                    endpoint,
                    result,
                })
                .await;
        });
        self.status_message = Some(format!("GET {}", self.request_input));
    }

    /// Apply finished background work and any auth state change.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
        self.sync_auth();
    }

    fn process_task_result(&mut self, result: TaskResult) {
        self.pending = false;
        match result {
            TaskResult::Login(result) => {
                if result.success {
                    self.remember_email();
                    self.status_message = Some(result.message);
                } else {
                    self.status_message = None;
                    self.form.error = Some(result.message);
                }
            }
            TaskResult::Register(result) => {
                if result.success {
                    self.status_message = Some(result.message);
                    self.navigate(Route::Login);
                } else {
                    self.status_message = None;
                    self.form.error = Some(result.message);
                }
            }
            TaskResult::LoggedOut => {
                self.status_message = Some("Logged out".to_string());
            }
            TaskResult::Playground {
                route,
                endpoint,
                result,
            } => {
                if let Err(ref e) = result {
                    warn!(error = %e, "Playground request failed");
                }
                self.status_message = None;
                // The user moved on while the request was in flight
                if route != self.route || endpoint != self.endpoint_selection {
                    debug!(route = %route, endpoint, "Dropping stale playground response");
                    return;
                }
                self.response = Some(result);
            }
        }
    }

    /// Pick up a changed auth state and re-run the guard on the current page.
    pub fn sync_auth(&mut self) {
        if !self.auth_rx.has_changed().unwrap_or(false) {
            return;
        }
        self.auth = self.auth_rx.borrow_and_update().clone();
        debug!(authenticated = self.auth.authenticated, "Auth state changed");

        let decision = self.session.guard(self.route);
        if let GuardDecision::Redirect(to) = decision {
            self.enter(to);
        }
    }

    fn remember_email(&mut self) {
        let email = self.form.email.trim().to_string();
        if self.config.last_email.as_deref() == Some(email.as_str()) {
            return;
        }
        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    /// Name shown in the navbar logout entry.
    pub fn user_label(&self) -> &str {
        self.auth
            .user
            .as_ref()
            .map(|u| u.display_name())
            .unwrap_or("")
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

pub fn can_add_name_char(current_len: usize, c: char) -> bool {
    current_len < MAX_NAME_LENGTH && is_valid_input_char(c)
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_request_char(current_len: usize, c: char) -> bool {
    current_len < MAX_REQUEST_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
