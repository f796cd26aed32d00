//! Route partitioning and the per-navigation redirect decision.
//!
//! Home, Login and Register are public. Logout and every API documentation
//! page require a session. Login and Register are also auth-only: a user who
//! already has a session is sent home instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The documented APIs, in navbar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiId {
    Quran,
    Weather,
    Hadith,
    Recipe,
    Github,
}

impl ApiId {
    pub const ALL: [ApiId; 5] = [
        ApiId::Quran,
        ApiId::Weather,
        ApiId::Hadith,
        ApiId::Recipe,
        ApiId::Github,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ApiId::Quran => "quran",
            ApiId::Weather => "weather",
            ApiId::Hadith => "hadith",
            ApiId::Recipe => "recipe",
            ApiId::Github => "github",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|api| api.slug() == slug)
    }
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Logout,
    Api(ApiId),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Logout => "/logout",
            Route::Api(ApiId::Quran) => "/quran",
            Route::Api(ApiId::Weather) => "/weather",
            Route::Api(ApiId::Hadith) => "/hadith",
            Route::Api(ApiId::Recipe) => "/recipe",
            Route::Api(ApiId::Github) => "/github",
        }
    }

    /// Parse a path. A single trailing slash is tolerated; unknown paths
    /// yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = match path {
            "/" => "/",
            p => p.strip_suffix('/').unwrap_or(p),
        };
        match trimmed {
            "/" | "" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/logout" => Some(Route::Logout),
            other => other
                .strip_prefix('/')
                .and_then(ApiId::from_slug)
                .map(Route::Api),
        }
    }

    /// Every route, in navbar order.
    pub fn all() -> Vec<Route> {
        let mut routes = vec![Route::Home];
        routes.extend(ApiId::ALL.into_iter().map(Route::Api));
        routes.extend([Route::Login, Route::Register, Route::Logout]);
        routes
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Logout | Route::Api(_))
    }

    /// Routes that only make sense without a session.
    pub fn is_auth_only(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Logout => "Logout",
            Route::Api(ApiId::Quran) => "Quran API",
            Route::Api(ApiId::Weather) => "Weather API",
            Route::Api(ApiId::Hadith) => "Hadith API",
            Route::Api(ApiId::Recipe) => "Recipe API",
            Route::Api(ApiId::Github) => "GitHub API",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

impl GuardDecision {
    /// The route that ends up rendered.
    pub fn resolve(self, requested: Route) -> Route {
        match self {
            GuardDecision::Allow => requested,
            GuardDecision::Redirect(target) => target,
        }
    }
}

pub struct RouteGuard;

impl RouteGuard {
    /// Decide one navigation. The redirect target is final and is not
    /// evaluated again.
    pub fn evaluate(route: Route, authenticated: bool) -> GuardDecision {
        if route.is_protected() && !authenticated {
            GuardDecision::Redirect(Route::Login)
        } else if route.is_auth_only() && authenticated {
            GuardDecision::Redirect(Route::Home)
        } else {
            GuardDecision::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_route_without_session_goes_to_login() {
        for route in [Route::Logout, Route::Api(ApiId::Quran), Route::Api(ApiId::Github)] {
            assert_eq!(RouteGuard::evaluate(route, false), GuardDecision::Redirect(Route::Login));
            assert_eq!(RouteGuard::evaluate(route, true), GuardDecision::Allow);
        }
    }

    #[test]
    fn test_auth_routes_with_session_go_home() {
        assert_eq!(RouteGuard::evaluate(Route::Login, true), GuardDecision::Redirect(Route::Home));
        assert_eq!(
            RouteGuard::evaluate(Route::Register, true),
            GuardDecision::Redirect(Route::Home)
        );
        assert_eq!(RouteGuard::evaluate(Route::Login, false), GuardDecision::Allow);
        assert_eq!(RouteGuard::evaluate(Route::Register, false), GuardDecision::Allow);
    }

    #[test]
    fn test_home_is_always_allowed() {
        assert_eq!(RouteGuard::evaluate(Route::Home, false), GuardDecision::Allow);
        assert_eq!(RouteGuard::evaluate(Route::Home, true), GuardDecision::Allow);
    }

    #[test]
    fn test_redirect_targets_are_public() {
        // A redirect never lands on a route that would redirect again
        for route in Route::all() {
            for authed in [false, true] {
                let target = RouteGuard::evaluate(route, authed).resolve(route);
                if target != route {
                    assert_eq!(RouteGuard::evaluate(target, authed), GuardDecision::Allow);
                }
            }
        }
    }

    #[test]
    fn test_path_round_trip() {
        for route in Route::all() {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/weather/"), Some(Route::Api(ApiId::Weather)));
        assert_eq!(Route::from_path("/nope"), None);
        assert_eq!(Route::from_path("quran"), None);
    }

    #[test]
    fn test_route_order() {
        let routes = Route::all();
        assert_eq!(routes.len(), 9);
        assert_eq!(routes[0], Route::Home);
        assert_eq!(routes[1], Route::Api(ApiId::Quran));
        assert_eq!(routes[8], Route::Logout);
    }
}
