use crate::models::session::Session;

/// The screens the application knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
        }
    }

    /// Match a navigation path. A trailing slash and a query string or
    /// fragment are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Landing),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a navigation ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The session is still being restored; show the placeholder.
    Loading,
    /// Show the requested screen.
    Render(Route),
    /// Go somewhere else instead.
    Redirect(Route),
    /// No screen matches the path; nothing is rendered.
    NotFound,
}

impl RouteDecision {
    /// The screen that ends up on display, following a redirect.
    pub fn effective_route(&self) -> Option<Route> {
        match self {
            RouteDecision::Render(route) | RouteDecision::Redirect(route) => Some(*route),
            RouteDecision::Loading | RouteDecision::NotFound => None,
        }
    }
}

/// Decide what `path` shows for `session`. Pure; safe to call on every
/// navigation and every session change.
pub fn resolve(path: &str, session: &Session) -> RouteDecision {
    if session.is_loading() {
        return RouteDecision::Loading;
    }

    let Some(route) = Route::from_path(path) else {
        return RouteDecision::NotFound;
    };

    let authenticated = session.is_authenticated();
    match route {
        Route::Login | Route::Register | Route::Landing if authenticated => {
            RouteDecision::Redirect(Route::Dashboard)
        }
        Route::Dashboard if !authenticated => RouteDecision::Redirect(Route::Login),
        route => RouteDecision::Render(route),
    }
}
