pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use api::client::ApiClient;
use api::traits::PortfolioApi;
use config::ClientConfig;
use errors::ClientError;
use models::{
    auth::UserCreate,
    session::Session,
    transaction::TransactionKind,
};
use services::{
    error_normalizer::normalize,
    route_guard::{self, Route, RouteDecision},
    session_store::SessionStore,
    transaction_controller::{SubmitOutcome, TransactionController},
};
use storage::token_store::TokenStore;

pub const LOGIN_ERROR: &str = "Failed to log in";
pub const REGISTER_ERROR: &str = "Failed to register";

/// Main entry point for the CryptoFolio client library.
///
/// Wires the session store, the request gateway and the dashboard's
/// transaction controller together. Every operation that can fail at the
/// user's level returns the display string for the banner instead of an
/// error value.
#[must_use]
pub struct CryptoFolio<S: TokenStore> {
    api: Arc<ApiClient>,
    sessions: SessionStore<S>,
    dashboard: TransactionController<ApiClient>,
}

impl<S: TokenStore> std::fmt::Debug for CryptoFolio<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoFolio")
            .field("api_url", &self.api.base_url())
            .field("session", self.sessions.session())
            .field("dashboard", &self.dashboard)
            .finish()
    }
}

impl<S: TokenStore> CryptoFolio<S> {
    /// Build the client. The session starts in the loading state; call
    /// [`restore`](Self::restore) before routing.
    pub fn new(config: &ClientConfig, storage: S) -> Result<Self, ClientError> {
        let api = Arc::new(ApiClient::new(config)?);
        Ok(Self {
            dashboard: TransactionController::new(Arc::clone(&api)),
            sessions: SessionStore::new(storage, config.token_key.clone()),
            api,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        self.sessions.session()
    }

    pub fn dashboard(&self) -> &TransactionController<ApiClient> {
        &self.dashboard
    }

    // ── Session ─────────────────────────────────────────────────────

    pub fn restore(&mut self) -> Session {
        self.sessions.restore()
    }

    /// Log in; on failure returns the banner text and stays signed out.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, String> {
        self.sessions
            .login(self.api.as_ref(), username, password)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "login failed");
                normalize(&e, LOGIN_ERROR)
            })
    }

    /// Create an account. Does not log in; returns the server's message.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, String> {
        let user = UserCreate::new(username, password);
        match self.api.register(&user).await {
            Ok(response) => Ok(response.message),
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                Err(normalize(&e, REGISTER_ERROR))
            }
        }
    }

    /// Sign out, discard the dashboard view and route to the login screen.
    pub fn logout(&mut self) -> RouteDecision {
        self.dashboard.teardown();
        self.dashboard = TransactionController::new(Arc::clone(&self.api));
        let session = self.sessions.logout();
        route_guard::resolve(Route::Login.path(), &session)
    }

    pub async fn ping(&self) {
        self.api.ping().await;
    }

    // ── Routing ─────────────────────────────────────────────────────

    pub fn route(&self, path: &str) -> RouteDecision {
        route_guard::resolve(path, self.sessions.session())
    }

    /// Navigate to the dashboard, loading the portfolio if it is allowed.
    pub async fn enter_dashboard(&self) -> RouteDecision {
        let decision = self.route(Route::Dashboard.path());
        if decision == RouteDecision::Render(Route::Dashboard) {
            self.dashboard.load_portfolio(self.sessions.session()).await;
        }
        decision
    }

    // ── Transactions ────────────────────────────────────────────────

    pub async fn submit(&self, kind: TransactionKind) -> SubmitOutcome {
        self.dashboard.submit(self.sessions.session(), kind).await
    }

    pub async fn load_history(&self) {
        self.dashboard.load_history(self.sessions.session()).await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CryptoFolio<storage::token_store::FileTokenStore> {
    /// Client persisting its token to `config.token_path`.
    pub fn with_file_storage(config: &ClientConfig) -> Result<Self, ClientError> {
        let storage = storage::token_store::FileTokenStore::new(config.token_path.clone());
        Self::new(config, storage)
    }
}
