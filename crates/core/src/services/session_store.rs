use crate::api::traits::PortfolioApi;
use crate::errors::ClientError;
use crate::models::session::Session;
use crate::storage::token_store::TokenStore;

/// Owns the authentication token: where it is persisted and which one is
/// currently active.
///
/// The active credential is the token inside [`Session`]; replacing the
/// session value is the only way to change it, so there is never more than
/// one installed.
pub struct SessionStore<S: TokenStore> {
    storage: S,
    token_key: String,
    session: Session,
}

impl<S: TokenStore> SessionStore<S> {
    /// A store in the loading state. Call [`restore`](Self::restore) before
    /// making any routing decision.
    pub fn new(storage: S, token_key: impl Into<String>) -> Self {
        Self {
            storage,
            token_key: token_key.into(),
            session: Session::loading(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Install the persisted token, if any, and leave the loading state.
    ///
    /// Unreadable storage is logged and treated as "no token".
    pub fn restore(&mut self) -> Session {
        let stored = match self.storage.get(&self.token_key) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted token, starting signed out");
                None
            }
        };

        self.session = match stored {
            Some(token) if !token.is_empty() => Session::authenticated(token),
            _ => Session::anonymous(),
        };
        tracing::info!(
            authenticated = self.session.is_authenticated(),
            "session restored"
        );
        self.session.clone()
    }

    /// Exchange credentials for a token, persist it and install it.
    ///
    /// A rejected login becomes [`ClientError::Auth`] and leaves the session
    /// untouched.
    pub async fn login<A>(
        &mut self,
        api: &A,
        username: &str,
        password: &str,
    ) -> Result<Session, ClientError>
    where
        A: PortfolioApi + ?Sized,
    {
        let response = api.login(username, password).await.map_err(|e| match e {
            ClientError::Rejected { detail, .. } => ClientError::Auth { detail },
            other => other,
        })?;

        if response.access_token.is_empty() {
            tracing::warn!("login response carried no access token");
            return Err(ClientError::Auth { detail: None });
        }

        self.storage.set(&self.token_key, &response.access_token)?;
        self.session = Session::authenticated(response.access_token);
        tracing::info!(username, "logged in");
        Ok(self.session.clone())
    }

    /// Forget the token locally. No server round trip; always succeeds.
    pub fn logout(&mut self) -> Session {
        if let Err(e) = self.storage.remove(&self.token_key) {
            tracing::warn!(error = %e, "could not remove persisted token");
        }
        self.session = Session::anonymous();
        tracing::info!("logged out");
        self.session.clone()
    }
}

impl<S: TokenStore> std::fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("token_key", &self.token_key)
            .field("authenticated", &self.session.is_authenticated())
            .field("loading", &self.session.is_loading())
            .finish()
    }
}
