/// The client's authentication state.
///
/// `is_authenticated()` is derived from the token, so the two can never
/// disagree. A session starts in the loading state and leaves it exactly
/// once, when the persisted credential has been restored.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    loading: bool,
}

impl Session {
    /// State at application start, before the restore step has run.
    pub fn loading() -> Self {
        Self {
            token: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            token: None,
            loading: false,
        }
    }

    /// An authenticated session. Empty tokens are treated as no token.
    pub fn authenticated(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
            loading: false,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Value for the `Authorization` header, if a credential is installed.
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("loading", &self.loading)
            .finish()
    }
}
