use thiserror::Error;

use crate::services::error_normalizer::FailureDetail;

/// Unified error type for the entire cryptofolio-client library.
/// Every public fallible function returns `Result<T, ClientError>`.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Remote rejections ───────────────────────────────────────────
    #[error("Authentication failed{}", detail_suffix(.detail))]
    Auth { detail: Option<FailureDetail> },

    #[error("Request rejected with status {status}{}", detail_suffix(.detail))]
    Rejected {
        status: u16,
        detail: Option<FailureDetail>,
    },

    // ── Transport ───────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Local ───────────────────────────────────────────────────────
    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used by hosts that want to react differently
/// to bad credentials, server-side validation and transport trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Auth,
    Validation,
    Network,
    Local,
}

impl ClientError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ClientError::Auth { .. } => FailureKind::Auth,
            ClientError::Rejected { .. } => FailureKind::Validation,
            ClientError::Network(_) | ClientError::Deserialization(_) => FailureKind::Network,
            ClientError::Storage(_) | ClientError::Config(_) => FailureKind::Local,
        }
    }

    /// The structured detail carried by a server rejection, if any.
    pub fn detail(&self) -> Option<&FailureDetail> {
        match self {
            ClientError::Auth { detail } | ClientError::Rejected { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}

fn detail_suffix(detail: &Option<FailureDetail>) -> String {
    match detail.as_ref().and_then(FailureDetail::message) {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Deserialization(e.to_string())
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(e: config::ConfigError) -> Self {
        ClientError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; keep logged messages free of query strings.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        if e.is_decode() {
            ClientError::Deserialization(sanitized)
        } else {
            ClientError::Network(sanitized)
        }
    }
}
