use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::auth::{LoginResponse, MessageResponse, RegisterResponse, UserCreate};
use crate::models::history::HistoryResponse;
use crate::models::portfolio::Portfolio;
use crate::models::session::Session;
use crate::models::transaction::TransactionRequest;
use crate::services::error_normalizer::FailureDetail;
use super::traits::PortfolioApi;

/// HTTP gateway to the ledger service.
///
/// Holds no credential of its own: each authenticated call receives the
/// current [`Session`] and attaches its token as a bearer `Authorization`
/// header. Without a token the call goes out unauthenticated and the server
/// decides.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match config.request_timeout() {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against `path`, attaching the session's bearer token
    /// when one is installed.
    pub fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let bearer = session.and_then(Session::bearer);
        tracing::debug!(%method, path, authenticated = bearer.is_some(), "outbound request");

        let builder = self.client.request(method, url);
        match bearer.and_then(|b| HeaderValue::from_str(&b).ok()) {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    /// The login call: credentials go form-encoded, never as JSON.
    pub fn login_request(&self, username: &str, password: &str) -> RequestBuilder {
        self.request(Method::POST, "/auth/login", None)
            .form(&[("username", username), ("password", password)])
    }

    /// The request a [`TransactionRequest`] maps to: `POST` to its endpoint
    /// with `{symbol, quantity}` or `{amount}` as the JSON body.
    pub fn transaction_request(
        &self,
        session: &Session,
        request: &TransactionRequest,
    ) -> RequestBuilder {
        self.request(Method::POST, request.kind().path(), Some(session))
            .json(request)
    }

    /// Send and decode a JSON success body. Any non-2xx status becomes
    /// [`ClientError::Rejected`] carrying whatever `detail` the body had.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "request rejected");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            detail: FailureDetail::from_body(&body),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PortfolioApi for ApiClient {
    async fn register(&self, user: &UserCreate) -> Result<RegisterResponse, ClientError> {
        let builder = self.request(Method::POST, "/auth/register", None).json(user);
        self.execute(builder).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        self.execute(self.login_request(username, password)).await
    }

    async fn ping(&self) {
        let result = self.request(Method::GET, "/auth/ping", None).send().await;
        if let Err(e) = result {
            tracing::debug!(error = %ClientError::from(e), "ping failed");
        }
    }

    async fn get_portfolio(&self, session: &Session) -> Result<Portfolio, ClientError> {
        self.execute(self.request(Method::GET, "/portfolio", Some(session)))
            .await
    }

    async fn add_money(&self, session: &Session, amount: f64) -> Result<MessageResponse, ClientError> {
        let request = TransactionRequest::AddMoney { amount };
        self.execute(self.transaction_request(session, &request)).await
    }

    async fn withdraw_money(
        &self,
        session: &Session,
        amount: f64,
    ) -> Result<MessageResponse, ClientError> {
        let request = TransactionRequest::WithdrawMoney { amount };
        self.execute(self.transaction_request(session, &request)).await
    }

    async fn buy_asset(
        &self,
        session: &Session,
        symbol: &str,
        quantity: f64,
    ) -> Result<MessageResponse, ClientError> {
        let request = TransactionRequest::buy(symbol, quantity);
        self.execute(self.transaction_request(session, &request)).await
    }

    async fn sell_asset(
        &self,
        session: &Session,
        symbol: &str,
        quantity: f64,
    ) -> Result<MessageResponse, ClientError> {
        let request = TransactionRequest::sell(symbol, quantity);
        self.execute(self.transaction_request(session, &request)).await
    }

    async fn get_history(&self, session: &Session) -> Result<HistoryResponse, ClientError> {
        self.execute(self.request(Method::GET, "/trade/history", Some(session)))
            .await
    }
}
