use async_trait::async_trait;

use crate::errors::ClientError;
use crate::models::auth::{LoginResponse, MessageResponse, RegisterResponse, UserCreate};
use crate::models::history::HistoryResponse;
use crate::models::portfolio::Portfolio;
use crate::models::session::Session;
use crate::models::transaction::TransactionRequest;

/// Every remote capability of the ledger service, one method per endpoint.
///
/// The session store and the transaction controller depend on this trait
/// rather than on [`ApiClient`](super::client::ApiClient), so hosts and
/// tests can substitute their own gateway. Calls that need a credential take
/// the [`Session`] explicitly; there is no ambient auth state.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PortfolioApi: Send + Sync {
    /// `POST /auth/register`
    async fn register(&self, user: &UserCreate) -> Result<RegisterResponse, ClientError>;

    /// `POST /auth/login`, form-encoded.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError>;

    /// `GET /auth/ping`. Fire-and-forget: failures are swallowed.
    async fn ping(&self);

    /// `GET /portfolio`
    async fn get_portfolio(&self, session: &Session) -> Result<Portfolio, ClientError>;

    /// `POST /trade/add-money`
    async fn add_money(&self, session: &Session, amount: f64) -> Result<MessageResponse, ClientError>;

    /// `POST /trade/withdraw-money`
    async fn withdraw_money(
        &self,
        session: &Session,
        amount: f64,
    ) -> Result<MessageResponse, ClientError>;

    /// `POST /trade/buy`
    async fn buy_asset(
        &self,
        session: &Session,
        symbol: &str,
        quantity: f64,
    ) -> Result<MessageResponse, ClientError>;

    /// `POST /trade/sell`
    async fn sell_asset(
        &self,
        session: &Session,
        symbol: &str,
        quantity: f64,
    ) -> Result<MessageResponse, ClientError>;

    /// `GET /trade/history`
    async fn get_history(&self, session: &Session) -> Result<HistoryResponse, ClientError>;

    /// Dispatch a [`TransactionRequest`] to its endpoint.
    async fn submit(
        &self,
        session: &Session,
        request: &TransactionRequest,
    ) -> Result<MessageResponse, ClientError> {
        match request {
            TransactionRequest::Buy { symbol, quantity } => {
                self.buy_asset(session, symbol, *quantity).await
            }
            TransactionRequest::Sell { symbol, quantity } => {
                self.sell_asset(session, symbol, *quantity).await
            }
            TransactionRequest::AddMoney { amount } => self.add_money(session, *amount).await,
            TransactionRequest::WithdrawMoney { amount } => {
                self.withdraw_money(session, *amount).await
            }
        }
    }
}
