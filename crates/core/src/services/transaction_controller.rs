use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::traits::PortfolioApi;
use crate::models::history::HistoryEntry;
use crate::models::portfolio::Portfolio;
use crate::models::session::Session;
use crate::models::transaction::{TransactionKind, TransactionRequest};
use super::error_normalizer::normalize;

pub const PORTFOLIO_LOAD_ERROR: &str = "Failed to load portfolio data";
pub const HISTORY_LOAD_ERROR: &str = "Failed to load transaction history";

// ── Form state ──────────────────────────────────────────────────────

/// One input of a transaction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Symbol,
    Quantity,
    Amount,
}

/// Raw text of a form's inputs, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub symbol: String,
    pub quantity: String,
    pub amount: String,
}

impl FormFields {
    fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Symbol => self.symbol = value,
            FormField::Quantity => self.quantity = value,
            FormField::Amount => self.amount = value,
        }
    }

    /// The request these fields describe, or `None` while a required input
    /// is empty. Text that is not a finite number counts as empty, the way a
    /// number input reports an invalid entry.
    pub fn to_request(&self, kind: TransactionKind) -> Option<TransactionRequest> {
        match kind {
            TransactionKind::Buy | TransactionKind::Sell => {
                let symbol = self.symbol.trim();
                if symbol.is_empty() {
                    return None;
                }
                let quantity = parse_number(&self.quantity)?;
                Some(if kind == TransactionKind::Buy {
                    TransactionRequest::buy(symbol, quantity)
                } else {
                    TransactionRequest::sell(symbol, quantity)
                })
            }
            TransactionKind::AddMoney => Some(TransactionRequest::AddMoney {
                amount: parse_number(&self.amount)?,
            }),
            TransactionKind::WithdrawMoney => Some(TransactionRequest::WithdrawMoney {
                amount: parse_number(&self.amount)?,
            }),
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub fields: FormFields,
    pub modal_open: bool,
}

/// Where one transaction kind stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionPhase {
    Idle,
    ModalOpen,
    Submitting,
}

/// The single message line shown above the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Banner {
    #[default]
    Empty,
    Success(String),
    Error(String),
}

impl Banner {
    pub fn text(&self) -> Option<&str> {
        match self {
            Banner::Empty => None,
            Banner::Success(text) | Banner::Error(text) => Some(text),
        }
    }
}

// ── Reducer ─────────────────────────────────────────────────────────

/// Everything that can happen to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    OpenModal(TransactionKind),
    CloseModal(TransactionKind),
    EditField(TransactionKind, FormField, String),
    Submit(TransactionKind),
    SubmitSucceeded {
        kind: TransactionKind,
        message: String,
    },
    SubmitFailed {
        kind: TransactionKind,
        message: String,
    },
    PortfolioRequested,
    PortfolioLoaded(Portfolio),
    PortfolioFailed(String),
    HistoryLoaded(Vec<HistoryEntry>),
    HistoryFailed(String),
    Teardown,
}

/// View state of the dashboard: one form per transaction kind, the shared
/// in-flight slot, the banner and the last portfolio snapshot.
///
/// Only [`update`](Self::update) mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    forms: [FormState; 4],
    in_flight: Option<TransactionKind>,
    banner: Banner,
    portfolio: Option<Portfolio>,
    portfolio_loading: bool,
    history: Option<Vec<HistoryEntry>>,
    torn_down: bool,
}

fn slot(kind: TransactionKind) -> usize {
    match kind {
        TransactionKind::Buy => 0,
        TransactionKind::Sell => 1,
        TransactionKind::AddMoney => 2,
        TransactionKind::WithdrawMoney => 3,
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns the request to send when the event is a
    /// submit that was accepted; every other event returns `None`.
    pub fn update(&mut self, event: DashboardEvent) -> Option<TransactionRequest> {
        if self.torn_down {
            return None;
        }

        match event {
            DashboardEvent::OpenModal(kind) => {
                self.forms[slot(kind)].modal_open = true;
            }
            DashboardEvent::CloseModal(kind) => {
                self.forms[slot(kind)].modal_open = false;
            }
            DashboardEvent::EditField(kind, field, value) => {
                self.forms[slot(kind)].fields.set(field, value);
            }
            DashboardEvent::Submit(kind) => {
                if self.in_flight.is_some() {
                    return None;
                }
                let form = &self.forms[slot(kind)];
                if !form.modal_open {
                    return None;
                }
                let request = form.fields.to_request(kind)?;
                self.banner = Banner::Empty;
                self.in_flight = Some(kind);
                return Some(request);
            }
            DashboardEvent::SubmitSucceeded { kind, message } => {
                let form = &mut self.forms[slot(kind)];
                form.modal_open = false;
                form.fields = FormFields::default();
                self.banner = Banner::Success(message);
                self.finish(kind);
            }
            DashboardEvent::SubmitFailed { kind, message } => {
                self.forms[slot(kind)].modal_open = false;
                self.banner = Banner::Error(message);
                self.finish(kind);
            }
            DashboardEvent::PortfolioRequested => {
                self.portfolio_loading = true;
            }
            DashboardEvent::PortfolioLoaded(portfolio) => {
                self.portfolio = Some(portfolio);
                self.portfolio_loading = false;
                if matches!(self.banner, Banner::Error(_)) {
                    self.banner = Banner::Empty;
                }
            }
            DashboardEvent::PortfolioFailed(message) => {
                self.portfolio_loading = false;
                self.banner = Banner::Error(message);
            }
            DashboardEvent::HistoryLoaded(entries) => {
                self.history = Some(entries);
            }
            DashboardEvent::HistoryFailed(message) => {
                self.banner = Banner::Error(message);
            }
            DashboardEvent::Teardown => {
                self.torn_down = true;
            }
        }
        None
    }

    fn finish(&mut self, kind: TransactionKind) {
        if self.in_flight == Some(kind) {
            self.in_flight = None;
        }
    }

    pub fn form(&self, kind: TransactionKind) -> &FormState {
        &self.forms[slot(kind)]
    }

    pub fn phase(&self, kind: TransactionKind) -> TransactionPhase {
        if self.in_flight == Some(kind) {
            TransactionPhase::Submitting
        } else if self.forms[slot(kind)].modal_open {
            TransactionPhase::ModalOpen
        } else {
            TransactionPhase::Idle
        }
    }

    /// The transaction currently being submitted, if any.
    pub fn in_flight(&self) -> Option<TransactionKind> {
        self.in_flight
    }

    /// Submit controls of every form are disabled while anything is in flight.
    pub fn submit_enabled(&self) -> bool {
        self.in_flight.is_none()
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn portfolio(&self) -> Option<&Portfolio> {
        self.portfolio.as_ref()
    }

    pub fn is_portfolio_loading(&self) -> bool {
        self.portfolio_loading
    }

    pub fn history(&self) -> Option<&[HistoryEntry]> {
        self.history.as_deref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

// ── Driver ──────────────────────────────────────────────────────────

/// What became of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted it; carries the server's message.
    Succeeded(String),
    /// It failed; carries the normalised error.
    Failed(String),
    /// Another transaction was already in flight.
    Busy,
    /// A required field was empty, or the form was not open.
    Incomplete,
    /// The view was torn down; nothing was applied.
    Discarded,
}

/// Runs the buy/sell/deposit/withdraw workflow against a [`PortfolioApi`].
///
/// State lives in a [`DashboardState`] behind a mutex that is never held
/// across an await, so a second submit issued while the first is awaiting
/// its response sees the in-flight slot taken and is turned away.
pub struct TransactionController<A: PortfolioApi + ?Sized> {
    api: Arc<A>,
    state: Mutex<DashboardState>,
}

impl<A: PortfolioApi + ?Sized> TransactionController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::new(DashboardState::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_torn_down(&self) -> bool {
        self.lock().is_torn_down()
    }

    /// Apply an event directly.
    pub fn dispatch(&self, event: DashboardEvent) -> Option<TransactionRequest> {
        self.lock().update(event)
    }

    /// A copy of the current view state.
    pub fn snapshot(&self) -> DashboardState {
        self.lock().clone()
    }

    pub fn open_modal(&self, kind: TransactionKind) {
        self.dispatch(DashboardEvent::OpenModal(kind));
    }

    pub fn close_modal(&self, kind: TransactionKind) {
        self.dispatch(DashboardEvent::CloseModal(kind));
    }

    pub fn edit_field(&self, kind: TransactionKind, field: FormField, value: impl Into<String>) {
        self.dispatch(DashboardEvent::EditField(kind, field, value.into()));
    }

    /// Discard the view. Responses still in flight are dropped on arrival.
    pub fn teardown(&self) {
        self.dispatch(DashboardEvent::Teardown);
    }

    /// Fetch the portfolio and replace the snapshot with it.
    pub async fn load_portfolio(&self, session: &Session) {
        if self.is_torn_down() {
            return;
        }
        self.dispatch(DashboardEvent::PortfolioRequested);

        match self.api.get_portfolio(session).await {
            Ok(portfolio) => {
                self.dispatch(DashboardEvent::PortfolioLoaded(portfolio));
            }
            Err(e) => {
                tracing::warn!(error = %e, "portfolio load failed");
                self.dispatch(DashboardEvent::PortfolioFailed(normalize(
                    &e,
                    PORTFOLIO_LOAD_ERROR,
                )));
            }
        }
    }

    pub async fn load_history(&self, session: &Session) {
        if self.is_torn_down() {
            return;
        }
        match self.api.get_history(session).await {
            Ok(response) => {
                self.dispatch(DashboardEvent::HistoryLoaded(response.transactions));
            }
            Err(e) => {
                tracing::warn!(error = %e, "history load failed");
                self.dispatch(DashboardEvent::HistoryFailed(normalize(&e, HISTORY_LOAD_ERROR)));
            }
        }
    }

    /// Submit the open form of `kind`.
    ///
    /// On success the portfolio is reloaded once the response has arrived,
    /// then the form is closed and cleared. On failure the form is closed
    /// with its fields kept and the portfolio is left alone.
    pub async fn submit(&self, session: &Session, kind: TransactionKind) -> SubmitOutcome {
        let request = {
            let mut state = self.lock();
            if state.is_torn_down() {
                return SubmitOutcome::Discarded;
            }
            if let Some(busy) = state.in_flight() {
                tracing::warn!(?kind, in_flight = ?busy, "submit ignored, transaction in flight");
                return SubmitOutcome::Busy;
            }
            match state.update(DashboardEvent::Submit(kind)) {
                Some(request) => request,
                None => return SubmitOutcome::Incomplete,
            }
        };

        let result = self.api.submit(session, &request).await;

        if self.is_torn_down() {
            tracing::debug!(?kind, "view torn down, dropping transaction response");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                tracing::info!(?kind, message = %response.message, "transaction accepted");
                self.load_portfolio(session).await;
                if self.is_torn_down() {
                    tracing::debug!(?kind, "view torn down during reload");
                    return SubmitOutcome::Discarded;
                }
                self.dispatch(DashboardEvent::SubmitSucceeded {
                    kind,
                    message: response.message.clone(),
                });
                SubmitOutcome::Succeeded(response.message)
            }
            Err(e) => {
                tracing::warn!(?kind, error = %e, "transaction failed");
                let message = normalize(&e, kind.default_error());
                self.dispatch(DashboardEvent::SubmitFailed {
                    kind,
                    message: message.clone(),
                });
                SubmitOutcome::Failed(message)
            }
        }
    }
}

impl<A: PortfolioApi + ?Sized> std::fmt::Debug for TransactionController<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("TransactionController")
            .field("in_flight", &state.in_flight())
            .field("banner", state.banner())
            .field("torn_down", &state.is_torn_down())
            .finish()
    }
}
