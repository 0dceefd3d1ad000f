use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::transaction::TradeSide;

/// `GET /trade/history` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub message: String,
    #[serde(default)]
    pub transactions: Vec<HistoryEntry>,
}

/// A recorded trade. The ledger stores sells with a negative quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub portfolio_id: i64,
    pub price: f64,
    pub quantity: f64,
    pub symbol: String,
    /// UTC, emitted by the server without an offset.
    pub timestamp: NaiveDateTime,
}

impl HistoryEntry {
    pub fn side(&self) -> TradeSide {
        if self.quantity < 0.0 {
            TradeSide::Sell
        } else {
            TradeSide::Buy
        }
    }

    /// Cash value of the trade at its execution price.
    pub fn notional(&self) -> f64 {
        self.quantity.abs() * self.price
    }
}
