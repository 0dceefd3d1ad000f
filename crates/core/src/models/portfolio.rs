use serde::{Deserialize, Serialize};

/// Authoritative snapshot of a user's holdings and cash, as returned by
/// `GET /portfolio`. Never patched locally; always replaced by a re-fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Portfolio {
    pub total_added_money: f64,
    pub available_money: f64,
    pub total_value: f64,
    pub performance_abs: f64,
    pub performance_rel: f64,

    /// Holdings in server order. `symbol` is unique within one snapshot.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Portfolio {
    /// Look up a holding by its symbol (case-insensitive).
    pub fn asset(&self, symbol: &str) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// One holding inside a [`Portfolio`]. All figures are server-computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub quantity: f64,
    pub current_price: f64,
    pub total_value: f64,
    pub performance_abs: f64,
    pub performance_rel: f64,
}
