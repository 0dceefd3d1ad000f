use serde::{Deserialize, Serialize};

/// Asset codes the client offers in its trade forms.
///
/// The form itself carries free text; this list only feeds the select
/// options. The ledger decides what it actually accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetSymbol {
    Btc,
    Eth,
    Xrp,
    Ltc,
    Bch,
    Doge,
}

impl AssetSymbol {
    pub const ALL: [AssetSymbol; 6] = [
        AssetSymbol::Btc,
        AssetSymbol::Eth,
        AssetSymbol::Xrp,
        AssetSymbol::Ltc,
        AssetSymbol::Bch,
        AssetSymbol::Doge,
    ];

    pub fn ticker(&self) -> &'static str {
        match self {
            AssetSymbol::Btc => "BTC",
            AssetSymbol::Eth => "ETH",
            AssetSymbol::Xrp => "XRP",
            AssetSymbol::Ltc => "LTC",
            AssetSymbol::Bch => "BCH",
            AssetSymbol::Doge => "DOGE",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssetSymbol::Btc => "Bitcoin",
            AssetSymbol::Eth => "Ethereum",
            AssetSymbol::Xrp => "Ripple",
            AssetSymbol::Ltc => "Litecoin",
            AssetSymbol::Bch => "Bitcoin Cash",
            AssetSymbol::Doge => "Dogecoin",
        }
    }

    /// Option label, e.g. "Bitcoin (BTC)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.name(), self.ticker())
    }
}

impl std::fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.ticker())
    }
}

impl std::str::FromStr for AssetSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        AssetSymbol::ALL
            .into_iter()
            .find(|sym| sym.ticker() == upper)
            .ok_or_else(|| format!("Unknown asset symbol: {s}"))
    }
}

/// Direction of a recorded trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
        })
    }
}

/// The four user-initiated operations against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Buy,
    Sell,
    AddMoney,
    WithdrawMoney,
}

/// Bounds a host applies to its numeric input. The controller itself does
/// not enforce them; the ledger rejects what slips through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputConstraints {
    pub min: f64,
    pub step: f64,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 4] = [
        TransactionKind::Buy,
        TransactionKind::Sell,
        TransactionKind::AddMoney,
        TransactionKind::WithdrawMoney,
    ];

    /// Trades need a symbol and a quantity; money operations only an amount.
    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionKind::Buy | TransactionKind::Sell)
    }

    pub fn path(&self) -> &'static str {
        match self {
            TransactionKind::Buy => "/trade/buy",
            TransactionKind::Sell => "/trade/sell",
            TransactionKind::AddMoney => "/trade/add-money",
            TransactionKind::WithdrawMoney => "/trade/withdraw-money",
        }
    }

    /// Banner text when a failure carries no usable detail.
    pub fn default_error(&self) -> &'static str {
        match self {
            TransactionKind::Buy => "Failed to buy asset",
            TransactionKind::Sell => "Failed to sell asset",
            TransactionKind::AddMoney => "Failed to add money",
            TransactionKind::WithdrawMoney => "Failed to withdraw money",
        }
    }

    pub fn input_constraints(&self) -> InputConstraints {
        if self.is_trade() {
            InputConstraints {
                min: 0.000001,
                step: 0.000001,
            }
        } else {
            InputConstraints { min: 1.0, step: 1.0 }
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "Buy Asset"),
            TransactionKind::Sell => write!(f, "Sell Asset"),
            TransactionKind::AddMoney => write!(f, "Add Money"),
            TransactionKind::WithdrawMoney => write!(f, "Withdraw Money"),
        }
    }
}

/// A transaction ready to be sent. Serializes to the exact request body of
/// its endpoint (`{symbol, quantity}` or `{amount}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransactionRequest {
    Buy { symbol: String, quantity: f64 },
    Sell { symbol: String, quantity: f64 },
    AddMoney { amount: f64 },
    WithdrawMoney { amount: f64 },
}

impl TransactionRequest {
    pub fn buy(symbol: &str, quantity: f64) -> Self {
        TransactionRequest::Buy {
            symbol: symbol.to_uppercase(),
            quantity,
        }
    }

    pub fn sell(symbol: &str, quantity: f64) -> Self {
        TransactionRequest::Sell {
            symbol: symbol.to_uppercase(),
            quantity,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionRequest::Buy { .. } => TransactionKind::Buy,
            TransactionRequest::Sell { .. } => TransactionKind::Sell,
            TransactionRequest::AddMoney { .. } => TransactionKind::AddMoney,
            TransactionRequest::WithdrawMoney { .. } => TransactionKind::WithdrawMoney,
        }
    }
}
