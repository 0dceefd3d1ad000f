use crate::models::portfolio::{Asset, Portfolio};

/// US-dollar currency with thousands grouping and two fraction digits,
/// e.g. `-$1,234.50`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    if value.is_infinite() {
        return format!("{sign}$∞");
    }

    let fixed = format!("{:.2}", round_cents(value.abs()));
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{fraction}", group_thousands(whole))
}

/// Two fraction digits and a `%` suffix; strictly positive values get a
/// leading `+`, zero gets no sign.
pub fn format_percentage(value: f64) -> String {
    // Normalise -0.0 so it prints as "0.00%".
    let value = if value == 0.0 { 0.0 } else { value };
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{:.2}%", round_cents(value))
}

/// Round to cents, ties away from zero (`0.125` -> `0.13`).
fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Colouring hint for a performance figure. Zero counts as a gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Gain,
    Loss,
}

impl Trend {
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Trend::Gain
        } else {
            Trend::Loss
        }
    }
}

/// Display strings for the portfolio header cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewView {
    pub total_value: String,
    pub available_money: String,
    pub total_added_money: String,
    /// `"$12.00 (+3.50%)"`
    pub performance: String,
    pub trend: Trend,
}

/// Display strings for one row of the holdings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRowView {
    pub symbol: String,
    pub quantity: String,
    pub current_price: String,
    pub total_value: String,
    pub performance_abs: String,
    pub performance_rel: String,
    pub abs_trend: Trend,
    pub rel_trend: Trend,
}

pub fn present_overview(portfolio: &Portfolio) -> OverviewView {
    OverviewView {
        total_value: format_currency(portfolio.total_value),
        available_money: format_currency(portfolio.available_money),
        total_added_money: format_currency(portfolio.total_added_money),
        performance: format!(
            "{} ({})",
            format_currency(portfolio.performance_abs),
            format_percentage(portfolio.performance_rel)
        ),
        trend: Trend::of(portfolio.performance_abs),
    }
}

pub fn present_asset(asset: &Asset) -> AssetRowView {
    AssetRowView {
        symbol: asset.symbol.clone(),
        quantity: asset.quantity.to_string(),
        current_price: format_currency(asset.current_price),
        total_value: format_currency(asset.total_value),
        performance_abs: format_currency(asset.performance_abs),
        performance_rel: format_percentage(asset.performance_rel),
        abs_trend: Trend::of(asset.performance_abs),
        rel_trend: Trend::of(asset.performance_rel),
    }
}
