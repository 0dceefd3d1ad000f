use cryptofolio_client::models::history::HistoryEntry;
use cryptofolio_client::models::portfolio::Portfolio;
use cryptofolio_client::services::presenter::{
    format_currency, present_asset, present_overview, Trend,
};
use cryptofolio_client::services::transaction_controller::Banner;

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::Gain => "▲",
        Trend::Loss => "▼",
    }
}

pub fn banner(banner: &Banner) {
    match banner {
        Banner::Empty => {}
        Banner::Success(text) => println!("✔ {text}"),
        Banner::Error(text) => println!("✘ {text}"),
    }
}

pub fn portfolio(portfolio: &Portfolio) {
    let overview = present_overview(portfolio);
    println!("Portfolio Overview");
    println!("  Total Value      {}", overview.total_value);
    println!("  Available Cash   {}", overview.available_money);
    println!("  Total Added      {}", overview.total_added_money);
    println!(
        "  Performance      {} {}",
        overview.performance,
        trend_marker(overview.trend)
    );
    println!();

    if portfolio.is_empty() {
        println!("You don't have any assets yet. Start buying some!");
        return;
    }

    println!(
        "{:<8} {:>16} {:>16} {:>16} {:>16} {:>10}",
        "SYMBOL", "QUANTITY", "PRICE", "VALUE", "PERF ($)", "PERF (%)"
    );
    for asset in &portfolio.assets {
        let row = present_asset(asset);
        println!(
            "{:<8} {:>16} {:>16} {:>16} {:>16} {:>10} {}",
            row.symbol,
            row.quantity,
            row.current_price,
            row.total_value,
            row.performance_abs,
            row.performance_rel,
            trend_marker(row.rel_trend)
        );
    }
}

pub fn history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No transactions yet.");
        return;
    }
    println!(
        "{:<20} {:<5} {:<8} {:>16} {:>16} {:>16}",
        "TIME", "SIDE", "SYMBOL", "QUANTITY", "PRICE", "TOTAL"
    );
    for entry in entries {
        println!(
            "{:<20} {:<5} {:<8} {:>16} {:>16} {:>16}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.side(),
            entry.symbol,
            entry.quantity.abs(),
            format_currency(entry.price),
            format_currency(entry.notional())
        );
    }
}
