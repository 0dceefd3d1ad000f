mod render;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cryptofolio_client::config::{ClientConfig, CONFIG_FILE, ENV_PREFIX};
use cryptofolio_client::models::transaction::{AssetSymbol, TransactionKind};
use cryptofolio_client::services::route_guard::{Route, RouteDecision};
use cryptofolio_client::services::transaction_controller::{FormField, SubmitOutcome};
use cryptofolio_client::storage::token_store::FileTokenStore;
use cryptofolio_client::CryptoFolio;

type App = CryptoFolio<FileTokenStore>;

/// Terminal front end for the CryptoFolio portfolio service.
#[derive(Parser, Debug)]
#[command(name = "cryptofolio", version, about)]
struct Cli {
    /// Base URL of the ledger service (overrides config file and environment).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account.
    Register {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and remember the session.
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show where the application would land right now.
    Status,
    /// Show holdings and cash.
    Portfolio,
    /// Show recorded trades.
    History,
    /// List the asset codes offered for trading.
    Assets,
    /// Buy an asset.
    Buy { symbol: String, quantity: String },
    /// Sell an asset.
    Sell { symbol: String, quantity: String },
    /// Add money to the portfolio.
    Deposit { amount: String },
    /// Withdraw money from the portfolio.
    Withdraw { amount: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let overrides: Vec<(&str, &str)> = cli
        .api_url
        .as_deref()
        .map(|url| vec![("api_url", url)])
        .unwrap_or_default();
    let config = match ClientConfig::from_sources(Some(CONFIG_FILE), Some(ENV_PREFIX), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = match App::with_file_storage(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Wake the server up; nobody waits for the answer.
    let pinger = app.api().clone();
    tokio::spawn(async move {
        use cryptofolio_client::api::traits::PortfolioApi;
        pinger.ping().await;
    });

    app.restore();
    run(&mut app, cli.command).await
}

async fn run(app: &mut App, command: Command) -> ExitCode {
    match command {
        Command::Register { username, password } => {
            if let RouteDecision::Redirect(_) = app.route(Route::Register.path()) {
                println!("Already logged in.");
                return ExitCode::SUCCESS;
            }
            match app.register(&username, &password).await {
                Ok(message) => {
                    println!("{message}");
                    println!("You can now log in with `cryptofolio login {username}`.");
                    ExitCode::SUCCESS
                }
                Err(message) => fail(&message),
            }
        }
        Command::Login { username, password } => {
            if let RouteDecision::Redirect(_) = app.route(Route::Login.path()) {
                println!("Already logged in.");
                return ExitCode::SUCCESS;
            }
            match app.login(&username, &password).await {
                Ok(_) => {
                    println!("Logged in as {username}.");
                    ExitCode::SUCCESS
                }
                Err(message) => fail(&message),
            }
        }
        Command::Logout => {
            app.logout();
            println!("Logged out.");
            ExitCode::SUCCESS
        }
        Command::Status => {
            match app.route(Route::Landing.path()).effective_route() {
                Some(Route::Dashboard) => println!("Logged in."),
                _ => println!("Not logged in."),
            }
            ExitCode::SUCCESS
        }
        Command::Assets => {
            for symbol in AssetSymbol::ALL {
                println!("{:<5} {}", symbol, symbol.label());
            }
            ExitCode::SUCCESS
        }
        Command::Portfolio => {
            if !enter_dashboard(app).await {
                return ExitCode::FAILURE;
            }
            let state = app.dashboard().snapshot();
            render::banner(state.banner());
            match state.portfolio() {
                Some(portfolio) => {
                    render::portfolio(portfolio);
                    ExitCode::SUCCESS
                }
                None => ExitCode::FAILURE,
            }
        }
        Command::History => {
            if !enter_dashboard(app).await {
                return ExitCode::FAILURE;
            }
            app.load_history().await;
            let state = app.dashboard().snapshot();
            render::banner(state.banner());
            match state.history() {
                Some(entries) => {
                    render::history(entries);
                    ExitCode::SUCCESS
                }
                None => ExitCode::FAILURE,
            }
        }
        Command::Buy { symbol, quantity } => {
            let fields = [(FormField::Symbol, symbol), (FormField::Quantity, quantity)];
            transact(app, TransactionKind::Buy, fields).await
        }
        Command::Sell { symbol, quantity } => {
            let fields = [(FormField::Symbol, symbol), (FormField::Quantity, quantity)];
            transact(app, TransactionKind::Sell, fields).await
        }
        Command::Deposit { amount } => {
            transact(app, TransactionKind::AddMoney, [(FormField::Amount, amount)]).await
        }
        Command::Withdraw { amount } => {
            transact(app, TransactionKind::WithdrawMoney, [(FormField::Amount, amount)]).await
        }
    }
}

/// Route to the dashboard; prints why not when the session does not allow it.
async fn enter_dashboard(app: &App) -> bool {
    match app.enter_dashboard().await {
        RouteDecision::Render(Route::Dashboard) => true,
        RouteDecision::Redirect(Route::Login) => {
            eprintln!("Not logged in. Run `cryptofolio login <username> --password <password>` first.");
            false
        }
        other => {
            tracing::error!(?other, "unexpected route decision for the dashboard");
            false
        }
    }
}

/// Fill the form of `kind` the way a user would, submit it and show the result.
async fn transact<const N: usize>(
    app: &App,
    kind: TransactionKind,
    fields: [(FormField, String); N],
) -> ExitCode {
    if !enter_dashboard(app).await {
        return ExitCode::FAILURE;
    }

    let dashboard = app.dashboard();
    dashboard.open_modal(kind);
    for (field, value) in fields {
        dashboard.edit_field(kind, field, value);
    }

    let outcome = app.submit(kind).await;
    let state = dashboard.snapshot();
    render::banner(state.banner());

    match outcome {
        SubmitOutcome::Succeeded(_) => {
            if let Some(portfolio) = state.portfolio() {
                println!();
                render::portfolio(portfolio);
            }
            ExitCode::SUCCESS
        }
        SubmitOutcome::Failed(_) => ExitCode::FAILURE,
        SubmitOutcome::Incomplete => {
            let constraints = kind.input_constraints();
            eprintln!(
                "{kind}: every field is required and must be a number (minimum {}).",
                constraints.min
            );
            ExitCode::FAILURE
        }
        SubmitOutcome::Busy | SubmitOutcome::Discarded => ExitCode::FAILURE,
    }
}

fn fail(message: &str) -> ExitCode {
    eprintln!("{message}");
    ExitCode::FAILURE
}
