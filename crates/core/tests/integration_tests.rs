// ═══════════════════════════════════════════════════════════════════
// Integration Tests — CryptoFolio facade: restore, routing, login,
// registration, dashboard entry, submit and logout over real HTTP
// ═══════════════════════════════════════════════════════════════════

mod common;

use std::path::Path;

use cryptofolio_client::config::ClientConfig;
use cryptofolio_client::models::transaction::TransactionKind;
use cryptofolio_client::services::route_guard::{Route, RouteDecision};
use cryptofolio_client::services::transaction_controller::{Banner, FormField, SubmitOutcome};
use cryptofolio_client::storage::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
use cryptofolio_client::CryptoFolio;

/// Config pointing at `url`, persisting the token under `dir`.
fn config(url: &str, dir: &Path) -> ClientConfig {
    ClientConfig {
        api_url: url.to_string(),
        request_timeout_secs: 5,
        token_path: dir.join("session.json"),
        ..ClientConfig::default()
    }
}

/// An address nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// ── Startup and routing ─────────────────────────────────────────────

mod startup {
    use super::*;

    #[test]
    fn routes_wait_for_restore() {
        let dir = tempfile::tempdir().unwrap();
        let app = CryptoFolio::new(&config(&closed_port_url(), dir.path()), MemoryTokenStore::new())
            .unwrap();

        assert!(app.session().is_loading());
        assert_eq!(app.route("/dashboard"), RouteDecision::Loading);
        assert_eq!(app.route("/login"), RouteDecision::Loading);
    }

    #[test]
    fn restored_token_redirects_public_routes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = CryptoFolio::new(
            &config(&closed_port_url(), dir.path()),
            MemoryTokenStore::with_entry("token", "persisted"),
        )
        .unwrap();

        let session = app.restore();

        assert_eq!(session.token(), Some("persisted"));
        assert_eq!(app.route("/login"), RouteDecision::Redirect(Route::Dashboard));
        assert_eq!(app.route("/"), RouteDecision::Redirect(Route::Dashboard));
        assert_eq!(app.route("/nope"), RouteDecision::NotFound);
    }

    #[test]
    fn invalid_config_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let bad = config("ftp://ledger.test", dir.path());
        assert!(CryptoFolio::new(&bad, MemoryTokenStore::new()).is_err());
    }

    #[tokio::test]
    async fn dashboard_without_session_redirects_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = CryptoFolio::new(&config(&closed_port_url(), dir.path()), MemoryTokenStore::new())
            .unwrap();
        app.restore();

        let decision = app.enter_dashboard().await;

        assert_eq!(decision, RouteDecision::Redirect(Route::Login));
        assert!(app.dashboard().snapshot().portfolio().is_none());
        assert_eq!(app.dashboard().snapshot().banner(), &Banner::Empty);
    }
}

// ── Login and registration ──────────────────────────────────────────

mod auth_flow {
    use super::*;

    #[tokio::test]
    async fn login_persists_token_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) =
            common::serve_once("200 OK", r#"{"access_token":"jwt-abc","token_type":"bearer"}"#)
                .await;
        let cfg = config(&url, dir.path());
        let mut app = CryptoFolio::with_file_storage(&cfg).unwrap();
        app.restore();

        let session = app.login("alice", "s3cret").await.unwrap();

        assert_eq!(session.token(), Some("jwt-abc"));
        assert_eq!(app.route("/login"), RouteDecision::Redirect(Route::Dashboard));

        let reopened = FileTokenStore::new(&cfg.token_path);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("jwt-abc"));

        let captured = server.await.unwrap();
        assert_eq!(captured.body, "username=alice&password=s3cret");
    }

    #[test]
    fn restart_restores_persisted_login() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&closed_port_url(), dir.path());
        FileTokenStore::new(&cfg.token_path)
            .set("token", "from-last-run")
            .unwrap();

        let mut app = CryptoFolio::with_file_storage(&cfg).unwrap();
        let session = app.restore();

        assert_eq!(session.token(), Some("from-last-run"));
    }

    #[tokio::test]
    async fn rejected_login_reports_server_detail() {
        let dir = tempfile::tempdir().unwrap();
        let (url, _server) =
            common::serve_once("400 Bad Request", r#"{"detail":"Information invalid"}"#).await;
        let mut app = CryptoFolio::with_file_storage(&config(&url, dir.path())).unwrap();
        app.restore();

        let err = app.login("alice", "wrong").await.unwrap_err();

        assert_eq!(err, "Information invalid");
        assert!(!app.session().is_authenticated());
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn login_without_detail_uses_default_message() {
        let dir = tempfile::tempdir().unwrap();
        let (url, _server) = common::serve_once("500 Internal Server Error", "{}").await;
        let mut app = CryptoFolio::new(&config(&url, dir.path()), MemoryTokenStore::new()).unwrap();
        app.restore();

        assert_eq!(app.login("alice", "pw").await.unwrap_err(), "Failed to log in");
    }

    #[tokio::test]
    async fn register_returns_server_message_without_logging_in() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) = common::serve_once(
            "200 OK",
            r#"{"message":"User created successfully","user":"bob"}"#,
        )
        .await;
        let mut app = CryptoFolio::new(&config(&url, dir.path()), MemoryTokenStore::new()).unwrap();
        app.restore();

        let message = app.register("bob", "pw").await.unwrap();

        assert_eq!(message, "User created successfully");
        assert!(!app.session().is_authenticated());
        assert_eq!(
            server.await.unwrap().request_line(),
            "POST /auth/register HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn register_offline_uses_default_message() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            CryptoFolio::new(&config(&closed_port_url(), dir.path()), MemoryTokenStore::new())
                .unwrap();

        assert_eq!(app.register("bob", "pw").await.unwrap_err(), "Failed to register");
    }
}

// ── Dashboard ───────────────────────────────────────────────────────

mod dashboard {
    use super::*;

    const PORTFOLIO: &str = r#"{"total_added_money":50.0,"available_money":50.0,"total_value":50.0,"performance_abs":0.0,"performance_rel":0.0,"assets":[]}"#;

    #[tokio::test]
    async fn entering_loads_portfolio_with_bearer() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) = common::serve_once("200 OK", PORTFOLIO).await;
        let mut app = CryptoFolio::new(
            &config(&url, dir.path()),
            MemoryTokenStore::with_entry("token", "tok-9"),
        )
        .unwrap();
        app.restore();

        let decision = app.enter_dashboard().await;

        assert_eq!(decision, RouteDecision::Render(Route::Dashboard));
        let state = app.dashboard().snapshot();
        assert_eq!(state.portfolio().map(|p| p.available_money), Some(50.0));

        let captured = server.await.unwrap();
        assert_eq!(captured.request_line(), "GET /portfolio HTTP/1.1");
        assert_eq!(captured.header("Authorization").as_deref(), Some("Bearer tok-9"));
    }

    #[tokio::test]
    async fn rejected_deposit_shows_error_banner() {
        let dir = tempfile::tempdir().unwrap();
        let (url, server) =
            common::serve_once("400 Bad Request", r#"{"detail":"Amount must be positive"}"#).await;
        let mut app = CryptoFolio::new(
            &config(&url, dir.path()),
            MemoryTokenStore::with_entry("token", "tok-9"),
        )
        .unwrap();
        app.restore();

        let dashboard = app.dashboard();
        dashboard.open_modal(TransactionKind::AddMoney);
        dashboard.edit_field(TransactionKind::AddMoney, FormField::Amount, "3");
        let outcome = app.submit(TransactionKind::AddMoney).await;

        assert_eq!(outcome, SubmitOutcome::Failed("Amount must be positive".into()));
        let state = app.dashboard().snapshot();
        assert_eq!(state.banner(), &Banner::Error("Amount must be positive".into()));
        assert_eq!(state.form(TransactionKind::AddMoney).fields.amount, "3");

        let captured = server.await.unwrap();
        assert_eq!(captured.request_line(), "POST /trade/add-money HTTP/1.1");
        let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(sent, serde_json::json!({ "amount": 3.0 }));
    }

    #[tokio::test]
    async fn history_offline_sets_banner() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = CryptoFolio::new(
            &config(&closed_port_url(), dir.path()),
            MemoryTokenStore::with_entry("token", "tok-9"),
        )
        .unwrap();
        app.restore();

        app.load_history().await;

        assert_eq!(
            app.dashboard().snapshot().banner(),
            &Banner::Error("Failed to load transaction history".into())
        );
    }
}

// ── Logout ──────────────────────────────────────────────────────────

mod logout {
    use super::*;

    #[test]
    fn logout_routes_to_login_and_clears_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&closed_port_url(), dir.path());
        FileTokenStore::new(&cfg.token_path).set("token", "tok").unwrap();
        let mut app = CryptoFolio::with_file_storage(&cfg).unwrap();
        app.restore();

        let decision = app.logout();

        assert_eq!(decision, RouteDecision::Render(Route::Login));
        assert!(!app.session().is_authenticated());
        assert_eq!(app.route("/dashboard"), RouteDecision::Redirect(Route::Login));
        assert_eq!(
            FileTokenStore::new(&cfg.token_path).get("token").unwrap(),
            None
        );
    }

    #[test]
    fn logout_starts_a_fresh_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = CryptoFolio::new(
            &config(&closed_port_url(), dir.path()),
            MemoryTokenStore::with_entry("token", "tok"),
        )
        .unwrap();
        app.restore();
        app.dashboard().open_modal(TransactionKind::Buy);
        app.dashboard()
            .edit_field(TransactionKind::Buy, FormField::Symbol, "BTC");

        app.logout();

        let state = app.dashboard().snapshot();
        assert!(!state.is_torn_down());
        assert!(!state.form(TransactionKind::Buy).modal_open);
        assert!(state.form(TransactionKind::Buy).fields.symbol.is_empty());
    }
}
