pub mod error_normalizer;
pub mod presenter;
pub mod route_guard;
pub mod session_store;
pub mod transaction_controller;
