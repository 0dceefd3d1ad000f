pub mod auth;
pub mod history;
pub mod portfolio;
pub mod session;
pub mod transaction;
