pub mod client;
pub mod traits;
