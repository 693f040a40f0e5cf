pub mod config_token;
pub mod error;
pub mod host;
pub mod identity;
pub mod server;
