use thiserror::Error;

mod auth;
mod database;
mod server;
mod sms;

pub use auth::Auth;
pub use database::{Database, DbPoolConfig};
pub use server::Server;
pub use sms::{Sms, SmsProvider};

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
