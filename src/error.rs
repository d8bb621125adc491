//! error types for the crowdfunding client

use thiserror::Error;

use crate::config::NO_WALLET_MESSAGE;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("{}", NO_WALLET_MESSAGE)]
    ProviderMissing,

    #[error("no account authorized in the wallet")]
    NoAccount,

    #[error("only the fund raiser can withdraw")]
    NotFundRaiser,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("wallet request {method} failed: {message}")]
    Request { method: String, message: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("transaction {0} reverted")]
    Reverted(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<alloy_primitives::hex::FromHexError> for ClientError {
    fn from(e: alloy_primitives::hex::FromHexError) -> Self {
        ClientError::InvalidAddress(e.to_string())
    }
}
