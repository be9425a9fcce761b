use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;

/// Why a block (or the chain head) could not be read from the provider.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("block {block} has no transaction list")]
    MissingTransactions { block: u64 },

    #[error("request to provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("invalid block number from provider: {0}")]
    InvalidBlockNumber(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Failure of a balance-change request. Every variant is reported to the
/// caller as the same generic 500 body; the detail only goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("malformed query string")]
    InvalidQuery(#[from] QueryRejection),

    #[error("invalid blockNumber query parameter: {0:?}")]
    InvalidBlockNumber(Option<String>),

    #[error("blockNumber {requested} is above the latest block {latest}")]
    BlockAboveLatest { requested: u64, latest: u64 },

    #[error("unsupported format {0:?}")]
    UnsupportedFormat(String),

    #[error("failed to look up the latest block")]
    LatestBlock(#[source] FetchError),

    #[error("failed to export balance changes")]
    Export(#[from] csv::Error),
}

pub const GENERIC_FAILURE: &str = "Failed to process request";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match std::error::Error::source(&self) {
            Some(source) => error!("{self}: {source}"),
            None => error!("{self}"),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": GENERIC_FAILURE })),
        )
            .into_response()
    }
}
