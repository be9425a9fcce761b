use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::info;
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::{
    analize::{calculate_balance_changes, largest_balance_change},
    csv::write_balance_changes,
    error::AppError,
    models::{AddressBalanceChange, BlockRange, LargestBalanceChange},
    scanner::load_transactions,
    source::BlockSource,
};

/// Shared by all requests; never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn BlockSource>,
    pub block_count: u64,
}

impl AppState {
    pub fn new(source: Arc<dyn BlockSource>, block_count: u64) -> Self {
        AppState {
            source,
            block_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BalanceChangeQuery {
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
    format: Option<String>,
}

enum ExportFormat {
    Json,
    Csv,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/balance-change", get(get_balance_change))
        .route("/api/balance-changes", get(get_balance_changes))
        .with_state(state)
}

/// Serves the API until the listener fails.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("API server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

async fn get_balance_change(
    State(state): State<AppState>,
    query: Result<Query<BalanceChangeQuery>, QueryRejection>,
) -> Result<Json<LargestBalanceChange>, AppError> {
    let Query(params) = query?;
    info!("Received balance-change request: {:?}", params);

    let changes = balance_changes_for(&state, params.block_number.as_deref()).await?;
    Ok(Json(largest_balance_change(&changes)))
}

async fn get_balance_changes(
    State(state): State<AppState>,
    query: Result<Query<BalanceChangeQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = query?;
    info!("Received balance-changes request: {:?}", params);

    let format = match params.format.as_deref() {
        None | Some("json") => ExportFormat::Json,
        Some("csv") => ExportFormat::Csv,
        Some(other) => return Err(AppError::UnsupportedFormat(other.to_string())),
    };

    let changes = balance_changes_for(&state, params.block_number.as_deref()).await?;

    match format {
        ExportFormat::Json => Ok(Json(changes).into_response()),
        ExportFormat::Csv => {
            let mut body = Vec::new();
            write_balance_changes(&changes, &mut body)?;
            Ok(([(header::CONTENT_TYPE, "text/csv")], body).into_response())
        }
    }
}

async fn balance_changes_for(
    state: &AppState,
    block_number: Option<&str>,
) -> Result<Vec<AddressBalanceChange>, AppError> {
    let requested = parse_block_number(block_number)?;

    let latest = state
        .source
        .latest_block_number()
        .await
        .map_err(AppError::LatestBlock)?;
    if requested > latest {
        return Err(AppError::BlockAboveLatest { requested, latest });
    }

    let range = BlockRange::new(requested, state.block_count);
    let transactions = load_transactions(state.source.as_ref(), range).await;
    Ok(calculate_balance_changes(&transactions))
}

/// Only a plain unsigned decimal is accepted. Values such as `123abc`,
/// `12.7` or `-5` are rejected rather than truncated to a leading number.
fn parse_block_number(raw: Option<&str>) -> Result<u64, AppError> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .ok_or_else(|| AppError::InvalidBlockNumber(raw.map(str::to_string)))
}
