use std::sync::Arc;

use eth_balance_tracker::{
    api::{self, AppState},
    config::Config,
    etherscan::EtherscanClient,
    source::{BlockSource, RpcSource},
};
use ethers::providers::{Http, Provider};
use log::info;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let source: Arc<dyn BlockSource> = match &config.rpc_url {
        Some(rpc_url) => {
            info!("Reading blocks from JSON-RPC node");
            let provider = Provider::<Http>::try_from(rpc_url.as_str())?;
            Arc::new(RpcSource::new(Arc::new(provider)))
        }
        None => {
            info!("Reading blocks from {}", config.api_url);
            Arc::new(EtherscanClient::new(&config)?)
        }
    };

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    api::serve(listener, AppState::new(source, config.block_count)).await?;

    Ok(())
}
