use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::{config::Config, error::FetchError, models::Transaction, source::BlockSource};

/// Client for the Etherscan proxy module (`eth_blockNumber`,
/// `eth_getBlockByNumber`).
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    client: Client,
    api_url: String,
    api_key: String,
}

/// Etherscan wraps node answers in `{"result": ...}`. On rate limits and
/// other provider errors `result` is a plain message string instead.
#[derive(Debug, Deserialize)]
struct ProxyResponse<T> {
    result: Option<ProxyResult<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProxyResult<T> {
    Value(T),
    Message(String),
}

/// `eth_blockNumber` answers and error messages are both strings, so the
/// result is taken as-is and must parse as hex.
#[derive(Debug, Deserialize)]
struct BlockNumberResponse {
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlockPayload {
    #[serde(default)]
    transactions: Option<Vec<Transaction>>,
}

impl EtherscanClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(EtherscanClient {
            client: builder.build()?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn proxy_call(&self, params: &[(&str, &str)]) -> Result<String, FetchError> {
        let body = self
            .client
            .get(&self.api_url)
            .query(&[("module", "proxy")])
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl BlockSource for EtherscanClient {
    async fn latest_block_number(&self) -> Result<u64, FetchError> {
        let body = self.proxy_call(&[("action", "eth_blockNumber")]).await?;
        parse_block_number_response(&body)
    }

    async fn block_transactions(&self, block: u64) -> Result<Vec<Transaction>, FetchError> {
        let tag = format!("{:#x}", block);
        debug!("Fetching block {} ({})", block, tag);
        let body = self
            .proxy_call(&[
                ("action", "eth_getBlockByNumber"),
                ("tag", tag.as_str()),
                ("boolean", "true"),
            ])
            .await?;
        parse_block_response(block, &body)
    }
}

fn parse_block_number_response(body: &str) -> Result<u64, FetchError> {
    let response: BlockNumberResponse = serde_json::from_str(body)?;
    match response.result {
        Some(hex) => parse_hex_u64(&hex).ok_or(FetchError::InvalidBlockNumber(hex)),
        None => Err(FetchError::Provider("empty eth_blockNumber result".to_string())),
    }
}

fn parse_block_response(block: u64, body: &str) -> Result<Vec<Transaction>, FetchError> {
    let response: ProxyResponse<BlockPayload> = serde_json::from_str(body)?;
    match response.result {
        Some(ProxyResult::Value(BlockPayload {
            transactions: Some(transactions),
        })) => Ok(transactions),
        Some(ProxyResult::Message(message)) => Err(FetchError::Provider(message)),
        Some(ProxyResult::Value(_)) | None => Err(FetchError::MissingTransactions { block }),
    }
}

fn parse_hex_u64(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_number_is_read_from_hex_result() {
        let body = r#"{"jsonrpc":"2.0","id":83,"result":"0x1312d00"}"#;
        assert_eq!(parse_block_number_response(body).unwrap(), 20_000_000);
    }

    #[test]
    fn rate_limit_message_is_not_a_block_number() {
        let body = r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#;
        assert!(matches!(
            parse_block_number_response(body),
            Err(FetchError::InvalidBlockNumber(_))
        ));
    }

    #[test]
    fn block_transactions_ignore_extra_fields() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":{
            "number":"0x10",
            "transactions":[
                {"hash":"0x01","from":"0xa","to":"0xb","value":"0x10","gas":"0x5208"},
                {"hash":"0x02","from":"0xc","to":null,"value":"0x0"}
            ]}}"#;
        let txs = parse_block_response(16, body).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0], Transaction::new("0xa", "0xb", "0x10"));
        assert_eq!(txs[1].to, None);
    }

    #[test]
    fn missing_result_field_has_no_transactions() {
        let body = r#"{"jsonrpc":"2.0","id":1}"#;
        assert!(matches!(
            parse_block_response(7, body),
            Err(FetchError::MissingTransactions { block: 7 })
        ));
    }

    #[test]
    fn null_block_has_no_transactions() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        assert!(matches!(
            parse_block_response(7, body),
            Err(FetchError::MissingTransactions { block: 7 })
        ));
    }

    #[test]
    fn provider_message_is_reported() {
        let body = r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#;
        match parse_block_response(7, body) {
            Err(FetchError::Provider(message)) => assert_eq!(message, "Invalid API Key"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        assert!(matches!(
            parse_block_response(7, "<html>bad gateway</html>"),
            Err(FetchError::Decode(_))
        ));
    }
}
