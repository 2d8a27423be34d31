//! 0x swap API client. A single `GET /quote` returns both amounts and the
//! call data.

use alloy::primitives::Bytes;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::QuoteProvider;
use crate::source::{
    abi::parse_amount,
    config::ProviderConfig,
    error::ProviderError,
    helpers::{format_address, measure_end, measure_start, read_json, require},
    types::{NormalizedQuote, QuoteRequest, Side},
};

pub const SLIPPAGE_PERCENTAGE: &str = "0.03";
pub const EXCLUDED_SOURCES: &str = "Balancer";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapQuery {
    sell_token: String,
    buy_token: String,
    slippage_percentage: &'static str,
    excluded_sources: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sell_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buy_amount: Option<String>,
}

impl SwapQuery {
    fn from_request(request: &QuoteRequest) -> Self {
        let amount = Some(request.amount.to_string());
        let (sell_amount, buy_amount) = match request.side {
            Side::Sell => (amount, None),
            Side::Buy => (None, amount),
        };
        Self {
            sell_token: format_address(request.source_token),
            buy_token: format_address(request.destination_token),
            slippage_percentage: SLIPPAGE_PERCENTAGE,
            excluded_sources: EXCLUDED_SOURCES,
            sell_amount,
            buy_amount,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    sell_amount: Option<String>,
    buy_amount: Option<String>,
    data: Option<Bytes>,
}

pub struct ZeroExProvider {
    client: Client,
    config: ProviderConfig,
}

impl ZeroExProvider {
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl QuoteProvider for ZeroExProvider {
    fn name(&self) -> &'static str {
        "0x"
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<NormalizedQuote, ProviderError> {
        self.config.rate_limit.wait().await;

        let query = SwapQuery::from_request(request);
        let url = self.config.endpoint("/quote");
        debug!("GET {url} {query:?}");
        let start = measure_start("zeroex_quote");
        let response = self.client.get(&url).query(&query).send().await?;
        let swap: SwapResponse = read_json(self.name(), response).await?;
        measure_end(start);

        // only the leg the caller did not fix is required
        let counterparty = match request.side {
            Side::Sell => require(swap.buy_amount.as_deref(), "buyAmount")?,
            Side::Buy => require(swap.sell_amount.as_deref(), "sellAmount")?,
        };
        let counterparty = parse_amount(counterparty)?;
        let call_data = require(swap.data, "data")?;
        info!(
            "0x quoted {} {} -> counterparty {}",
            request.side, request.amount, counterparty
        );

        Ok(NormalizedQuote {
            counterparty_amount: counterparty,
            call_data,
        })
    }
}
