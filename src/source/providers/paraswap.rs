//! Paraswap v5 API client.
//!
//! Quoting takes two round trips: `GET /prices/` returns a `priceRoute`, which
//! is posted back verbatim to `POST /transactions/{network}/` to obtain the
//! executable call data.

use alloy::primitives::{Bytes, U256};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{counterparty_amount, QuoteProvider};
use crate::source::{
    abi::{parse_amount, PayloadLayout},
    actors::MAINNET_CHAIN_ID,
    config::ProviderConfig,
    error::ProviderError,
    helpers::{format_address, measure_end, measure_start, read_json, require},
    types::{NormalizedQuote, QuoteRequest, Side},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParaswapVersion {
    Current,
    /// Sends token decimals with the price query and expects the legacy payload header.
    Legacy,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricesQuery {
    src_token: String,
    dest_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    src_decimals: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dest_decimals: Option<u8>,
    amount: String,
    side: &'static str,
    network: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricesResponse {
    price_route: Option<PriceRoute>,
}

/// The route is opaque apart from its two amounts; every other key is kept so
/// the route can be posted back unchanged.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceRoute {
    #[serde(skip_serializing_if = "Option::is_none")]
    src_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dest_amount: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBody<'a> {
    price_route: &'a PriceRoute,
    src_token: String,
    dest_token: String,
    src_amount: String,
    dest_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    data: Option<Bytes>,
}

pub struct ParaswapProvider {
    client: Client,
    config: ProviderConfig,
    version: ParaswapVersion,
}

impl ParaswapProvider {
    pub fn new(client: Client, config: ProviderConfig, version: ParaswapVersion) -> Self {
        Self {
            client,
            config,
            version,
        }
    }

    async fn fetch_price_route(
        &self,
        request: &QuoteRequest,
        network: u64,
    ) -> Result<PriceRoute, ProviderError> {
        let (src_decimals, dest_decimals) = match self.version {
            ParaswapVersion::Legacy => (request.source_decimals, request.destination_decimals),
            ParaswapVersion::Current => (None, None),
        };
        let query = PricesQuery {
            src_token: format_address(request.source_token),
            dest_token: format_address(request.destination_token),
            src_decimals,
            dest_decimals,
            amount: request.amount.to_string(),
            side: request.side.as_str(),
            network,
        };

        let url = self.config.endpoint("/prices/");
        debug!("GET {url} {query:?}");
        let start = measure_start("paraswap_prices");
        let response = self.client.get(&url).query(&query).send().await?;
        let prices: PricesResponse = read_json(self.name(), response).await?;
        measure_end(start);

        require(prices.price_route, "priceRoute")
    }

    async fn fetch_call_data(
        &self,
        request: &QuoteRequest,
        network: u64,
        route: &PriceRoute,
        src_amount: U256,
        dest_amount: U256,
    ) -> Result<Bytes, ProviderError> {
        let body = TransactionBody {
            price_route: route,
            src_token: format_address(request.source_token),
            dest_token: format_address(request.destination_token),
            src_amount: src_amount.to_string(),
            dest_amount: dest_amount.to_string(),
            user_address: request.receiver.map(format_address),
        };

        let url = self.config.endpoint(&format!("/transactions/{network}/"));
        debug!("POST {url} srcAmount={src_amount} destAmount={dest_amount}");
        let start = measure_start("paraswap_transactions");
        let response = self
            .client
            .post(&url)
            .query(&[("ignoreChecks", "true")])
            .json(&body)
            .send()
            .await?;
        let transaction: TransactionResponse = read_json(self.name(), response).await?;
        measure_end(start);

        require(transaction.data, "data")
    }
}

#[async_trait]
impl QuoteProvider for ParaswapProvider {
    fn name(&self) -> &'static str {
        match self.version {
            ParaswapVersion::Current => "paraswap",
            ParaswapVersion::Legacy => "paraswap-legacy",
        }
    }

    fn payload_layout(&self) -> PayloadLayout {
        match self.version {
            ParaswapVersion::Current => PayloadLayout::Packed,
            ParaswapVersion::Legacy => PayloadLayout::LegacyHeader,
        }
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<NormalizedQuote, ProviderError> {
        self.config.rate_limit.wait().await;
        let network = request.network.unwrap_or(MAINNET_CHAIN_ID);

        let route = self.fetch_price_route(request, network).await?;
        let route_src = require(route.src_amount.as_deref(), "priceRoute.srcAmount")?;
        let route_dest = require(route.dest_amount.as_deref(), "priceRoute.destAmount")?;
        let (route_src, route_dest) = (parse_amount(route_src)?, parse_amount(route_dest)?);

        let counterparty = counterparty_amount(request.side, route_src, route_dest);
        info!(
            "{} quoted {} {} -> counterparty {}",
            self.name(),
            request.side,
            request.amount,
            counterparty
        );

        // the caller's leg keeps the caller's amount
        let (src_amount, dest_amount) = match request.side {
            Side::Sell => (request.amount, counterparty),
            Side::Buy => (counterparty, request.amount),
        };
        let call_data = self
            .fetch_call_data(request, network, &route, src_amount, dest_amount)
            .await?;

        Ok(NormalizedQuote {
            counterparty_amount: counterparty,
            call_data,
        })
    }
}
