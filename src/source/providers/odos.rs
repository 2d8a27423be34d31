//! Odos smart order router client (`POST /sor/swap`).

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{header::ACCEPT, Client};
use serde::{Deserialize, Serialize};

use super::QuoteProvider;
use crate::source::{
    abi::parse_amount,
    actors::{MAINNET_CHAIN_ID, native_asset_addr},
    config::ProviderConfig,
    error::ProviderError,
    helpers::{format_address, measure_end, measure_start, read_json, require},
    types::{NormalizedQuote, QuoteRequest, Side},
};

pub const SOURCE_BLACKLIST: [&str; 4] = [
    "Balancer V1",
    "Balancer V2 MetaStable",
    "Balancer V2 Stable",
    "Balancer V2 Weighted",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputToken {
    pub token_address: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputToken {
    pub token_address: String,
    pub proportion: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub chain_id: u64,
    pub input_tokens: Vec<InputToken>,
    pub output_tokens: Vec<OutputToken>,
    pub source_blacklist: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_addr: Option<String>,
}

impl SwapRequest {
    /// Builds the router body. Odos encodes the native asset as the zero
    /// address, so the conventional sentinel is swapped out on the input side.
    pub fn from_request(request: &QuoteRequest) -> Self {
        let input_token = if request.source_token == native_asset_addr() {
            Address::ZERO
        } else {
            request.source_token
        };

        Self {
            chain_id: MAINNET_CHAIN_ID,
            input_tokens: vec![InputToken {
                token_address: format_address(input_token),
                amount: request.amount.to_string(),
            }],
            output_tokens: vec![OutputToken {
                token_address: format_address(request.destination_token),
                proportion: 1,
            }],
            source_blacklist: SOURCE_BLACKLIST.to_vec(),
            user_addr: request.receiver.map(format_address),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    output_tokens: Option<Vec<OutputAmount>>,
    transaction: Option<Transaction>,
}

#[derive(Debug, Deserialize)]
struct OutputAmount {
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Transaction {
    data: Option<Bytes>,
}

pub struct OdosProvider {
    client: Client,
    config: ProviderConfig,
}

impl OdosProvider {
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl QuoteProvider for OdosProvider {
    fn name(&self) -> &'static str {
        "odos"
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<NormalizedQuote, ProviderError> {
        // the router only takes input amounts
        if request.side == Side::Buy {
            return Err(ProviderError::UnsupportedSide {
                provider: self.name(),
                side: request.side,
            });
        }
        self.config.rate_limit.wait().await;

        let body = SwapRequest::from_request(request);
        let url = self.config.endpoint("/sor/swap");
        debug!("POST {url} {body:?}");
        let start = measure_start("odos_swap");
        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;
        let swap: SwapResponse = read_json(self.name(), response).await?;
        measure_end(start);

        let output = require(
            swap.output_tokens.and_then(|tokens| tokens.into_iter().next()),
            "outputTokens[0]",
        )?;
        let counterparty = parse_amount(&require(output.amount, "outputTokens[0].amount")?)?;
        let transaction = require(swap.transaction, "transaction")?;
        let call_data = require(transaction.data, "transaction.data")?;
        info!(
            "odos quoted {} {} -> counterparty {}",
            request.side, request.amount, counterparty
        );

        Ok(NormalizedQuote {
            counterparty_amount: counterparty,
            call_data,
        })
    }
}
