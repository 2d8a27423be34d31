use std::str::FromStr;

use alloy::primitives::{Address, U256};
use log::info;
use reqwest::Client;

use crate::source::{
    abi::{encode_payload, parse_amount, to_hex_line},
    config::{ProviderConfig, RateLimit},
    error::{EncodingError, QuoteError, QuoteResult},
    providers::{build_provider, QuoteProvider},
    types::{ProviderKind, QuoteRequest, Side},
};

/// Parses a flat positional argument list into a provider choice and request.
///
/// The first argument names the provider; the rest follow that provider's order:
///
/// - `paraswap        src dst amount side network receiver`
/// - `paraswap-legacy src dst srcDecimals dstDecimals amount side network receiver`
/// - `0x              src dst amount side [network [receiver]]`
/// - `odos            src dst amount side receiver`
pub fn parse_args(args: &[String]) -> QuoteResult<(ProviderKind, QuoteRequest)> {
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| QuoteError::InvalidArguments("missing provider name".to_string()))?;
    let kind: ProviderKind = name.parse()?;

    let request = match (kind, rest) {
        (ProviderKind::Paraswap, [src, dst, amount, side, network, receiver]) => {
            base_request(src, dst, amount, side)?
                .with_network(parse_arg("network", network)?)
                .with_receiver(parse_address("receiver", receiver)?)
        }
        (
            ProviderKind::ParaswapLegacy,
            [src, dst, src_decimals, dst_decimals, amount, side, network, receiver],
        ) => base_request(src, dst, amount, side)?
            .with_decimals(
                parse_arg("srcDecimals", src_decimals)?,
                parse_arg("dstDecimals", dst_decimals)?,
            )
            .with_network(parse_arg("network", network)?)
            .with_receiver(parse_address("receiver", receiver)?),
        // network and receiver are accepted for argument compatibility only
        (ProviderKind::ZeroEx, [src, dst, amount, side, ..]) if rest.len() <= 6 => {
            base_request(src, dst, amount, side)?
        }
        (ProviderKind::Odos, [src, dst, amount, side, receiver]) => {
            base_request(src, dst, amount, side)?
                .with_receiver(parse_address("receiver", receiver)?)
        }
        _ => {
            return Err(QuoteError::InvalidArguments(format!(
                "{} does not take {} arguments",
                kind.name(),
                rest.len()
            )))
        }
    };

    Ok((kind, request))
}

fn base_request(src: &str, dst: &str, amount: &str, side: &str) -> QuoteResult<QuoteRequest> {
    let side: Side = side.parse()?;
    Ok(QuoteRequest::new(
        parse_address("source token", src)?,
        parse_address("destination token", dst)?,
        parse_caller_amount(amount)?,
        side,
    ))
}

/// A malformed amount is a usage error; one past 256 bits stays an encoding error.
fn parse_caller_amount(amount: &str) -> QuoteResult<U256> {
    parse_amount(amount).map_err(|e| match e {
        EncodingError::InvalidAmount(_) => {
            QuoteError::InvalidArguments(format!("invalid amount '{amount}'"))
        }
        other => QuoteError::Encoding(other),
    })
}

fn parse_address(field: &str, value: &str) -> QuoteResult<Address> {
    Address::from_str(value)
        .map_err(|e| QuoteError::InvalidArguments(format!("invalid {field} '{value}': {e}")))
}

fn parse_arg<T: FromStr>(field: &str, value: &str) -> QuoteResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| QuoteError::InvalidArguments(format!("invalid {field} '{value}': {e}")))
}

/// Quotes through `provider` and renders the payload line. Nothing is
/// returned unless every step succeeded.
pub async fn execute(
    provider: &dyn QuoteProvider,
    request: &QuoteRequest,
) -> QuoteResult<String> {
    let quote = provider.quote(request).await?;
    let payload = encode_payload(
        quote.counterparty_amount,
        &quote.call_data,
        provider.payload_layout(),
    );
    info!(
        "{} payload: {} bytes of call data after the amount word",
        provider.name(),
        quote.call_data.len()
    );
    Ok(to_hex_line(&payload))
}

/// One invocation: arguments in, one hex line out.
#[derive(Debug, Clone)]
pub struct QuoteWorkflow {
    client: Client,
    base_url: Option<String>,
    rate_limit: Option<RateLimit>,
}

impl QuoteWorkflow {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: None,
            rate_limit: None,
        }
    }

    /// Points whichever provider gets selected at `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn config_for(&self, kind: ProviderKind) -> ProviderConfig {
        let mut config = ProviderConfig::for_kind(kind);
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(rate_limit) = self.rate_limit {
            config = config.with_rate_limit(rate_limit);
        }
        config
    }

    pub async fn run(&self, args: &[String]) -> QuoteResult<String> {
        let (kind, request) = parse_args(args)?;
        let provider = build_provider(kind, self.config_for(kind), self.client.clone());
        execute(provider.as_ref(), &request).await
    }
}
