//! Upstream aggregators that can price a swap and hand back its call data.

pub mod odos;
pub mod paraswap;
pub mod zeroex;

use alloy::primitives::U256;
use async_trait::async_trait;
use reqwest::Client;

use crate::source::{
    abi::PayloadLayout,
    config::ProviderConfig,
    error::ProviderError,
    types::{NormalizedQuote, ProviderKind, QuoteRequest, Side},
};

pub use odos::OdosProvider;
pub use paraswap::{ParaswapProvider, ParaswapVersion};
pub use zeroex::ZeroExProvider;

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Byte layout downstream consumers of this provider expect.
    fn payload_layout(&self) -> PayloadLayout {
        PayloadLayout::Packed
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<NormalizedQuote, ProviderError>;
}

/// Picks the amount on the leg the caller did not fix.
pub fn counterparty_amount(side: Side, source_amount: U256, destination_amount: U256) -> U256 {
    match side {
        Side::Sell => destination_amount,
        Side::Buy => source_amount,
    }
}

pub fn build_provider(
    kind: ProviderKind,
    config: ProviderConfig,
    client: Client,
) -> Box<dyn QuoteProvider> {
    match kind {
        ProviderKind::Paraswap => {
            Box::new(ParaswapProvider::new(client, config, ParaswapVersion::Current))
        }
        ProviderKind::ParaswapLegacy => {
            Box::new(ParaswapProvider::new(client, config, ParaswapVersion::Legacy))
        }
        ProviderKind::ZeroEx => Box::new(ZeroExProvider::new(client, config)),
        ProviderKind::Odos => Box::new(OdosProvider::new(client, config)),
    }
}
