use std::{fmt, str::FromStr};

use alloy::primitives::{Address, Bytes, U256};

use crate::source::error::QuoteError;

/// Which leg of the trade the caller's amount refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Sell,
    Buy,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Sell => "SELL",
            Side::Buy => "BUY",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("SELL") {
            Ok(Side::Sell)
        } else if s.eq_ignore_ascii_case("BUY") {
            Ok(Side::Buy)
        } else {
            Err(QuoteError::InvalidArguments(format!(
                "unknown side '{s}', expected SELL or BUY"
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Paraswap,
    ParaswapLegacy,
    ZeroEx,
    Odos,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Paraswap => "paraswap",
            ProviderKind::ParaswapLegacy => "paraswap-legacy",
            ProviderKind::ZeroEx => "0x",
            ProviderKind::Odos => "odos",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paraswap" => Ok(ProviderKind::Paraswap),
            "paraswap-legacy" => Ok(ProviderKind::ParaswapLegacy),
            "0x" | "zeroex" => Ok(ProviderKind::ZeroEx),
            "odos" => Ok(ProviderKind::Odos),
            _ => Err(QuoteError::UnknownProvider(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub source_token: Address,
    pub destination_token: Address,
    /// Token base units on the side named by `side`.
    pub amount: U256,
    pub side: Side,
    pub network: Option<u64>,
    pub receiver: Option<Address>,
    pub source_decimals: Option<u8>,
    pub destination_decimals: Option<u8>,
}

impl QuoteRequest {
    pub fn new(
        source_token: Address,
        destination_token: Address,
        amount: U256,
        side: Side,
    ) -> Self {
        Self {
            source_token,
            destination_token,
            amount,
            side,
            network: None,
            receiver: None,
            source_decimals: None,
            destination_decimals: None,
        }
    }

    pub fn with_network(mut self, network: u64) -> Self {
        self.network = Some(network);
        self
    }

    pub fn with_receiver(mut self, receiver: Address) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_decimals(mut self, source_decimals: u8, destination_decimals: u8) -> Self {
        self.source_decimals = Some(source_decimals);
        self.destination_decimals = Some(destination_decimals);
        self
    }
}

/// Provider output reduced to what the payload needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuote {
    /// Amount on the opposite leg from the one the caller fixed.
    pub counterparty_amount: U256,
    /// Executable swap call data, exactly as the upstream returned it.
    pub call_data: Bytes,
}
