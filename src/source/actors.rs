use alloy::primitives::{address, Address};

pub const MAINNET_CHAIN_ID: u64 = 1;

/// Placeholder most aggregators use for the chain's native asset.
pub fn native_asset_addr() -> Address {
    address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee")
}

pub fn weth_addr() -> Address {
    address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")
}

pub fn usdc_addr() -> Address {
    address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
}
