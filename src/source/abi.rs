use alloy::{
    primitives::{hex, Bytes, U256},
    sol_types::SolValue,
};

use crate::source::error::EncodingError;

/// Width of the big-endian amount word that opens every payload.
pub const AMOUNT_WORD_LEN: usize = 32;

/// Static ABI head of a single `bytes` parameter sitting after a 2-word head:
/// offset `0x40`, then a length word of `0xe4`. Legacy Paraswap consumers expect
/// it verbatim between the amount word and the call data.
pub const LEGACY_HEADER: [u8; 64] = {
    let mut header = [0u8; 64];
    header[31] = 0x40;
    header[63] = 0xe4;
    header
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadLayout {
    /// `amount ‖ callData`
    #[default]
    Packed,
    /// `amount ‖ LEGACY_HEADER ‖ callData`
    LegacyHeader,
}

impl PayloadLayout {
    fn prefix_len(&self) -> usize {
        match self {
            PayloadLayout::Packed => AMOUNT_WORD_LEN,
            PayloadLayout::LegacyHeader => AMOUNT_WORD_LEN + LEGACY_HEADER.len(),
        }
    }
}

/// Parses a base-10 token amount, rejecting anything outside `[0, 2^256 - 1]`.
pub fn parse_amount(amount: &str) -> Result<U256, EncodingError> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::InvalidAmount(amount.to_string()));
    }
    // only digits are left, so a failure here can only be an overflow
    U256::from_str_radix(amount, 10).map_err(|_| EncodingError::Overflow(amount.to_string()))
}

pub fn encode_payload(amount: U256, call_data: &Bytes, layout: PayloadLayout) -> Vec<u8> {
    match layout {
        PayloadLayout::Packed => (amount, call_data.clone()).abi_encode_packed(),
        PayloadLayout::LegacyHeader => {
            let mut payload = Vec::with_capacity(layout.prefix_len() + call_data.len());
            payload.extend_from_slice(&amount.to_be_bytes::<AMOUNT_WORD_LEN>());
            payload.extend_from_slice(&LEGACY_HEADER);
            payload.extend_from_slice(call_data);
            payload
        }
    }
}

pub fn decode_payload(
    payload: &[u8],
    layout: PayloadLayout,
) -> Result<(U256, Bytes), EncodingError> {
    if payload.len() < layout.prefix_len() {
        return Err(EncodingError::MalformedPayload(format!(
            "expected at least {} bytes, got {}",
            layout.prefix_len(),
            payload.len()
        )));
    }

    let amount = U256::from_be_slice(&payload[..AMOUNT_WORD_LEN]);
    if layout == PayloadLayout::LegacyHeader
        && payload[AMOUNT_WORD_LEN..layout.prefix_len()] != LEGACY_HEADER
    {
        return Err(EncodingError::MalformedPayload("legacy header mismatch".into()));
    }

    Ok((amount, Bytes::copy_from_slice(&payload[layout.prefix_len()..])))
}

/// Renders a payload the way downstream harnesses read it: `0x` + lowercase hex.
pub fn to_hex_line(payload: &[u8]) -> String {
    hex::encode_prefixed(payload)
}
