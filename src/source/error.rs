use thiserror::Error;

pub type QuoteResult<T> = Result<T, QuoteError>;

/// Failures while turning an amount and call data into a payload, or back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("amount {0} does not fit in uint256")]
    Overflow(String),

    #[error("invalid decimal amount '{0}'")]
    InvalidAmount(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Failures raised by an upstream aggregator while quoting.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream rejected the request (status {status}): {reason}")]
    UpstreamRejected { status: u16, reason: String },

    #[error("upstream response is missing '{0}'")]
    MissingField(&'static str),

    #[error("{provider} cannot quote the {side} side")]
    UnsupportedSide {
        provider: &'static str,
        side: crate::source::types::Side,
    },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown provider '{0}', expected one of: paraswap, paraswap-legacy, 0x, odos")]
    UnknownProvider(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
