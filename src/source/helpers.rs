use alloy::primitives::{hex, Address};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tokio::time::Instant;

use crate::source::error::ProviderError;

pub fn measure_start(label: &str) -> (String, Instant) {
    (label.to_string(), Instant::now())
}

pub fn measure_end(start: (String, Instant)) -> Duration {
    let elapsed = start.1.elapsed();
    debug!("Elapsed: {:.2?} for '{}'", elapsed, start.0);
    elapsed
}

/// Lowercase `0x`-prefixed form sent to every upstream.
pub fn format_address(address: Address) -> String {
    hex::encode_prefixed(address.as_slice())
}

pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ProviderError> {
    value.ok_or(ProviderError::MissingField(field))
}

/// Reads the body of an upstream response, rejecting non-2xx statuses and
/// bodies that are not the expected JSON shape.
pub async fn read_json<T: DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let reason = upstream_reason(&body);
        warn!("{provider} rejected the request with {status}: {reason}");
        return Err(ProviderError::UpstreamRejected {
            status: status.as_u16(),
            reason,
        });
    }

    serde_json::from_slice(&body).map_err(|e| {
        warn!("{provider} returned an unreadable body: {e}");
        ProviderError::UpstreamRejected {
            status: status.as_u16(),
            reason: format!("malformed response: {e}"),
        }
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    reason: Option<String>,
    detail: Option<String>,
}

fn upstream_reason(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.error.or(e.message).or(e.reason).or(e.detail))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
