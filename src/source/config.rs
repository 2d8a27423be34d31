use std::time::Duration;

use log::debug;

use crate::source::types::ProviderKind;

pub const PARASWAP_API_URL: &str = "https://apiv5.paraswap.io";
pub const ZERO_EX_API_URL: &str = "https://api.0x.org/swap/v1";
pub const ODOS_API_URL: &str = "https://api.odos.xyz";

/// Delay awaited once before a provider talks to its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimit {
    pub pre_call_delay: Duration,
}

impl RateLimit {
    pub const fn none() -> Self {
        Self {
            pre_call_delay: Duration::ZERO,
        }
    }

    pub const fn fixed(pre_call_delay: Duration) -> Self {
        Self { pre_call_delay }
    }

    pub async fn wait(&self) {
        if self.pre_call_delay.is_zero() {
            return;
        }
        debug!("waiting {:?} before calling upstream", self.pre_call_delay);
        tokio::time::sleep(self.pre_call_delay).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub rate_limit: RateLimit,
}

impl ProviderConfig {
    pub fn paraswap() -> Self {
        Self {
            base_url: PARASWAP_API_URL.to_string(),
            rate_limit: RateLimit::none(),
        }
    }

    pub fn zero_ex() -> Self {
        Self {
            base_url: ZERO_EX_API_URL.to_string(),
            rate_limit: RateLimit::fixed(Duration::from_secs(5)),
        }
    }

    pub fn odos() -> Self {
        Self {
            base_url: ODOS_API_URL.to_string(),
            rate_limit: RateLimit::fixed(Duration::from_secs(3)),
        }
    }

    pub fn for_kind(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Paraswap | ProviderKind::ParaswapLegacy => Self::paraswap(),
            ProviderKind::ZeroEx => Self::zero_ex(),
            ProviderKind::Odos => Self::odos(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Joins `path` onto the base URL without doubling the separator.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
