use crate::constants::{network, pagination, retry};
use std::time::Duration;

/// Pipeline tunables, built once per session and handed to each component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub retry_statuses: Vec<u16>,
    pub timeout_ms: u64,
    pub page_size: usize,
    pub max_pages: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: retry::MAX_RETRIES,
            base_delay_ms: retry::BASE_DELAY_MS,
            retry_statuses: retry::STATUS_CODES.to_vec(),
            timeout_ms: network::TIMEOUT_API_REQUEST_MS,
            page_size: pagination::PAGE_SIZE,
            max_pages: pagination::MAX_PAGES,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `HUB_MAX_RETRIES`, `HUB_RETRY_BASE_DELAY_MS`,
    /// `HUB_TIMEOUT_MS` and `HUB_MAX_PAGES`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(value) = read_env_u64("HUB_MAX_RETRIES") {
            config.max_retries = value as usize;
        }
        if let Some(value) = read_env_u64("HUB_RETRY_BASE_DELAY_MS") {
            config.base_delay_ms = value;
        }
        if let Some(value) = read_env_u64("HUB_TIMEOUT_MS").filter(|v| *v > 0) {
            config.timeout_ms = value;
        }
        if let Some(value) = read_env_u64("HUB_MAX_PAGES").filter(|v| *v > 0) {
            config.max_pages = value as usize;
        }
        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

fn read_env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hub_contract() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay_ms, 1_000);
        assert_eq!(config.retry_statuses, vec![429, 500, 502, 503, 504]);
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn with_max_pages_never_drops_to_zero() {
        assert_eq!(PipelineConfig::default().with_max_pages(0).max_pages, 1);
    }
}
