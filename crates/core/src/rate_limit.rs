//! Rate limiting seam. The storage behind the counters is up to the
//! implementation; the api crate ships a fixed-window in-process limiter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one hit against `key`; `false` once `max` hits were seen within
    /// the current `window`.
    async fn allow(&self, key: &str, max: u32, window: Duration) -> bool;
}

/// Independent budgets so a burst of uploads cannot starve reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateScope {
    Read,
    Write,
    Media,
}

impl RateScope {
    pub fn name(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Media => "media",
        }
    }

    /// Counter key for a caller in this scope.
    pub fn key(self, caller: &str) -> String {
        format!("{}:{caller}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_partition_keys() {
        assert_eq!(RateScope::Read.key("10.0.0.1"), "read:10.0.0.1");
        assert_ne!(RateScope::Write.key("a"), RateScope::Media.key("a"));
    }
}
