use std::{env, num::NonZeroUsize, time::Duration};

use serde::Deserialize;

pub use pubsub::TransportConfig as BrokerConfig;

/// Bound on every round completion await when `ROUND_TIMEOUT_SECS` isn't set.
pub const DEFAULT_ROUND_TIMEOUT: Duration = Duration::from_secs(600);

/// Shape and pacing of a job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverConfig {
    /// Amount of static column blocks, one per daemon.
    pub num_workers: NonZeroUsize,
    /// Amount of rounds, one per row block of the left operand.
    pub num_iterations: NonZeroUsize,
    /// Tile size forwarded to the daemons' local product.
    pub block_size: NonZeroUsize,
    #[serde(default = "default_round_timeout", with = "secs")]
    pub round_timeout: Duration,
}

impl DriverConfig {
    /// Creates a new `DriverConfig` with the default round timeout.
    pub fn new(
        num_workers: NonZeroUsize,
        num_iterations: NonZeroUsize,
        block_size: NonZeroUsize,
    ) -> Self {
        Self {
            num_workers,
            num_iterations,
            block_size,
            round_timeout: DEFAULT_ROUND_TIMEOUT,
        }
    }

    /// Overrides the round timeout with `ROUND_TIMEOUT_SECS` if it's set to a
    /// positive amount of seconds.
    pub fn with_env_timeout(mut self) -> Self {
        if let Some(secs) = env::var("ROUND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
        {
            self.round_timeout = Duration::from_secs(secs);
        }
        self
    }

    pub fn with_round_timeout(mut self, round_timeout: Duration) -> Self {
        self.round_timeout = round_timeout;
        self
    }
}

fn default_round_timeout() -> Duration {
    DEFAULT_ROUND_TIMEOUT
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn deserializes_with_default_timeout() {
        let json = r#"{"num_workers":2,"num_iterations":4,"block_size":64}"#;
        let config: DriverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, DriverConfig::new(nz(2), nz(4), nz(64)));
    }

    #[test]
    fn timeout_is_read_in_seconds() {
        let json = r#"{"num_workers":1,"num_iterations":1,"block_size":1,"round_timeout":5}"#;
        let config: DriverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.round_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_counts_are_rejected() {
        let json = r#"{"num_workers":0,"num_iterations":1,"block_size":1}"#;
        assert!(serde_json::from_str::<DriverConfig>(json).is_err());
    }
}
