use serde::Deserialize;

/// Dashboard service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Refresh poll interval in seconds (supports fractional seconds like 0.5)
    pub poll_interval_secs: f64,

    /// Timeout for one upstream snapshot fetch
    pub fetch_timeout_secs: u64,

    /// Capacity of the build-updated broadcast channel
    pub broadcast_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10.0),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            broadcast_capacity: std::env::var("BROADCAST_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = DashboardConfig::default();
        assert!(config.poll_interval_secs > 0.0);
        assert!(config.fetch_timeout_secs > 0);
        assert!(config.broadcast_capacity > 0);
    }
}
