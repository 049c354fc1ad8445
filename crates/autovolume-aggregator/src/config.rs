use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Cadence of the cross-tab poll while enabled.
    pub poll_interval: Duration,
    /// Bounded wait for each request sent to a tab.
    pub request_timeout: Duration,
    /// Delay between a tab finishing its load and the extra poll it triggers.
    pub load_grace: Duration,
    /// Tabs whose URL starts with one of these are never queried.
    pub excluded_url_prefixes: Vec<String>,
    /// Bounded wait for calls into the aggregator actor.
    pub command_timeout: Duration,
}

impl AggregatorConfig {
    pub fn is_excluded(&self, url: &str) -> bool {
        self.excluded_url_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_millis(500),
            load_grace: Duration::from_secs(1),
            excluded_url_prefixes: vec![
                "chrome://".to_string(),
                "chrome-extension://".to_string(),
            ],
            command_timeout: Duration::from_secs(5),
        }
    }
}
