use std::time::Duration;

/// Timing and policy knobs for one content context.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cadence of the polling pass.
    pub poll_interval: Duration,
    /// Delay batching content-tree mutations into one re-scan.
    pub rescan_debounce: Duration,
    /// Delay between a source lifecycle event and its re-evaluation.
    pub source_debounce: Duration,
    /// Delay before the system volume hint follows a boost to 100%.
    pub system_hint_delay: Duration,
    /// Bounded wait for requests sent to the context actor.
    pub command_timeout: Duration,
    /// Install element listeners, gain observers and the mutation observer.
    /// With this off the polling pass alone keeps sources in band.
    pub event_triggers: bool,
    /// Levels at or above this count as "at max volume" in reports.
    pub max_volume_threshold: f64,
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            rescan_debounce: Duration::from_millis(100),
            source_debounce: Duration::from_millis(50),
            system_hint_delay: Duration::from_secs(3),
            command_timeout: Duration::from_secs(2),
            event_triggers: true,
            max_volume_threshold: 0.99,
            event_capacity: 256,
        }
    }
}
