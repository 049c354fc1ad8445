use std::sync::Arc;

use tracing::warn;

use autovolume_core::Settings;
use autovolume_runtime::tokio_actor::spawn_actor;

use crate::config::AggregatorConfig;
use crate::error::AggregatorError;
use crate::host::TabHost;
use crate::store::SettingsStore;

use crate::service::actor::AggregatorActor;
use crate::service::handle::AggregatorHandle;
use crate::service::messages::StartMessage;

/// Loads settings from `store` and starts the aggregator.
///
/// A store that cannot be read leaves the aggregator on default settings.
pub async fn start_aggregator(
    host: Arc<dyn TabHost>,
    store: Arc<dyn SettingsStore>,
    config: AggregatorConfig,
) -> Result<AggregatorHandle, AggregatorError> {
    let settings = match store.load().await {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "failed to load settings; using defaults");
            Settings::default()
        },
    };
    let timeout = config.command_timeout;
    let actor = AggregatorActor::new(config, host, store, settings);
    let (actor_ref, _join) = spawn_actor(actor);
    actor_ref
        .call(StartMessage, timeout)
        .await
        .map_err(|e| AggregatorError::from_call_error("start", timeout, e))?;
    Ok(AggregatorHandle::new(actor_ref, timeout))
}
