use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use autovolume_core::{
    AdjustmentKind, AggregatorRequest, AggregatorResponse, ContextRequest, Settings,
    SettingsPatch, TabSnapshot,
};
use autovolume_runtime::timer::{TimerHandle, cast_after, cast_every};
use autovolume_runtime::tokio_actor::ActorRef;

use crate::config::AggregatorConfig;
use crate::directory::TabDirectory;
use crate::host::TabHost;
use crate::store::SettingsStore;

use crate::service::messages::{LoadGraceElapsedMessage, PollTickMessage};
use crate::service::poll::{PollSummary, TabPoll, now_ms, poll_tab, send_bounded};

pub(crate) struct AggregatorActor {
    pub(crate) config: AggregatorConfig,
    pub(crate) host: Arc<dyn TabHost>,
    pub(crate) store: Arc<dyn SettingsStore>,
    pub(crate) settings: Settings,
    pub(crate) directory: TabDirectory,
    pub(crate) poll_timer: Option<TimerHandle>,
    pub(crate) grace_timer: Option<TimerHandle>,
}

impl AggregatorActor {
    pub(crate) fn new(
        config: AggregatorConfig,
        host: Arc<dyn TabHost>,
        store: Arc<dyn SettingsStore>,
        settings: Settings,
    ) -> Self {
        Self {
            config,
            host,
            store,
            settings,
            directory: TabDirectory::default(),
            poll_timer: None,
            grace_timer: None,
        }
    }

    /// Starts the repeating poll and queues one poll right away.
    pub(crate) fn start_polling(&mut self, actor_ref: &ActorRef<Self>) {
        if self.poll_timer.is_none() {
            info!(
                interval_ms = self.config.poll_interval.as_millis() as u64,
                "cross-tab monitoring started"
            );
            self.poll_timer = Some(cast_every(actor_ref, self.config.poll_interval, || {
                PollTickMessage
            }));
        }
        let _ = actor_ref.cast(PollTickMessage);
    }

    pub(crate) fn stop_polling(&mut self) {
        self.grace_timer = None;
        if let Some(timer) = self.poll_timer.take() {
            timer.cancel();
            info!("cross-tab monitoring stopped");
        }
    }

    /// Polls every reachable tab once and reconciles the directory with the
    /// result.
    pub(crate) async fn poll_all(&mut self) -> PollSummary {
        if !self.settings.enabled {
            return PollSummary::default();
        }
        let tabs = self.host.list_tabs().await;
        let polled = tabs
            .into_iter()
            .filter(|tab| !self.config.is_excluded(&tab.url))
            .collect::<Vec<_>>();

        let host = self.host.as_ref();
        let settings = self.settings;
        let timeout = self.config.request_timeout;
        let outcomes = join_all(
            polled
                .iter()
                .map(|tab| poll_tab(host, tab.id, settings, timeout)),
        )
        .await;

        let mut summary = PollSummary {
            queried: polled.len(),
            ..PollSummary::default()
        };
        let mut with_media = HashSet::new();
        let now = now_ms();
        for (tab, outcome) in polled.into_iter().zip(outcomes) {
            let TabPoll::Media {
                volume_percent,
                adjustment,
            } = outcome
            else {
                debug!(tab = %tab.id, ?outcome, "tab reported nothing to track");
                continue;
            };
            summary.with_media += 1;
            if adjustment != AdjustmentKind::None {
                summary.adjusted += 1;
            }
            with_media.insert(tab.id);
            self.directory.upsert(TabSnapshot {
                tab_id: tab.id,
                url: tab.url,
                title: tab.title,
                volume_percent,
                has_media: true,
                last_update: now,
            });
        }
        // Anything that did not report media this cycle leaves the directory.
        summary.dropped = self.directory.retain_present(&with_media);
        summary
    }

    pub(crate) async fn handle_request(
        &mut self,
        request: AggregatorRequest,
        actor_ref: &ActorRef<Self>,
    ) -> AggregatorResponse {
        match request {
            AggregatorRequest::SettingsUpdated { settings } => {
                self.apply_patch(SettingsPatch::from(settings), actor_ref)
                    .await;
                AggregatorResponse::ack()
            },
            AggregatorRequest::GetSettings => AggregatorResponse::Settings(self.settings),
            AggregatorRequest::GetAllTabVolumes => {
                AggregatorResponse::TabVolumes(self.directory.snapshots())
            },
            AggregatorRequest::EnableExtension => {
                self.apply_patch(SettingsPatch::enabled(true), actor_ref)
                    .await;
                AggregatorResponse::ack()
            },
            AggregatorRequest::DisableExtension => {
                self.apply_patch(SettingsPatch::enabled(false), actor_ref)
                    .await;
                AggregatorResponse::ack()
            },
            AggregatorRequest::UpdateMinVolume { value } => {
                self.apply_patch(SettingsPatch::min_volume(value), actor_ref)
                    .await;
                AggregatorResponse::ack()
            },
            AggregatorRequest::UpdateMaxVolume { value } => {
                self.apply_patch(SettingsPatch::max_volume(value), actor_ref)
                    .await;
                AggregatorResponse::ack()
            },
        }
    }

    /// Merges `patch`, persists it, pushes the result to every context and
    /// starts or stops polling to match.
    pub(crate) async fn apply_patch(&mut self, patch: SettingsPatch, actor_ref: &ActorRef<Self>) {
        let next = self.settings.merged(&patch);
        if let Err(err) = self.store.save(&patch).await {
            warn!(error = %err, "failed to persist settings; keeping them in memory");
        }
        self.settings = next;
        info!(
            enabled = next.enabled,
            min = next.min_volume,
            max = next.max_volume,
            "settings updated"
        );
        self.push_settings().await;
        if next.enabled {
            self.start_polling(actor_ref);
        } else {
            self.stop_polling();
        }
    }

    /// Sends the current settings to every reachable context.
    async fn push_settings(&self) {
        let tabs = self.host.list_tabs().await;
        let host = self.host.as_ref();
        let settings = self.settings;
        let timeout = self.config.request_timeout;
        let pushes = tabs
            .iter()
            .filter(|tab| !self.config.is_excluded(&tab.url))
            .map(|tab| {
                send_bounded(
                    host,
                    tab.id,
                    ContextRequest::SettingsUpdated { settings },
                    timeout,
                )
            });
        let delivered = join_all(pushes)
            .await
            .into_iter()
            .filter(Option::is_some)
            .count();
        debug!(delivered, "settings pushed to contexts");
    }

    /// Schedules the extra poll that follows a tab load, unless one is pending.
    pub(crate) fn schedule_load_poll(&mut self, actor_ref: &ActorRef<Self>) {
        if self.grace_timer.is_some() || !self.settings.enabled {
            return;
        }
        self.grace_timer = Some(cast_after(
            actor_ref,
            LoadGraceElapsedMessage,
            self.config.load_grace,
        ));
    }
}
