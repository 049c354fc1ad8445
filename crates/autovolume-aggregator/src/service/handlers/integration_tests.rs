use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use autovolume_core::{
    AdjustmentKind, AggregatorRequest, ContextRequest, ContextResponse, Settings, SettingsPatch,
    TabId, TabInfo, TabStatus, VolumeReport,
};

use crate::config::AggregatorConfig;
use crate::error::StoreError;
use crate::host::TabHost;
use crate::service::{AggregatorHandle, PollSummary, start_aggregator};
use crate::store::{MemorySettingsStore, SettingsStore};

#[derive(Clone, Copy)]
enum Script {
    Media(f64),
    NoMedia,
    Unreachable,
    Hang,
}

#[derive(Default)]
struct ScriptedHost {
    tabs: Mutex<Vec<TabInfo>>,
    scripts: Mutex<HashMap<TabId, Script>>,
    sent: Mutex<Vec<(TabId, ContextRequest)>>,
}

impl ScriptedHost {
    fn tab(&self, id: u32, url: &str, script: Script) {
        self.tabs
            .lock()
            .push(TabInfo::new(TabId(id), url, format!("tab {id}")));
        self.scripts.lock().insert(TabId(id), script);
    }

    fn script(&self, id: u32, script: Script) {
        self.scripts.lock().insert(TabId(id), script);
    }

    fn close(&self, id: u32) {
        self.tabs.lock().retain(|tab| tab.id != TabId(id));
    }

    fn sent_to(&self, id: u32) -> Vec<ContextRequest> {
        self.sent
            .lock()
            .iter()
            .filter(|(tab, _)| *tab == TabId(id))
            .map(|(_, request)| request.clone())
            .collect()
    }

    fn volume_queries(&self, id: u32) -> usize {
        self.sent_to(id)
            .iter()
            .filter(|r| matches!(r, ContextRequest::GetCurrentVolume))
            .count()
    }
}

#[async_trait]
impl TabHost for ScriptedHost {
    async fn list_tabs(&self) -> Vec<TabInfo> {
        self.tabs.lock().clone()
    }

    async fn send(&self, tab: TabId, request: ContextRequest) -> Option<ContextResponse> {
        self.sent.lock().push((tab, request.clone()));
        let script = self.scripts.lock().get(&tab).copied()?;
        let report = match script {
            Script::Unreachable => return None,
            Script::Hang => std::future::pending().await,
            Script::Media(volume) => VolumeReport {
                volume,
                has_media: true,
                is_at_max_volume: volume >= 0.99,
                total_elements: 1,
            },
            Script::NoMedia => VolumeReport::default(),
        };
        match request {
            ContextRequest::GetCurrentVolume => Some(ContextResponse::Volume(report)),
            _ => Some(ContextResponse::ack()),
        }
    }
}

struct BrokenStore;

#[async_trait]
impl SettingsStore for BrokenStore {
    async fn load(&self) -> Result<Settings, StoreError> {
        Err(StoreError::Task("storage offline".to_string()))
    }

    async fn save(&self, _patch: &SettingsPatch) -> Result<Settings, StoreError> {
        Err(StoreError::Task("storage offline".to_string()))
    }
}

fn test_config() -> AggregatorConfig {
    AggregatorConfig {
        poll_interval: Duration::from_secs(600),
        request_timeout: Duration::from_millis(100),
        load_grace: Duration::from_millis(30),
        command_timeout: Duration::from_secs(2),
        ..AggregatorConfig::default()
    }
}

async fn start(
    host: &Arc<ScriptedHost>,
    store: Arc<dyn SettingsStore>,
) -> AggregatorHandle {
    let host: Arc<dyn TabHost> = host.clone();
    start_aggregator(host, store, test_config())
        .await
        .expect("aggregator should start")
}

#[tokio::test(flavor = "multi_thread")]
async fn poll_records_media_tabs_and_corrects_loud_ones() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(1, "https://video.test", Script::Media(0.95));
    host.tab(2, "https://music.test", Script::Media(0.5));
    host.tab(3, "https://news.test", Script::NoMedia);
    host.tab(4, "chrome://settings", Script::Media(1.0));
    let handle = start(&host, Arc::new(MemorySettingsStore::default())).await;

    let summary = handle.poll_now().await.unwrap();
    assert_eq!(
        summary,
        PollSummary {
            queried: 3,
            with_media: 2,
            adjusted: 1,
            dropped: 0,
        }
    );

    let tabs = handle.tab_volumes().await.unwrap();
    let volumes = tabs
        .iter()
        .map(|t| (t.tab_id, t.volume_percent))
        .collect::<Vec<_>>();
    assert_eq!(volumes, vec![(TabId(1), 95), (TabId(2), 50)]);
    assert!(tabs.iter().all(|t| t.has_media && t.last_update > 0));

    assert!(host.sent_to(1).contains(&ContextRequest::AdjustVolume {
        target_volume: 80,
        adjustment_type: AdjustmentKind::Reduce,
    }));
    assert!(host
        .sent_to(2)
        .iter()
        .all(|r| !matches!(r, ContextRequest::AdjustVolume { .. })));
    assert!(host.sent_to(4).is_empty());
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn quiet_tab_gets_boost_command() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(7, "https://quiet.test", Script::Media(0.104));
    let handle = start(&host, Arc::new(MemorySettingsStore::default())).await;

    handle.poll_now().await.unwrap();
    assert!(host.sent_to(7).contains(&ContextRequest::AdjustVolume {
        target_volume: 20,
        adjustment_type: AdjustmentKind::Boost,
    }));
    assert_eq!(handle.tab_volumes().await.unwrap()[0].volume_percent, 10);
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_silent_and_closed_tabs_leave_directory() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(1, "https://a.test", Script::Media(0.5));
    host.tab(2, "https://b.test", Script::Media(0.5));
    host.tab(3, "https://c.test", Script::Media(0.5));
    let handle = start(&host, Arc::new(MemorySettingsStore::default())).await;
    handle.poll_now().await.unwrap();
    assert_eq!(handle.tab_volumes().await.unwrap().len(), 3);

    host.script(1, Script::Unreachable);
    host.script(2, Script::NoMedia);
    host.close(3);
    let summary = handle.poll_now().await.unwrap();
    assert_eq!(summary.dropped, 3);
    assert!(handle.tab_volumes().await.unwrap().is_empty());
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn hung_tab_does_not_stall_the_cycle() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(1, "https://stuck.test", Script::Hang);
    host.tab(2, "https://fine.test", Script::Media(0.5));
    let handle = start(&host, Arc::new(MemorySettingsStore::default())).await;

    let summary = handle.poll_now().await.unwrap();
    assert_eq!(summary.queried, 2);
    assert_eq!(summary.with_media, 1);
    let tabs = handle.tab_volumes().await.unwrap();
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].tab_id, TabId(2));
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn settings_changes_are_persisted_and_pushed() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(1, "https://a.test", Script::Media(0.5));
    host.tab(2, "chrome-extension://popup", Script::Media(0.5));
    let store = Arc::new(MemorySettingsStore::default());
    let handle = start(&host, store.clone()).await;

    handle
        .request(AggregatorRequest::UpdateMinVolume { value: 30 })
        .await
        .unwrap();
    handle
        .request(AggregatorRequest::UpdateMaxVolume { value: 70 })
        .await
        .unwrap();

    let expected = Settings::with_band(30, 70);
    assert_eq!(store.current(), expected);
    assert_eq!(handle.settings().await.unwrap(), expected);
    assert!(host.sent_to(1).contains(&ContextRequest::SettingsUpdated {
        settings: expected,
    }));
    assert!(host.sent_to(2).is_empty());
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn disabling_stops_polling_and_enabling_polls_at_once() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(1, "https://a.test", Script::Media(0.95));
    let store = Arc::new(MemorySettingsStore::default());
    let handle = start(&host, store.clone()).await;
    handle.poll_now().await.unwrap();

    handle.set_enabled(false).await.unwrap();
    assert!(!store.current().enabled);
    let queries = host.volume_queries(1);
    assert_eq!(handle.poll_now().await.unwrap(), PollSummary::default());
    assert_eq!(host.volume_queries(1), queries);

    handle.set_enabled(true).await.unwrap();
    // The immediate poll is queued behind the request that enabled it.
    handle.settings().await.unwrap();
    assert_eq!(host.volume_queries(1), queries + 1);
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_tab_is_dropped_without_waiting_for_a_poll() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(1, "https://a.test", Script::Media(0.5));
    let handle = start(&host, Arc::new(MemorySettingsStore::default())).await;
    handle.poll_now().await.unwrap();

    handle.tab_removed(TabId(1)).unwrap();
    assert!(handle.tab_volumes().await.unwrap().is_empty());
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn load_completions_trigger_one_grace_poll() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(1, "https://a.test", Script::Media(0.5));
    let handle = start(&host, Arc::new(MemorySettingsStore::default())).await;
    handle.settings().await.unwrap();
    let before = host.volume_queries(1);

    handle.tab_updated(TabId(1), TabStatus::Loading).unwrap();
    for _ in 0..3 {
        handle.tab_updated(TabId(1), TabStatus::Complete).unwrap();
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.settings().await.unwrap();
    assert_eq!(host.volume_queries(1), before + 1);
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn json_dispatch_answers_popup_messages() {
    let host = Arc::new(ScriptedHost::default());
    host.tab(5, "https://a.test", Script::Media(0.42));
    let handle = start(&host, Arc::new(MemorySettingsStore::default())).await;
    handle.poll_now().await.unwrap();

    let settings = handle
        .dispatch_json(json!({"type": "GET_SETTINGS"}))
        .await
        .unwrap();
    assert_eq!(
        settings,
        json!({"enabled": true, "minVolume": 20, "maxVolume": 80})
    );

    let tabs = handle
        .dispatch_json(json!({"type": "GET_ALL_TAB_VOLUMES"}))
        .await
        .unwrap();
    assert_eq!(tabs[0]["tabId"], 5);
    assert_eq!(tabs[0]["volume"], 42);
    assert_eq!(tabs[0]["hasMedia"], true);

    let ack = handle
        .dispatch_json(json!({"type": "UPDATE_MAX_VOLUME", "value": 90}))
        .await
        .unwrap();
    assert_eq!(ack, json!({"success": true}));

    let unknown = handle
        .dispatch_json(json!({"type": "MAKE_IT_LOUDER"}))
        .await
        .unwrap();
    assert_eq!(
        unknown,
        json!({"success": false, "error": "Unknown message type"})
    );
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_store_starts_on_defaults() {
    let host = Arc::new(ScriptedHost::default());
    let handle = start(&host, Arc::new(BrokenStore)).await;
    assert_eq!(handle.settings().await.unwrap(), Settings::default());

    // A failed save still takes effect in memory.
    handle
        .request(AggregatorRequest::UpdateMinVolume { value: 40 })
        .await
        .unwrap();
    assert_eq!(handle.settings().await.unwrap().min_volume, 40);
    handle.shutdown().await.unwrap();
}
