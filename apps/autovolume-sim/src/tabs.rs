//! Simulated tabs: headless pages whose media keeps drifting out of band.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::debug;

use autovolume_aggregator::InProcessTabHost;
use autovolume_core::{Settings, TabId, TabInfo};
use autovolume_engine::content::ContentTree;
use autovolume_engine::headless::{HeadlessDocument, HeadlessMediaElement};
use autovolume_engine::indicator::{LogIndicator, QueuedIndicator};
use autovolume_engine::source::graph::GainNode;
use autovolume_engine::{ContextHandle, EngineConfig, start_context};

/// Levels pages set on their own, cycling.
const PAGE_LEVELS: [f64; 6] = [0.05, 0.95, 0.5, 1.0, 0.12, 0.7];

enum Media {
    Element(Arc<HeadlessMediaElement>),
    Gain(Arc<GainNode>),
}

impl Media {
    fn set_page_level(&self, level: f64) {
        match self {
            Self::Element(element) => {
                if let Err(err) = element.set_page_volume(level) {
                    debug!(error = %err, "page volume write rejected");
                }
            },
            Self::Gain(node) => node.gain().set(level),
        }
    }
}

pub struct SimulatedTab {
    pub id: TabId,
    pub context: ContextHandle,
    _document: Arc<HeadlessDocument>,
    driver: JoinHandle<()>,
}

impl SimulatedTab {
    pub async fn close(self, host: &InProcessTabHost) {
        self.driver.abort();
        host.close_tab(self.id);
        if let Err(err) = self.context.shutdown().await {
            debug!(tab = %self.id, error = %err, "context already gone");
        }
    }
}

/// Opens one tab. Even ids play an element, odd ids drive a gain node, and
/// every third tab also carries a muted element the engine must leave alone.
pub async fn open_tab(
    host: &InProcessTabHost,
    id: u32,
    settings: Settings,
    config: EngineConfig,
    drift: Duration,
) -> Result<SimulatedTab> {
    let document = HeadlessDocument::new();
    let tree: Arc<dyn ContentTree> = document.clone();
    let indicator = Arc::new(QueuedIndicator::new(Arc::new(LogIndicator)));
    let context = start_context(tree, indicator, settings, config)
        .await
        .with_context(|| format!("start context for tab {id}"))?;

    let media = if id % 2 == 0 {
        let element = HeadlessMediaElement::video(PAGE_LEVELS[0]);
        element.play();
        document.append(element.clone());
        Media::Element(element)
    } else {
        let graph = context.audio_graphs().create_graph();
        Media::Gain(graph.create_gain())
    };
    if id % 3 == 0 {
        let muted = HeadlessMediaElement::audio(0.03);
        muted.set_muted(true);
        muted.play();
        document.append(muted);
    }

    let tab_id = TabId(id);
    host.open_tab(
        TabInfo::new(tab_id, format!("https://site{id}.test/watch"), format!("Simulated tab {id}")),
        Some(context.clone()),
    );

    let driver = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(drift);
        ticker.tick().await;
        for level in PAGE_LEVELS.iter().cycle().skip(id as usize) {
            ticker.tick().await;
            media.set_page_level(*level);
        }
    });

    Ok(SimulatedTab {
        id: tab_id,
        context,
        _document: document,
        driver,
    })
}
