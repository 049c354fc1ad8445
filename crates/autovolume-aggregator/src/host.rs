//! How the aggregator reaches tabs.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tracing::debug;

use autovolume_core::{ContextRequest, ContextResponse, TabId, TabInfo};
use autovolume_engine::ContextHandle;

/// Tab enumeration plus the request channel into each tab's context.
#[async_trait]
pub trait TabHost: Send + Sync {
    async fn list_tabs(&self) -> Vec<TabInfo>;

    /// `None` when the tab has no reachable context.
    async fn send(&self, tab: TabId, request: ContextRequest) -> Option<ContextResponse>;
}

#[derive(Clone)]
struct HostedTab {
    info: TabInfo,
    context: Option<ContextHandle>,
}

/// Tabs whose contexts run in this process.
///
/// The tab table is swapped wholesale on every change, so enumeration and
/// request routing never wait on a tab being opened or closed.
#[derive(Default)]
pub struct InProcessTabHost {
    tabs: ArcSwap<BTreeMap<TabId, HostedTab>>,
}

impl InProcessTabHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds or replaces a tab. A tab without a context models a surface
    /// content scripts cannot run in.
    pub fn open_tab(&self, info: TabInfo, context: Option<ContextHandle>) {
        self.tabs.rcu(|tabs| {
            let mut next = BTreeMap::clone(tabs);
            next.insert(
                info.id,
                HostedTab {
                    info: info.clone(),
                    context: context.clone(),
                },
            );
            next
        });
    }

    /// Removes the tab and hands back its context.
    ///
    /// A context stops on its own once the last clone of its handle is
    /// dropped. Call `shutdown` on the returned handle to wait for teardown.
    pub fn close_tab(&self, id: TabId) -> Option<ContextHandle> {
        let previous = self.tabs.rcu(|tabs| {
            let mut next = BTreeMap::clone(tabs);
            next.remove(&id);
            next
        });
        previous.get(&id).and_then(|tab| tab.context.clone())
    }

    pub fn context(&self, id: TabId) -> Option<ContextHandle> {
        self.tabs.load().get(&id).and_then(|tab| tab.context.clone())
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.load().keys().copied().collect()
    }
}

#[async_trait]
impl TabHost for InProcessTabHost {
    async fn list_tabs(&self) -> Vec<TabInfo> {
        self.tabs
            .load()
            .values()
            .map(|tab| tab.info.clone())
            .collect()
    }

    async fn send(&self, tab: TabId, request: ContextRequest) -> Option<ContextResponse> {
        let context = self.context(tab)?;
        match context.request(request).await {
            Ok(response) => Some(response),
            Err(err) => {
                debug!(%tab, error = %err, "tab context unreachable");
                None
            },
        }
    }
}
