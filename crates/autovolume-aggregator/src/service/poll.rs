use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use autovolume_core::{
    AdjustmentKind, ContextRequest, ContextResponse, Settings, TabId, decide, level_to_percent,
};

use crate::host::TabHost;

/// What one poll cycle saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Tabs a volume request was sent to.
    pub queried: usize,
    /// Tabs that answered with media; these are the directory entries.
    pub with_media: usize,
    /// Tabs sent an adjustment command.
    pub adjusted: usize,
    /// Directory entries removed this cycle.
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TabPoll {
    Media {
        volume_percent: i64,
        adjustment: AdjustmentKind,
    },
    NoMedia,
    Unreachable,
}

/// Queries one tab and, when its loudest level is out of band, sends it the
/// matching adjustment command.
pub(crate) async fn poll_tab(
    host: &dyn TabHost,
    tab: TabId,
    settings: Settings,
    timeout: Duration,
) -> TabPoll {
    let Some(response) = send_bounded(host, tab, ContextRequest::GetCurrentVolume, timeout).await
    else {
        return TabPoll::Unreachable;
    };
    let Some(report) = response.into_volume() else {
        return TabPoll::Unreachable;
    };
    if !report.has_media {
        return TabPoll::NoMedia;
    }

    let volume_percent = level_to_percent(report.volume);
    let decision = decide(report.volume, settings.min_volume, settings.max_volume);
    if !decision.is_none() {
        let command = ContextRequest::AdjustVolume {
            target_volume: decision.target_percent(),
            adjustment_type: decision.kind,
        };
        // The reply only acknowledges receipt; the next poll shows the result.
        let acked = send_bounded(host, tab, command, timeout).await.is_some();
        info!(
            %tab,
            kind = decision.kind.as_str(),
            from = volume_percent,
            to = decision.target_percent(),
            acked,
            "tab volume adjustment sent"
        );
    }
    TabPoll::Media {
        volume_percent,
        adjustment: decision.kind,
    }
}

pub(crate) async fn send_bounded(
    host: &dyn TabHost,
    tab: TabId,
    request: ContextRequest,
    timeout: Duration,
) -> Option<ContextResponse> {
    let kind = request.kind();
    match tokio::time::timeout(timeout, host.send(tab, request)).await {
        Ok(response) => response,
        Err(_) => {
            debug!(%tab, request = kind, "tab request timed out");
            None
        },
    }
}

pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
