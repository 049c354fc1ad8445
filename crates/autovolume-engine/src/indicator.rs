//! Rendering collaborator for adjustment feedback.
//!
//! Calls are fire-and-forget: the engine never looks at what a sink did. Sinks
//! run on the context's pass and must return promptly; wrap anything that
//! draws, waits or does I/O in a [`QueuedIndicator`].

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{info, warn};

use autovolume_core::AdjustmentKind;

use crate::types::{IndicatorAnchor, IndicatorEvent};

pub trait IndicatorSink: Send + Sync {
    /// Must not block.
    fn show_adjustment(&self, event: IndicatorEvent);

    /// Shown a while after a boost had to stop at 100%.
    fn show_system_volume_hint(&self, anchor: IndicatorAnchor) {
        let _ = anchor;
    }
}

/// Writes indicator events to the log instead of drawing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogIndicator;

impl IndicatorSink for LogIndicator {
    fn show_adjustment(&self, event: IndicatorEvent) {
        let verb = match event.kind {
            AdjustmentKind::Boost => "boosted",
            AdjustmentKind::Reduce => "reduced",
            AdjustmentKind::None => return,
        };
        info!(anchor = ?event.anchor, level = event.level_percent, "volume {verb}");
    }

    fn show_system_volume_hint(&self, anchor: IndicatorAnchor) {
        info!(?anchor, "web volume at 100%, check system volume for louder audio");
    }
}

enum IndicatorCall {
    Adjustment(IndicatorEvent),
    SystemHint(IndicatorAnchor),
}

/// Queues calls for a background task that feeds them, in order, to a sink
/// allowed to block.
///
/// Sending never waits. The task ends when the queue is dropped.
pub struct QueuedIndicator {
    tx: mpsc::UnboundedSender<IndicatorCall>,
}

impl QueuedIndicator {
    pub fn new(sink: Arc<dyn IndicatorSink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<IndicatorCall>();
        autovolume_runtime::spawn(async move {
            while let Some(call) = rx.recv().await {
                let sink = Arc::clone(&sink);
                let delivered = tokio::task::spawn_blocking(move || match call {
                    IndicatorCall::Adjustment(event) => sink.show_adjustment(event),
                    IndicatorCall::SystemHint(anchor) => sink.show_system_volume_hint(anchor),
                })
                .await;
                if let Err(err) = delivered {
                    warn!(error = %err, "indicator sink failed");
                }
            }
        });
        Self { tx }
    }
}

impl IndicatorSink for QueuedIndicator {
    fn show_adjustment(&self, event: IndicatorEvent) {
        let _ = self.tx.send(IndicatorCall::Adjustment(event));
    }

    fn show_system_volume_hint(&self, anchor: IndicatorAnchor) {
        let _ = self.tx.send(IndicatorCall::SystemHint(anchor));
    }
}

/// Keeps every indicator call for later inspection.
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    adjustments: Mutex<Vec<IndicatorEvent>>,
    hints: Mutex<Vec<IndicatorAnchor>>,
}

impl RecordingIndicator {
    pub fn adjustments(&self) -> Vec<IndicatorEvent> {
        self.adjustments.lock().clone()
    }

    pub fn hints(&self) -> Vec<IndicatorAnchor> {
        self.hints.lock().clone()
    }
}

impl IndicatorSink for RecordingIndicator {
    fn show_adjustment(&self, event: IndicatorEvent) {
        self.adjustments.lock().push(event);
    }

    fn show_system_volume_hint(&self, anchor: IndicatorAnchor) {
        self.hints.lock().push(anchor);
    }
}
