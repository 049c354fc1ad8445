//! Writes adjustment decisions to sources and tells the indicator about them.
//!
//! The written level is the band edge itself, so re-deciding the source right
//! after a write yields no adjustment. The change notification that every
//! write produces therefore settles after one re-evaluation.

use std::sync::Arc;
use std::time::Duration;

use autovolume_core::{AdjustmentDecision, AdjustmentKind};
use autovolume_runtime::timer::{TimerHandle, run_after};

use crate::error::SourceError;
use crate::indicator::IndicatorSink;
use crate::source::MediaSource;
use crate::types::{IndicatorAnchor, IndicatorEvent};

pub struct AdjustmentApplier {
    indicator: Arc<dyn IndicatorSink>,
    hint_delay: Duration,
    pending_hint: Option<TimerHandle>,
}

impl AdjustmentApplier {
    pub fn new(indicator: Arc<dyn IndicatorSink>, hint_delay: Duration) -> Self {
        Self {
            indicator,
            hint_delay,
            pending_hint: None,
        }
    }

    /// Sets the source to `decision.target_level`.
    ///
    /// Callers have already checked that the source is live and unmuted.
    /// Returns `Ok(false)` when the decision asks for nothing.
    pub fn apply(
        &mut self,
        source: &dyn MediaSource,
        decision: &AdjustmentDecision,
        anchor: IndicatorAnchor,
    ) -> Result<bool, SourceError> {
        if decision.is_none() {
            return Ok(false);
        }
        source.set_level(decision.target_level)?;

        let level_percent = decision.target_percent();
        self.indicator.show_adjustment(IndicatorEvent {
            anchor,
            kind: decision.kind,
            level_percent,
        });
        if decision.kind == AdjustmentKind::Boost && level_percent >= 100 {
            self.schedule_system_hint(anchor);
        }
        Ok(true)
    }

    pub fn has_pending_hint(&self) -> bool {
        self.pending_hint
            .as_ref()
            .is_some_and(|hint| !hint.is_finished())
    }

    pub fn cancel_pending(&mut self) {
        if let Some(hint) = self.pending_hint.take() {
            hint.cancel();
        }
    }

    fn schedule_system_hint(&mut self, anchor: IndicatorAnchor) {
        let indicator = Arc::clone(&self.indicator);
        // Replacing the handle aborts the earlier hint.
        self.pending_hint = Some(run_after(self.hint_delay, move || {
            indicator.show_system_volume_hint(anchor);
        }));
    }
}
