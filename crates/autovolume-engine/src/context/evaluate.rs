use autovolume_core::{AdjustmentDecision, Settings, decide, level_to_percent};

use crate::applier::AdjustmentApplier;
use crate::error::SourceError;
use crate::source::MediaSource;
use crate::types::{IndicatorAnchor, SourceKey, SourceKind};

/// An adjustment that was written to a source.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Applied {
    pub(crate) from_percent: i64,
    pub(crate) decision: AdjustmentDecision,
}

/// Decides and applies one source under `settings`.
///
/// Disabled settings and muted sources are left alone. Errors mean the source
/// is gone or refused access and should be evicted.
pub(crate) fn evaluate_source(
    settings: &Settings,
    source: &dyn MediaSource,
    applier: &mut AdjustmentApplier,
    anchor: IndicatorAnchor,
) -> Result<Option<Applied>, SourceError> {
    if !settings.enabled || source.is_muted() {
        return Ok(None);
    }
    let level = source.level()?;
    let decision = decide(level, settings.min_volume, settings.max_volume);
    if !applier.apply(source, &decision, anchor)? {
        return Ok(None);
    }
    Ok(Some(Applied {
        from_percent: level_to_percent(level),
        decision,
    }))
}

/// Elements anchor to themselves; gain nodes borrow `related` or float.
pub(crate) fn anchor_for(source: &dyn MediaSource, related: Option<SourceKey>) -> IndicatorAnchor {
    match source.kind() {
        SourceKind::Audio | SourceKind::Video => IndicatorAnchor::Source(source.key()),
        SourceKind::Gain => related.map_or(IndicatorAnchor::Floating, IndicatorAnchor::Source),
    }
}
