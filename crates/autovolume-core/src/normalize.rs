use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    None,
    Boost,
    Reduce,
}

impl AdjustmentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Boost => "boost",
            Self::Reduce => "reduce",
        }
    }
}

/// Outcome of comparing one level against the configured band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentDecision {
    /// Level to write, always within `[0, 1]`. For [`AdjustmentKind::None`]
    /// this is the observed level, clamped.
    pub target_level: f64,
    pub kind: AdjustmentKind,
}

impl AdjustmentDecision {
    pub fn none(current_level: f64) -> Self {
        Self {
            target_level: clamp_level(current_level),
            kind: AdjustmentKind::None,
        }
    }

    pub fn boost(target_level: f64) -> Self {
        Self {
            target_level: clamp_level(target_level),
            kind: AdjustmentKind::Boost,
        }
    }

    pub fn reduce(target_level: f64) -> Self {
        Self {
            target_level: clamp_level(target_level),
            kind: AdjustmentKind::Reduce,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == AdjustmentKind::None
    }

    pub fn target_percent(&self) -> i64 {
        level_to_percent(self.target_level)
    }
}

/// Rounds a linear level to a whole percent, halves rounding up.
pub fn level_to_percent(level: f64) -> i64 {
    if !level.is_finite() {
        return 0;
    }
    (level * 100.0 + 0.5).floor() as i64
}

pub fn percent_to_level(percent: i64) -> f64 {
    clamp_level(percent as f64 / 100.0)
}

/// Clamps a linear level into `[0, 1]`; NaN reads as silence.
pub fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 1.0)
}

/// Decides whether `current_level` needs correcting into `[min_percent, max_percent]`.
///
/// The lower bound is checked first, so an inverted band (`min > max`) still
/// produces a deterministic answer. With `min == max` every out-of-band level
/// is pinned to that single value.
pub fn decide(current_level: f64, min_percent: i32, max_percent: i32) -> AdjustmentDecision {
    let percent = level_to_percent(current_level);
    if percent < i64::from(min_percent) {
        AdjustmentDecision::boost(f64::from(min_percent) / 100.0)
    } else if percent > i64::from(max_percent) {
        AdjustmentDecision::reduce(f64::from(max_percent) / 100.0)
    } else {
        AdjustmentDecision::none(current_level)
    }
}
