//! Shared data model for content contexts and the aggregator.
//!
//! Both sides run the same [`normalize::decide`] so a source corrected locally
//! and a tab corrected remotely end up at the same level.

pub mod normalize;
pub mod protocol;
pub mod settings;
pub mod tab;

pub use normalize::{
    AdjustmentDecision, AdjustmentKind, clamp_level, decide, level_to_percent, percent_to_level,
};
pub use protocol::{
    AggregatorRequest, AggregatorResponse, ContextRequest, ContextResponse, VolumeReport,
};
pub use settings::{Settings, SettingsPatch};
pub use tab::{TabId, TabInfo, TabSnapshot, TabStatus};
