//! Messages exchanged between the aggregator, content contexts and the popup.
//!
//! Every enum is internally tagged with a `type` field in
//! `SCREAMING_SNAKE_CASE`, which is the layout the extension transport uses.

use serde::{Deserialize, Serialize};

use crate::normalize::AdjustmentKind;
use crate::settings::Settings;
use crate::tab::TabSnapshot;

/// Requests a content context answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextRequest {
    GetCurrentVolume,
    #[serde(rename_all = "camelCase")]
    AdjustVolume {
        /// Whole percent the context should move its sources to.
        target_volume: i64,
        adjustment_type: AdjustmentKind,
    },
    SettingsUpdated {
        settings: Settings,
    },
}

impl ContextRequest {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GetCurrentVolume => "GET_CURRENT_VOLUME",
            Self::AdjustVolume { .. } => "ADJUST_VOLUME",
            Self::SettingsUpdated { .. } => "SETTINGS_UPDATED",
        }
    }
}

/// Summary of a context's media, answered to `GET_CURRENT_VOLUME`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeReport {
    /// Loudest counted level, linear.
    pub volume: f64,
    pub has_media: bool,
    pub is_at_max_volume: bool,
    pub total_elements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextResponse {
    Volume(VolumeReport),
    Ack { success: bool },
}

impl ContextResponse {
    pub fn ack() -> Self {
        Self::Ack { success: true }
    }

    pub fn into_volume(self) -> Option<VolumeReport> {
        match self {
            Self::Volume(report) => Some(report),
            Self::Ack { .. } => None,
        }
    }
}

/// Requests the aggregator answers on behalf of the popup surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregatorRequest {
    SettingsUpdated { settings: Settings },
    GetSettings,
    GetAllTabVolumes,
    EnableExtension,
    DisableExtension,
    UpdateMinVolume { value: i32 },
    UpdateMaxVolume { value: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregatorResponse {
    Settings(Settings),
    TabVolumes(Vec<TabSnapshot>),
    Ack {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl AggregatorResponse {
    pub fn ack() -> Self {
        Self::Ack {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Ack {
            success: false,
            error: Some(error.into()),
        }
    }
}
