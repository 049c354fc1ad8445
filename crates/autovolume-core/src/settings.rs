use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_VOLUME: i32 = 20;
pub const DEFAULT_MAX_VOLUME: i32 = 80;

/// Normalization settings shared by every engine instance.
///
/// Bounds are whole percents and nominally lie in `0..=100` with
/// `min_volume <= max_volume`. The engine tolerates violations without
/// rewriting them; keeping them sane is the settings editor's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub enabled: bool,
    pub min_volume: i32,
    pub max_volume: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_volume: DEFAULT_MIN_VOLUME,
            max_volume: DEFAULT_MAX_VOLUME,
        }
    }
}

impl Settings {
    pub fn with_band(min_volume: i32, max_volume: i32) -> Self {
        Self {
            min_volume,
            max_volume,
            ..Self::default()
        }
    }

    pub fn merged(self, patch: &SettingsPatch) -> Self {
        Self {
            enabled: patch.enabled.unwrap_or(self.enabled),
            min_volume: patch.min_volume.unwrap_or(self.min_volume),
            max_volume: patch.max_volume.unwrap_or(self.max_volume),
        }
    }
}

/// Partial settings update, as written by `set(partial)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_volume: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_volume: Option<i32>,
}

impl SettingsPatch {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub fn min_volume(value: i32) -> Self {
        Self {
            min_volume: Some(value),
            ..Self::default()
        }
    }

    pub fn max_volume(value: i32) -> Self {
        Self {
            max_volume: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.min_volume.is_none() && self.max_volume.is_none()
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            enabled: Some(settings.enabled),
            min_volume: Some(settings.min_volume),
            max_volume: Some(settings.max_volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, SettingsPatch};

    #[test]
    fn defaults_match_persisted_layout() {
        let settings: Settings = serde_json::from_str("{}").expect("parse empty settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(
            serde_json::to_value(settings).expect("serialize settings"),
            serde_json::json!({ "enabled": true, "minVolume": 20, "maxVolume": 80 })
        );
    }

    #[test]
    fn partial_layout_keeps_missing_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"maxVolume": 65}"#).expect("parse partial settings");
        assert_eq!(settings, Settings::with_band(20, 65));
    }

    #[test]
    fn patch_overrides_only_present_fields() {
        let base = Settings::with_band(30, 70);
        let merged = base.merged(&SettingsPatch::enabled(false));
        assert_eq!(
            merged,
            Settings {
                enabled: false,
                min_volume: 30,
                max_volume: 70,
            }
        );
        assert_eq!(base.merged(&SettingsPatch::default()), base);
    }

    #[test]
    fn out_of_range_values_are_kept_verbatim() {
        let settings: Settings =
            serde_json::from_str(r#"{"minVolume": 90, "maxVolume": 10}"#).expect("parse");
        assert_eq!(settings.min_volume, 90);
        assert_eq!(settings.max_volume, 10);
    }
}
