//! Color and sound settings, with partial-update merging

use serde::{Deserialize, Serialize};

/// Display settings shared by the floating window and the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppSettings {
    pub colors: ColorSettings,
    pub sounds: SoundSettings,
}

/// Background colors per running phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub running: String,
    pub warning: String,
    pub overtime: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            running: "#005500".to_string(),
            warning: "#550000".to_string(),
            overtime: "#000055".to_string(),
        }
    }
}

/// Which audio cues are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoundSettings {
    pub timer_start: bool,
    pub timer_end: bool,
    pub warning: bool,
    pub overtime: bool,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            timer_start: true,
            timer_end: true,
            warning: true,
            overtime: true,
        }
    }
}

/// Partial settings update; absent keys keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sounds: Option<SoundPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_end: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime: Option<bool>,
}

impl AppSettings {
    /// Merge a partial update; `colors` and `sounds` merge their own keys independently
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(colors) = patch.colors {
            self.colors.merge(colors);
        }
        if let Some(sounds) = patch.sounds {
            self.sounds.merge(sounds);
        }
    }

    /// Defaults with a partial update applied on top
    pub fn from_patch(patch: SettingsPatch) -> Self {
        let mut settings = Self::default();
        settings.merge(patch);
        settings
    }
}

impl ColorSettings {
    pub fn merge(&mut self, patch: ColorPatch) {
        if let Some(running) = patch.running {
            self.running = running;
        }
        if let Some(warning) = patch.warning {
            self.warning = warning;
        }
        if let Some(overtime) = patch.overtime {
            self.overtime = overtime;
        }
    }
}

impl SoundSettings {
    pub fn merge(&mut self, patch: SoundPatch) {
        if let Some(timer_start) = patch.timer_start {
            self.timer_start = timer_start;
        }
        if let Some(timer_end) = patch.timer_end {
            self.timer_end = timer_end;
        }
        if let Some(warning) = patch.warning {
            self.warning = warning;
        }
        if let Some(overtime) = patch.overtime {
            self.overtime = overtime;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_sound() {
        let settings = AppSettings::default();
        assert!(settings.sounds.timer_start);
        assert!(settings.sounds.timer_end);
        assert!(settings.sounds.warning);
        assert!(settings.sounds.overtime);
        assert_eq!(settings.colors.running, "#005500");
    }

    #[test]
    fn merge_keeps_unspecified_keys() {
        let mut settings = AppSettings::default();
        settings.merge(SettingsPatch {
            colors: Some(ColorPatch {
                warning: Some("#ff0000".to_string()),
                ..Default::default()
            }),
            sounds: Some(SoundPatch {
                overtime: Some(false),
                ..Default::default()
            }),
        });

        assert_eq!(settings.colors.warning, "#ff0000");
        assert_eq!(settings.colors.running, "#005500");
        assert_eq!(settings.colors.overtime, "#000055");
        assert!(!settings.sounds.overtime);
        assert!(settings.sounds.timer_start);
    }

    #[test]
    fn patch_parses_partial_json() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"sounds":{"timerEnd":false}}"#).unwrap();
        let settings = AppSettings::from_patch(patch);
        assert!(!settings.sounds.timer_end);
        assert!(settings.sounds.warning);
        assert_eq!(settings.colors, ColorSettings::default());
    }

    #[test]
    fn settings_use_camel_case_sound_keys() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        assert_eq!(json["sounds"]["timerStart"], true);
        assert_eq!(json["colors"]["overtime"], "#000055");
    }
}
