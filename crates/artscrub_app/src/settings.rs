// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player settings.
//!
//! Settings live in a RON file next to the keyframe document:
//! - Path of the keyframe document
//! - Playback timing (frame rate, easing length, frames held per stop)
//! - Pointer interaction defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "artscrub.ron";

/// Default keyframe document name
pub const DATA_FILE_NAME: &str = "data.json";

/// Settings load/save error
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed settings file
    #[error("Invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Settings could not be written as RON
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

/// Frame timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Ticks per second of the render loop
    pub frame_rate: f32,
    /// Time for a change to settle, in seconds
    pub easing_seconds: f32,
    /// Frames rendered at each scrub stop during `play`
    pub hold_frames: u32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            easing_seconds: 0.2,
            hold_frames: 12,
        }
    }
}

impl PlaybackSettings {
    /// Easing length converted to whole frames
    pub fn easing_frames(&self) -> u32 {
        let frames = (self.easing_seconds * self.frame_rate).round();
        if frames.is_finite() && frames > 0.0 {
            frames as u32
        } else {
            0
        }
    }
}

/// Pointer interaction defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Whether series without an explicit flag can be dragged
    pub draggable_by_default: bool,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            draggable_by_default: true,
        }
    }
}

/// All player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Format version
    pub version: u32,
    /// Keyframe document, relative to the working directory
    pub data_path: PathBuf,
    /// Frame timing
    pub playback: PlaybackSettings,
    /// Pointer interaction
    pub interaction: InteractionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            data_path: PathBuf::from(DATA_FILE_NAME),
            playback: PlaybackSettings::default(),
            interaction: InteractionSettings::default(),
        }
    }
}

impl Settings {
    /// Serialize to RON string
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON string
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&contents)?;
        if settings.version != SETTINGS_FORMAT_VERSION {
            tracing::warn!(
                "Settings version {} differs from supported version {}",
                settings.version,
                SETTINGS_FORMAT_VERSION
            );
        }
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.data_path, PathBuf::from("data.json"));
        assert_eq!(settings.playback.easing_frames(), 12);
        assert!(settings.interaction.draggable_by_default);
    }

    #[test]
    fn test_serialization() {
        let mut settings = Settings::default();
        settings.playback.frame_rate = 30.0;
        settings.data_path = PathBuf::from("series/data.json");
        let ron_str = settings.to_ron().unwrap();
        let loaded = Settings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.playback.easing_frames(), 6);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded = Settings::from_ron("(playback: (hold_frames: 3))").unwrap();
        assert_eq!(loaded.playback.hold_frames, 3);
        assert_eq!(loaded.playback.frame_rate, 60.0);
        assert_eq!(loaded.data_path, PathBuf::from(DATA_FILE_NAME));
    }

    #[test]
    fn test_easing_frames_never_negative() {
        let playback = PlaybackSettings {
            easing_seconds: -1.0,
            ..PlaybackSettings::default()
        };
        assert_eq!(playback.easing_frames(), 0);
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        assert_eq!(Settings::load_or_default(&path).unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.interaction.draggable_by_default = false;
        settings.save(&path).unwrap();
        assert_eq!(Settings::load_or_default(&path).unwrap(), settings);

        std::fs::write(&path, "(playback: oops").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse(_))));
    }
}
