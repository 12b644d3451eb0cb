use std::path::Path;

use crate::error::SettingsError;
use crate::game::Chip;

/// User settings persisted between sessions, loadable from TOML.
///
/// These live outside the engine; the presentation layer pushes the relevant
/// values into the engine when it receives `GameReset`, so a change takes
/// effect at the start of the next game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Suppress sound cues in the presentation layer.
    pub sound_muted: bool,
    /// Whether the opponent is the computer rather than a second human.
    pub opponent_is_computer: bool,
    /// Which chip the opponent plays; the first (human) player gets the other.
    pub opponent_chip_yellow: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sound_muted: false,
            opponent_is_computer: true,
            opponent_chip_yellow: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist settings as TOML.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| SettingsError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The chip the first (human) player moves with: the opposite of the
    /// opponent's color.
    pub fn first_player_chip(&self) -> Chip {
        if self.opponent_chip_yellow {
            Chip::Red
        } else {
            Chip::Yellow
        }
    }
}
