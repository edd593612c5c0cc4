//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Delay between display refreshes while running.
    pub frame_interval_ms: u64,
    /// Ring the terminal bell as haptic feedback.
    pub haptics: bool,
    /// Inhibit idle/sleep while the stopwatch runs.
    pub wake_lock: bool,
    /// Where the theme choice is stored.
    pub theme_path: PathBuf,
    /// Optional shared location tried before `theme_path`
    /// (e.g., a synced folder).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_theme_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            frame_interval_ms: 16,
            haptics: true,
            wake_lock: true,
            theme_path: data_dir.join("theme.json"),
            sync_theme_path: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // SMPL_FRAME_INTERVAL_MS, SMPL_HAPTICS, ...
        figment = figment.merge(Env::prefixed("SMPL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for smpl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("smpl"))
}

/// Returns the platform-specific data directory for smpl.
///
/// On Linux: `~/.local/share/smpl`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("smpl"))
}
