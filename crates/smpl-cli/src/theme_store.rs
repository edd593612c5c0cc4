//! Theme persistence.
//!
//! The theme is stored as its index under a fixed key. A layered store tries
//! an optional shared ("sync") location first and always keeps a local copy
//! as fallback.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smpl_core::Theme;

/// On-disk shape of a theme file.
#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    #[serde(rename = "smpl-stopwatch-theme")]
    index: usize,
}

/// Somewhere a theme choice can be kept.
pub trait ThemeStore {
    /// Returns the stored theme, or `None` if nothing usable is stored.
    fn load(&self) -> Result<Option<Theme>>;
    fn save(&self, theme: Theme) -> Result<()>;
}

/// A theme stored in a JSON file.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.path.display()));
            }
        };
        let file: ThemeFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;

        match Theme::from_index(file.index) {
            Ok(theme) => Ok(Some(theme)),
            Err(err) => {
                tracing::warn!(path = ?self.path, error = %err, "ignoring stored theme");
                Ok(None)
            }
        }
    }

    fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("failed to create theme directory")?;
        }
        let json = serde_json::to_string_pretty(&ThemeFile {
            index: theme.index(),
        })
        .context("failed to serialize theme")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Primary store with a fallback that is always written.
pub struct LayeredThemeStore {
    primary: Option<Box<dyn ThemeStore>>,
    fallback: Box<dyn ThemeStore>,
}

impl LayeredThemeStore {
    pub fn new(primary: Option<Box<dyn ThemeStore>>, fallback: Box<dyn ThemeStore>) -> Self {
        Self { primary, fallback }
    }

    /// Builds the store described by `config`.
    pub fn from_config(config: &crate::Config) -> Self {
        let primary = config
            .sync_theme_path
            .as_ref()
            .map(|p| Box::new(FileThemeStore::new(p)) as Box<dyn ThemeStore>);
        Self::new(primary, Box::new(FileThemeStore::new(&config.theme_path)))
    }
}

impl ThemeStore for LayeredThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        if let Some(primary) = &self.primary {
            match primary.load() {
                Ok(Some(theme)) => return Ok(Some(theme)),
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %format!("{err:#}"), "primary theme store unavailable"),
            }
        }
        self.fallback.load()
    }

    fn save(&self, theme: Theme) -> Result<()> {
        if let Some(primary) = &self.primary {
            if let Err(err) = primary.save(theme) {
                tracing::warn!(error = %format!("{err:#}"), "failed to save theme to primary store");
            }
        }
        self.fallback.save(theme)
    }
}

/// Loads the stored theme, falling back to the default on any problem.
pub fn load_or_default(store: &dyn ThemeStore) -> Theme {
    match store.load() {
        Ok(theme) => theme.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "failed to load theme, using default");
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layered(dir: &Path) -> LayeredThemeStore {
        LayeredThemeStore::new(
            Some(Box::new(FileThemeStore::new(dir.join("sync/theme.json")))),
            Box::new(FileThemeStore::new(dir.join("local/theme.json"))),
        )
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThemeStore::new(dir.path().join("theme.json"));
        assert!(store.load().unwrap().is_none());
        assert_eq!(load_or_default(&store), Theme::SkyBlue);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThemeStore::new(dir.path().join("nested/theme.json"));
        store.save(Theme::Charcoal).unwrap();
        assert_eq!(store.load().unwrap(), Some(Theme::Charcoal));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(r#""smpl-stopwatch-theme": 5"#));
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        std::fs::write(&path, r#"{"smpl-stopwatch-theme": 42}"#).unwrap();
        let store = FileThemeStore::new(&path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_errors_but_default_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileThemeStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(load_or_default(&store), Theme::default());
    }

    #[test]
    fn test_layered_save_writes_both() {
        let dir = tempfile::tempdir().unwrap();
        layered(dir.path()).save(Theme::Gin).unwrap();

        let sync = FileThemeStore::new(dir.path().join("sync/theme.json"));
        let local = FileThemeStore::new(dir.path().join("local/theme.json"));
        assert_eq!(sync.load().unwrap(), Some(Theme::Gin));
        assert_eq!(local.load().unwrap(), Some(Theme::Gin));
    }

    #[test]
    fn test_layered_prefers_primary() {
        let dir = tempfile::tempdir().unwrap();
        FileThemeStore::new(dir.path().join("sync/theme.json"))
            .save(Theme::Frost)
            .unwrap();
        FileThemeStore::new(dir.path().join("local/theme.json"))
            .save(Theme::Slate)
            .unwrap();
        assert_eq!(layered(dir.path()).load().unwrap(), Some(Theme::Frost));
    }

    #[test]
    fn test_layered_falls_back_when_primary_empty_or_broken() {
        let dir = tempfile::tempdir().unwrap();
        FileThemeStore::new(dir.path().join("local/theme.json"))
            .save(Theme::Tangerine)
            .unwrap();
        assert_eq!(layered(dir.path()).load().unwrap(), Some(Theme::Tangerine));

        std::fs::create_dir_all(dir.path().join("sync")).unwrap();
        std::fs::write(dir.path().join("sync/theme.json"), "{").unwrap();
        assert_eq!(layered(dir.path()).load().unwrap(), Some(Theme::Tangerine));
    }

    #[test]
    fn test_layered_without_primary() {
        let dir = tempfile::tempdir().unwrap();
        let store = LayeredThemeStore::new(
            None,
            Box::new(FileThemeStore::new(dir.path().join("theme.json"))),
        );
        store.save(Theme::Biscay).unwrap();
        assert_eq!(store.load().unwrap(), Some(Theme::Biscay));
    }
}
