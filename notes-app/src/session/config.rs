// Data directory layout for the notes application
// Handles paths for notes, themes, fonts, the user registry, and the shared
// .system directory used for heartbeats and command slots

use std::path::PathBuf;

/// Configuration for application data paths
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for all durable application data
    pub data_dir: PathBuf,
}

impl Config {
    /// Create configuration using default paths
    pub fn default_paths() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
        }
    }

    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        // INFINITY_NOTES_DATA_DIR overrides the data directory entirely
        if let Ok(override_dir) = std::env::var("INFINITY_NOTES_DATA_DIR") {
            return Self {
                data_dir: PathBuf::from(override_dir),
            };
        }

        Self::default_paths()
    }

    /// Get the default data directory
    fn default_data_dir() -> PathBuf {
        // All platforms: ~/.infinity-notes/ (or /tmp/infinity-notes if home unavailable)
        dirs::home_dir()
            .map(|h| h.join(".infinity-notes"))
            .unwrap_or_else(|| PathBuf::from("/tmp/infinity-notes"))
    }

    /// Root of all note storage, one subdirectory per user
    pub fn notes_dir(&self) -> PathBuf {
        self.data_dir.join("notes")
    }

    /// Note directory for a specific user
    pub fn user_notes_dir(&self, username: &str) -> PathBuf {
        self.notes_dir().join(username)
    }

    /// Directory holding heartbeat markers and command slots.
    ///
    /// This directory is the rendezvous point shared by every running
    /// session; it lives under the notes root so that sharing the notes
    /// folder (e.g. over a synced drive) shares presence too.
    pub fn system_dir(&self) -> PathBuf {
        self.notes_dir().join(".system")
    }

    /// Directory for theme definitions
    pub fn themes_dir(&self) -> PathBuf {
        self.data_dir.join("themes")
    }

    /// Directory for bundled fonts
    pub fn fonts_dir(&self) -> PathBuf {
        self.data_dir.join("fonts")
    }

    /// Path to the flat-file user registry
    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    /// Path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    /// Ensure all data directories exist
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [
            self.data_dir.clone(),
            self.notes_dir(),
            self.system_dir(),
            self.themes_dir(),
            self.fonts_dir(),
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_layout() {
        let config = Config {
            data_dir: PathBuf::from("/test/data"),
        };

        assert_eq!(config.notes_dir(), PathBuf::from("/test/data/notes"));
        assert_eq!(
            config.user_notes_dir("alice"),
            PathBuf::from("/test/data/notes/alice")
        );
        assert_eq!(
            config.system_dir(),
            PathBuf::from("/test/data/notes/.system")
        );
        assert_eq!(config.users_file(), PathBuf::from("/test/data/users.json"));
        assert_eq!(
            config.settings_file(),
            PathBuf::from("/test/data/settings.json")
        );
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().join("app"),
        };

        config.ensure_dirs().unwrap();

        assert!(config.notes_dir().is_dir());
        assert!(config.system_dir().is_dir());
        assert!(config.themes_dir().is_dir());
        assert!(config.fonts_dir().is_dir());
    }

    #[test]
    fn test_system_dir_lives_under_notes() {
        let config = Config {
            data_dir: PathBuf::from("/test/data"),
        };
        assert!(config.system_dir().starts_with(config.notes_dir()));
    }
}
