// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use dirs_next::config_dir;
use hullcheck_engine::QueryConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub query: QueryConfig,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            query: QueryConfig::default(),
            logging: LoggingSettings {
                level: String::from("info"),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not write settings: {0}")]
    Write(#[from] toml::ser::Error),

    #[error("invalid query settings: {0}")]
    Query(#[from] hullcheck_engine::CollisionError),

    #[error("no configuration directory on this platform")]
    ConfigDirNotFound,
}

/// Where the editable user settings and the pristine defaults live.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsPaths {
    pub user: PathBuf,
    pub defaults: PathBuf,
}

impl SettingsPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            user: dir.join("user_settings.toml"),
            defaults: dir.join("default_settings.toml"),
        }
    }

    /// `<config_dir>/hullcheck/settings/`.
    pub fn locate() -> Result<Self, SettingsError> {
        let config_dir = config_dir().ok_or(SettingsError::ConfigDirNotFound)?;
        Ok(Self::in_dir(&config_dir.join("hullcheck").join("settings")))
    }
}

fn is_missing(error: &SettingsError) -> bool {
    matches!(error, SettingsError::Io(e) if e.kind() == ErrorKind::NotFound)
}

impl Settings {
    /// Reads a settings file and checks its query limits.
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(&fs::read_to_string(path)?)?;
        settings.query.validate()?;
        Ok(settings)
    }

    /// Writes the settings as TOML, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Settings from the platform config directory. Never fails; anything unusable degrades to
    /// the built-in defaults.
    pub fn load_user_settings() -> Settings {
        match SettingsPaths::locate().and_then(|paths| Settings::load_or_init(&paths)) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Using built-in settings: {}", e);
                Settings::default()
            }
        }
    }

    /// Loads the user file. When it is missing or broken the defaults file replaces it, and when
    /// that is missing too the built-in defaults are written out as both.
    pub fn load_or_init(paths: &SettingsPaths) -> Result<Self, SettingsError> {
        match Settings::load_from_file(&paths.user) {
            Ok(settings) => return Ok(settings),
            Err(e) if is_missing(&e) => {}
            Err(e) => eprintln!("Ignoring {}: {}", paths.user.display(), e),
        }

        let settings = match Settings::load_from_file(&paths.defaults) {
            Ok(settings) => settings,
            Err(e) if is_missing(&e) => {
                let settings = Settings::default();
                settings.save_to_file(&paths.defaults)?;
                settings
            }
            Err(e) => return Err(e),
        };
        settings.save_to_file(&paths.user)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::tempdir;

    /// Points dirs-next at a temporary directory and restores the environment afterwards.
    struct ConfigDirGuard {
        home: Option<String>,
        xdg_config_home: Option<String>,
    }

    impl ConfigDirGuard {
        fn new(dir: &Path) -> Self {
            let guard = Self {
                home: env::var("HOME").ok(),
                xdg_config_home: env::var("XDG_CONFIG_HOME").ok(),
            };
            env::set_var("HOME", dir);
            env::set_var("XDG_CONFIG_HOME", dir);
            guard
        }
    }

    impl Drop for ConfigDirGuard {
        fn drop(&mut self) {
            for (key, value) in [
                ("HOME", &self.home),
                ("XDG_CONFIG_HOME", &self.xdg_config_home),
            ] {
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn locate_uses_the_config_dir() {
        let temp_dir = tempdir().unwrap();
        let _guard = ConfigDirGuard::new(temp_dir.path());

        let settings_dir = temp_dir.path().join("hullcheck").join("settings");
        assert_eq!(
            SettingsPaths::locate().unwrap(),
            SettingsPaths::in_dir(&settings_dir)
        );
    }

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn load_user_settings_initializes_the_config_dir() {
        let temp_dir = tempdir().unwrap();
        let _guard = ConfigDirGuard::new(temp_dir.path());

        assert_eq!(Settings::load_user_settings(), Settings::default());
        let paths = SettingsPaths::locate().unwrap();
        assert!(paths.user.exists());
        assert!(paths.defaults.exists());
    }

    #[test]
    fn load_from_valid_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.toml");
        let content = r#"
            [query]
            gjk_max_iterations = 32
            epa_max_iterations = 500
            epa_tolerance = 0.0001

            [logging]
            level = "debug"
        "#;
        fs::write(&path, content).unwrap();

        let settings = Settings::load_from_file(&path).unwrap();
        assert_eq!(settings.query.gjk_max_iterations, 32);
        assert_eq!(settings.query.epa_max_iterations, 500);
        assert_eq!(settings.query.epa_tolerance, 0.0001);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn load_rejects_invalid_query_limits() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "[query]\nepa_max_iterations = 0\n\n[logging]\nlevel = \"info\"\n").unwrap();

        assert!(matches!(
            Settings::load_from_file(&path),
            Err(SettingsError::Query(_))
        ));
    }

    #[test]
    fn load_from_malformed_file_fails() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "[query\nnot toml").unwrap();

        assert!(matches!(
            Settings::load_from_file(&path),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.logging.level = String::from("trace");
        settings.query.epa_tolerance = 0.01;
        settings.save_to_file(&path).unwrap();

        assert_eq!(Settings::load_from_file(&path).unwrap(), settings);
    }

    #[test]
    fn missing_files_are_written_from_built_in_defaults() {
        let temp_dir = tempdir().unwrap();
        let paths = SettingsPaths::in_dir(&temp_dir.path().join("settings"));

        assert_eq!(Settings::load_or_init(&paths).unwrap(), Settings::default());
        assert_eq!(Settings::load_from_file(&paths.user).unwrap(), Settings::default());
        assert_eq!(
            Settings::load_from_file(&paths.defaults).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn existing_user_settings_win() {
        let temp_dir = tempdir().unwrap();
        let paths = SettingsPaths::in_dir(temp_dir.path());

        let mut user = Settings::default();
        user.query.gjk_max_iterations = 8;
        user.save_to_file(&paths.user).unwrap();

        assert_eq!(Settings::load_or_init(&paths).unwrap(), user);
        assert!(!paths.defaults.exists());
    }

    #[test]
    fn corrupted_user_settings_fall_back_to_defaults_file() {
        let temp_dir = tempdir().unwrap();
        let paths = SettingsPaths::in_dir(temp_dir.path());

        let mut defaults = Settings::default();
        defaults.logging.level = String::from("warn");
        defaults.save_to_file(&paths.defaults).unwrap();
        fs::write(&paths.user, "garbage = [").unwrap();

        assert_eq!(Settings::load_or_init(&paths).unwrap(), defaults);
        // The defaults file replaced the broken user file.
        assert_eq!(Settings::load_from_file(&paths.user).unwrap(), defaults);
    }

    #[test]
    fn broken_defaults_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let paths = SettingsPaths::in_dir(temp_dir.path());
        fs::write(&paths.defaults, "[query]\ngjk_max_iterations = 0\n[logging]\nlevel = \"info\"\n")
            .unwrap();

        assert!(matches!(
            Settings::load_or_init(&paths),
            Err(SettingsError::Query(_))
        ));
    }
}
