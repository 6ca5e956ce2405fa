//! Settings handling for masonjar.
//! Settings are read from `masonjar.yaml` (or `.yml`, `.json`, `.toml`) in the
//! masonjar home, then overridden by `MASONJAR_*` environment variables and
//! finally by command-line flags.

use crate::constants::{
    env, CONFIG_DIR, CONFIG_FILES, DEFAULT_REPO_REMOTE, DEFAULT_REPO_URL, LOG_FILE, REPO_DIR,
};
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Resolved masonjar settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Where `update` clones the jar repository from.
    pub repo_url: String,
    /// Remote pulled by `update` once the repository is cloned.
    pub repo_remote: String,
    /// Log file; `masonjar.log` in the masonjar home when unset.
    pub log_file: Option<PathBuf>,
    /// Directory holding the settings file and the repository clone.
    #[serde(skip)]
    pub home_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            repo_remote: DEFAULT_REPO_REMOTE.to_string(),
            log_file: None,
            home_dir: PathBuf::new(),
        }
    }
}

/// The default masonjar home, `~/.config/masonjar`.
pub fn default_home_dir() -> Result<PathBuf> {
    let base = directories::BaseDirs::new()
        .ok_or_else(|| Error::ConfigError("unable to determine the home directory".into()))?;
    Ok(CONFIG_DIR.iter().fold(base.home_dir().to_path_buf(), |path, part| path.join(part)))
}

impl Settings {
    /// Parses settings content, choosing the format from the file extension.
    pub fn parse(content: &str, config_path: &Path) -> Result<Self> {
        let parsed = match config_path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
            _ => serde_yaml::from_str::<Option<Self>>(content)
                .map(Option::unwrap_or_default)
                .map_err(|e| e.to_string()),
        };

        parsed.map_err(|e| {
            Error::ConfigError(format!("invalid settings file '{}': {e}", config_path.display()))
        })
    }

    /// Loads settings.
    ///
    /// # Arguments
    /// * `config_file` - Explicit settings file; it must exist
    /// * `home_dir` - Directory searched for the default settings files when
    ///   `config_file` is not given
    ///
    /// A missing default file is not an error: defaults are used. The
    /// masonjar home is the directory of the settings file.
    pub fn load(config_file: Option<&Path>, home_dir: &Path) -> Result<Self> {
        let (config_path, home_dir) = match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(Error::ConfigError(format!(
                        "settings file '{}' does not exist",
                        path.display()
                    )));
                }
                let home = path.parent().map(Path::to_path_buf).unwrap_or_default();
                (Some(path.to_path_buf()), home)
            }
            None => {
                let found = CONFIG_FILES
                    .iter()
                    .map(|file_name| home_dir.join(file_name))
                    .find(|path| path.is_file());
                (found, home_dir.to_path_buf())
            }
        };

        let mut settings = match &config_path {
            Some(path) => {
                debug!("Using settings file '{}'", path.display());
                let content = std::fs::read_to_string(path)?;
                Self::parse(&content, path)?
            }
            None => {
                debug!("No settings file found in '{}', using defaults", home_dir.display());
                Self::default()
            }
        };
        settings.home_dir = home_dir;
        Ok(settings)
    }

    /// Applies `MASONJAR_*` overrides read through `lookup`.
    pub fn merge_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::REPO_URL) {
            self.repo_url = url;
        }
        if let Some(remote) = lookup(env::REPO_REMOTE) {
            self.repo_remote = remote;
        }
        if let Some(log_file) = lookup(env::LOG_FILE) {
            self.log_file = Some(PathBuf::from(log_file));
        }
        self
    }

    /// The configured log file, or `masonjar.log` in the masonjar home.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| self.home_dir.join(LOG_FILE))
    }

    /// Local clone of the jar repository.
    pub fn repo_dir(&self) -> PathBuf {
        self.home_dir.join(REPO_DIR)
    }
}
