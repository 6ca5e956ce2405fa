//! Common constants used throughout masonjar.

/// Jar metadata file names, in lookup order
pub const METADATA_FILES: [&str; 4] =
    ["metadata.json", "metadata.toml", "metadata.yaml", "metadata.yml"];

/// Root-level files that are never instantiated
pub const SKIP_FILE_PATTERNS: [&str; 1] = ["metadata.*"];

/// Root-level directories that are never instantiated
pub const SKIP_DIR_PATTERNS: [&str; 1] = ["templates"];

/// Mode of a freshly created destination root (owner rwx)
pub const DESTINATION_MODE: u32 = 0o700;

/// Settings file names, in lookup order
pub const CONFIG_FILES: [&str; 4] =
    ["masonjar.yaml", "masonjar.yml", "masonjar.json", "masonjar.toml"];

/// Directory, relative to the home directory, holding settings, logs and the repository
pub const CONFIG_DIR: [&str; 2] = [".config", "masonjar"];

/// Default log file, relative to the masonjar home
pub const LOG_FILE: &str = "masonjar.log";

/// Local clone of the jar repository, relative to the masonjar home
pub const REPO_DIR: &str = "repo";

pub const DEFAULT_REPO_URL: &str = "https://github.com/asicsdigital/masonjars";

pub const DEFAULT_REPO_REMOTE: &str = "origin";

/// Environment overrides for settings
pub mod env {
    pub const REPO_URL: &str = "MASONJAR_REPO_URL";
    pub const REPO_REMOTE: &str = "MASONJAR_REPO_REMOTE";
    pub const LOG_FILE: &str = "MASONJAR_LOG_FILE";
}

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
