//! Error handling for masonjar.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for masonjar operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A candidate directory has no readable, parseable metadata file.
    #[error("'{path}' is not a valid jar directory: {reason}.")]
    InvalidJar { path: String, reason: String },

    #[error("Cannot read jar repository '{repo_dir}': {source}.")]
    RepoUnreadable {
        repo_dir: String,
        #[source]
        source: io::Error,
    },

    #[error("Cannot create destination directory '{destination}': {source}.")]
    DestinationCreateFailed {
        destination: String,
        #[source]
        source: io::Error,
    },

    /// A single path failed while walking a jar.
    #[error("Cannot process the jar path: '{path}'. Original error: {e}")]
    PathVisitFailed { path: String, e: String },

    #[error("Unable to find a jar matching '{jar}'. Use `masonjar list` to list available jars.")]
    NoMatch { jar: String },

    #[error("Jar opened into '{destination}' with {failures} failed path(s); the copy is incomplete.")]
    IncompleteInstantiation { destination: String, failures: usize },

    #[error("Invalid identifier '{identifier}': {reason}.")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Repository sync error: {0}.")]
    SyncError(String),

    #[error("Git operation failed. Original error: {0}")]
    Git2Error(#[from] git2::Error),

    #[error("Failed to build skip patterns. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{err}");
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
