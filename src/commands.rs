//! The `open`, `list` and `update` commands.

use crate::cli::{OpenArgs, UpdateArgs};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::jar::Jar;
use crate::matcher::{match_jar, MatchOutcome};
use crate::processor::Instantiator;
use crate::repository::scan_jars;
use crate::sync::{sync_repository, RepoSource, SyncOutcome};
use log::debug;
use std::path::{Path, PathBuf};

/// Instantiates the requested jar from the repository at `repo_dir`.
///
/// # Returns
/// * The destination directory that was populated
///
/// # Errors
/// * `Error::NoMatch` if no valid jar carries the requested name
/// * `Error::IncompleteInstantiation` if any path failed to copy
pub fn open<P: AsRef<Path>>(repo_dir: P, args: &OpenArgs) -> Result<PathBuf> {
    debug!("open called");
    let jars = scan_jars(repo_dir)?;
    let instantiator = Instantiator::new()?;

    match match_jar(&args.jar, &jars, &args.identifier, &args.destination, &instantiator)? {
        MatchOutcome::NotFound => Err(Error::NoMatch { jar: args.jar.clone() }),
        MatchOutcome::Opened { destination, report } if !report.is_complete() => {
            Err(Error::IncompleteInstantiation {
                destination: destination.display().to_string(),
                failures: report.failures.len(),
            })
        }
        MatchOutcome::Opened { destination, .. } => Ok(destination),
    }
}

/// Valid jars of the repository at `repo_dir`.
pub fn list<P: AsRef<Path>>(repo_dir: P) -> Result<Vec<Jar>> {
    debug!("list called");
    scan_jars(repo_dir)
}

/// Clones or pulls the jar repository; flags take precedence over settings.
pub fn update(settings: &Settings, args: &UpdateArgs) -> Result<SyncOutcome> {
    debug!("update called");
    let url = args.repository.as_deref().unwrap_or(&settings.repo_url);
    let remote = args.remote.as_deref().unwrap_or(&settings.repo_remote);

    sync_repository(settings.repo_dir(), &RepoSource::from_string(url), remote)
}
