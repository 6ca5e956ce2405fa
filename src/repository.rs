//! Jar repository scanning.
//! A repository is a plain directory whose immediate children are jar candidates.

use crate::error::{Error, Result};
use crate::jar::Jar;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Lists the immediate entries of `repo_dir` and returns every entry that
/// validates as a jar, in directory-listing order.
///
/// Entries that fail validation are logged and left out; they never fail the
/// scan as a whole.
///
/// # Errors
/// * `Error::RepoUnreadable` if `repo_dir` itself cannot be listed
pub fn scan_jars<P: AsRef<Path>>(repo_dir: P) -> Result<Vec<Jar>> {
    let repo_dir = repo_dir.as_ref();
    debug!("Parsing jars from '{}'", repo_dir.display());

    let unreadable = |source| Error::RepoUnreadable {
        repo_dir: repo_dir.display().to_string(),
        source,
    };

    let repo_dir = std::path::absolute(repo_dir).map_err(unreadable)?;
    let entries = fs::read_dir(&repo_dir).map_err(unreadable)?;

    let mut jars = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read an entry of '{}': {}", repo_dir.display(), e);
                continue;
            }
        };

        match Jar::new(entry.path()) {
            Ok(jar) => {
                info!("Parsed '{}' as jar '{}'", jar.path().display(), jar.name());
                jars.push(jar);
            }
            Err(e) => warn!("{e}"),
        }
    }

    Ok(jars)
}
