//! Jar selection and destination handling.

use crate::error::{Error, Result};
use crate::jar::Jar;
use crate::walker::{walk_jar, EntryVisitor, WalkContext, WalkReport};
use log::{debug, error, info, warn};
use std::path::{Component, Path, PathBuf};

/// Result of [`match_jar`].
#[derive(Debug)]
pub enum MatchOutcome {
    /// No scanned jar carries the requested name; nothing was touched.
    NotFound,
    /// The jar was walked into `destination`.
    Opened { destination: PathBuf, report: WalkReport },
}

impl MatchOutcome {
    pub fn matched(&self) -> bool {
        matches!(self, MatchOutcome::Opened { .. })
    }
}

/// Computes `destination_base/<prefix><identifier>`.
///
/// A prefix may contain separators (`services/`); the missing directories
/// are created along with the destination root.
///
/// # Errors
/// * `Error::InvalidIdentifier` unless `prefix + identifier` is a relative
///   path made only of normal components
pub fn destination_root<P: AsRef<Path>>(
    destination_base: P,
    prefix: &str,
    identifier: &str,
) -> Result<PathBuf> {
    let dir_name = format!("{prefix}{identifier}");
    let invalid = |reason: &str| Error::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason: format!("'{dir_name}' {reason}"),
    };

    let relative = Path::new(&dir_name);
    if relative.as_os_str().is_empty() {
        return Err(invalid("is empty"));
    }
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(invalid("must be a relative path without '.' or '..' components"));
    }

    Ok(destination_base.as_ref().join(dir_name))
}

/// Finds the jar named `target` and instantiates it with `visitor`.
///
/// When several jars share the name the first one in `jars` wins and the
/// others are reported at warn level.
///
/// Per-path failures do not make this function fail: they are logged and
/// returned in the [`WalkReport`] of [`MatchOutcome::Opened`].
///
/// # Errors
/// * `Error::InvalidIdentifier` if the destination name is not usable
/// * `Error::DestinationCreateFailed` if the destination root cannot be created
pub fn match_jar<P: AsRef<Path>>(
    target: &str,
    jars: &[Jar],
    identifier: &str,
    destination_base: P,
    visitor: &dyn EntryVisitor,
) -> Result<MatchOutcome> {
    debug!("Matching '{}' against {} jars", target, jars.len());

    let mut matching = jars.iter().filter(|jar| jar.name() == target);
    let Some(jar) = matching.next() else {
        return Ok(MatchOutcome::NotFound);
    };
    for duplicate in matching {
        warn!("Ignoring {duplicate}: the name is already taken by {jar}");
    }

    info!("Opening {jar}");
    let destination = destination_root(destination_base, jar.prefix(), identifier)?;
    let context = WalkContext::new(jar, &destination);
    context.destination.ensure_root()?;

    let report = walk_jar(&context, visitor);
    if !report.is_complete() {
        error!(
            "Error walking jar '{}': {} path(s) failed",
            jar.path().display(),
            report.failures.len()
        );
    }

    Ok(MatchOutcome::Opened { destination, report })
}
