//! Per-entry instantiation policy.
//!
//! [`Instantiator`] decides what happens to every path of a jar: skip it,
//! skip it as a template, recreate it as a directory or copy it as a file.

use crate::error::{Error, Result};
use crate::ignore::SkipRules;
use crate::walker::{EntryVisitor, Visit, WalkContext, WalkEntry};
use log::{debug, info, warn};
use std::fs::Permissions;
use std::path::Path;

/// What to do with a single jar path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JarOperation {
    /// Belongs to the jar itself (root, metadata file, templates directory).
    Skip,
    /// Registered in the metadata `templates` table.
    SkipTemplate,
    CreateDirectory,
    CopyFile,
}

impl JarOperation {
    pub fn get_message(&self, path: &Path) -> String {
        match self {
            JarOperation::Skip => format!("Skipping '{}'", path.display()),
            JarOperation::SkipTemplate => {
                format!("Skipping '{}' (declared as a template)", path.display())
            }
            JarOperation::CreateDirectory => {
                format!("Creating directory '{}'", path.display())
            }
            JarOperation::CopyFile => format!("Copying '{}'", path.display()),
        }
    }
}

/// The visitor that materializes a jar into its destination tree.
#[derive(Debug, Clone)]
pub struct Instantiator {
    skip_rules: SkipRules,
}

impl Instantiator {
    pub fn new() -> Result<Self> {
        Ok(Self { skip_rules: SkipRules::new()? })
    }

    pub fn with_skip_rules(skip_rules: SkipRules) -> Self {
        Self { skip_rules }
    }

    fn path_error(path: &Path, e: impl std::fmt::Display) -> Error {
        Error::PathVisitFailed { path: path.display().to_string(), e: e.to_string() }
    }

    /// Classifies `entry`, following symlinks to decide between a directory
    /// and a file.
    pub fn classify(&self, context: &WalkContext<'_>, entry: &WalkEntry) -> Result<JarOperation> {
        if entry.path.as_os_str().is_empty() {
            return Ok(JarOperation::Skip);
        }

        let metadata =
            context.source.metadata(&entry.path).map_err(|e| Self::path_error(&entry.path, e))?;
        if self.skip_rules.is_skippable(&entry.path, metadata.is_dir()) {
            return Ok(JarOperation::Skip);
        }
        if metadata.is_dir() {
            return Ok(JarOperation::CreateDirectory);
        }

        let file_name = entry.path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if context.jar.metadata().is_template(file_name) {
            return Ok(JarOperation::SkipTemplate);
        }

        Ok(JarOperation::CopyFile)
    }

    fn source_permissions(context: &WalkContext<'_>, path: &Path) -> Result<Permissions> {
        Ok(context.source.metadata(path).map_err(|e| Self::path_error(path, e))?.permissions())
    }

    /// Creates the directory writable; the source mode is applied on leave.
    /// A symlinked directory is not descended into, so it gets its mode now.
    fn create_directory(&self, context: &WalkContext<'_>, entry: &WalkEntry) -> Result<()> {
        let path = &entry.path;
        let permissions = Self::source_permissions(context, path)?;
        context
            .destination
            .create_dir(path, &permissions)
            .map_err(|e| Self::path_error(path, e))?;

        if !entry.is_dir() {
            context
                .destination
                .set_permissions(path, permissions)
                .map_err(|e| Self::path_error(path, e))?;
        }
        Ok(())
    }

    fn copy_file(&self, context: &WalkContext<'_>, path: &Path) -> Result<()> {
        let mut source = context.source.open(path).map_err(|e| Self::path_error(path, e))?;
        let permissions =
            source.metadata().map_err(|e| Self::path_error(path, e))?.permissions();

        let written = context
            .destination
            .write_file(path, &mut source, permissions)
            .map_err(|e| Self::path_error(path, e))?;

        debug!(
            "Copied '{}' to '{}', {} bytes",
            context.source.resolve(path).display(),
            context.destination.resolve(path).display(),
            written
        );
        Ok(())
    }
}

impl EntryVisitor for Instantiator {
    fn visit(&self, context: &WalkContext<'_>, entry: &WalkEntry) -> Result<Visit> {
        if let Some(e) = &entry.error {
            warn!("Error walking path '{}': {}", entry.path.display(), e);
            return Err(Self::path_error(&entry.path, e));
        }

        let operation = self.classify(context, entry)?;
        match operation {
            JarOperation::Skip => {
                info!("{}", operation.get_message(&entry.path));
                // the root must still be descended into
                if entry.path.as_os_str().is_empty() {
                    Ok(Visit::Continue)
                } else {
                    Ok(Visit::SkipSubtree)
                }
            }
            JarOperation::SkipTemplate => {
                info!("{}", operation.get_message(&entry.path));
                Ok(Visit::Continue)
            }
            JarOperation::CreateDirectory => {
                debug!("{}", operation.get_message(&entry.path));
                self.create_directory(context, entry)?;
                Ok(Visit::Continue)
            }
            JarOperation::CopyFile => {
                debug!("{}", operation.get_message(&entry.path));
                self.copy_file(context, &entry.path)?;
                Ok(Visit::Continue)
            }
        }
    }

    /// Applies the source directory's exact permissions once its subtree is written.
    fn leave(&self, context: &WalkContext<'_>, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }

        let permissions = Self::source_permissions(context, path)?;
        context
            .destination
            .set_permissions(path, permissions)
            .map_err(|e| Self::path_error(path, e))?;
        debug!("Applied source permissions to '{}'", path.display());
        Ok(())
    }
}
