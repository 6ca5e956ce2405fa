//! Paths of a jar that are never instantiated.
//! The jar root itself, the metadata file and the root `templates`
//! directory belong to the jar, not to the project created from it.

use crate::constants::{SKIP_DIR_PATTERNS, SKIP_FILE_PATTERNS};
use crate::error::Result;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Compiled root-level skip patterns, kept apart for files and directories.
#[derive(Debug, Clone)]
pub struct SkipRules {
    files: GlobSet,
    directories: GlobSet,
}

fn build_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern.as_ref()).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}

impl SkipRules {
    /// Builds the rules from [`SKIP_FILE_PATTERNS`] and [`SKIP_DIR_PATTERNS`].
    pub fn new() -> Result<Self> {
        Self::with_patterns(&SKIP_FILE_PATTERNS, &SKIP_DIR_PATTERNS)
    }

    /// Builds rules from custom patterns, each matched against the path
    /// relative to the jar root. `*` never crosses a path separator.
    pub fn with_patterns<S: AsRef<str>>(file_patterns: &[S], dir_patterns: &[S]) -> Result<Self> {
        Ok(Self { files: build_set(file_patterns)?, directories: build_set(dir_patterns)? })
    }

    /// Whether `relative` (a path relative to the jar root) must be skipped.
    pub fn is_skippable<P: AsRef<Path>>(&self, relative: P, is_dir: bool) -> bool {
        let relative = relative.as_ref();
        if relative.as_os_str().is_empty() {
            return true;
        }

        if is_dir {
            self.directories.is_match(relative)
        } else {
            self.files.is_match(relative)
        }
    }
}
