//! Depth-first traversal of a jar tree.
//!
//! The walker owns traversal only: it turns `walkdir` entries into
//! [`WalkEntry`] values, hands them to an [`EntryVisitor`] together with a
//! per-invocation [`WalkContext`], prunes subtrees on request and records
//! failures in a [`WalkReport`]. Directories that were descended into are
//! handed back to the visitor once their subtree is done.

use crate::error::{Error, Result};
use crate::jar::Jar;
use crate::tree::{DestinationTree, SourceTree};
use log::{debug, error};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Everything a visitor needs to know about the running instantiation.
pub struct WalkContext<'a> {
    pub jar: &'a Jar,
    pub source: SourceTree,
    pub destination: DestinationTree,
}

impl<'a> WalkContext<'a> {
    pub fn new<P: Into<PathBuf>>(jar: &'a Jar, destination_root: P) -> Self {
        Self {
            jar,
            source: SourceTree::new(jar.path()),
            destination: DestinationTree::new(destination_root),
        }
    }
}

/// A single visited path.
#[derive(Debug)]
pub struct WalkEntry {
    /// Path relative to the jar root; empty for the root itself.
    pub path: PathBuf,
    /// Entry metadata (symlinks not followed), absent when it could not be read.
    pub metadata: Option<fs::Metadata>,
    /// Set when the traversal itself failed on this path.
    pub error: Option<walkdir::Error>,
}

impl WalkEntry {
    pub fn is_dir(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.is_dir())
    }
}

/// What the walker should do after an entry has been visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    /// Do not descend into this directory.
    SkipSubtree,
}

/// Per-entry policy driven by [`walk_jar`].
pub trait EntryVisitor {
    /// Visits one entry.
    ///
    /// An `Err` is recorded as a failed path; the walk goes on with the
    /// siblings, and a failed directory is not descended into.
    fn visit(&self, context: &WalkContext<'_>, entry: &WalkEntry) -> Result<Visit>;

    /// Called once the walk has left a directory it descended into,
    /// innermost first. An `Err` is recorded as a failed path.
    fn leave(&self, _context: &WalkContext<'_>, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Outcome of a complete walk.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub visited: usize,
    pub failures: Vec<Error>,
}

impl WalkReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Calls [`EntryVisitor::leave`] for every open directory at `depth` or deeper.
fn leave_dirs(
    context: &WalkContext<'_>,
    visitor: &dyn EntryVisitor,
    open_dirs: &mut Vec<(usize, PathBuf)>,
    depth: usize,
    report: &mut WalkReport,
) {
    while open_dirs.last().is_some_and(|(open_depth, _)| *open_depth >= depth) {
        let Some((_, path)) = open_dirs.pop() else { break };
        if let Err(e) = visitor.leave(context, &path) {
            error!("{e}");
            report.failures.push(e);
        }
    }
}

/// Walks the jar tree in file-name order and feeds every entry to `visitor`.
pub fn walk_jar(context: &WalkContext<'_>, visitor: &dyn EntryVisitor) -> WalkReport {
    let root = context.source.root();
    debug!("Walking jar tree '{}'", root.display());

    let mut report = WalkReport::default();
    let mut open_dirs: Vec<(usize, PathBuf)> = Vec::new();
    let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();

    while let Some(raw_entry) = entries.next() {
        let (depth, entry) = match raw_entry {
            Ok(dir_entry) => {
                let path = relative_to(root, dir_entry.path());
                let entry = match dir_entry.metadata() {
                    Ok(metadata) => WalkEntry { path, metadata: Some(metadata), error: None },
                    Err(e) => WalkEntry { path, metadata: None, error: Some(e) },
                };
                (dir_entry.depth(), entry)
            }
            Err(e) => {
                let path = e.path().map(|p| relative_to(root, p)).unwrap_or_default();
                (e.depth(), WalkEntry { path, metadata: None, error: Some(e) })
            }
        };
        leave_dirs(context, visitor, &mut open_dirs, depth, &mut report);

        report.visited += 1;
        let prune = match visitor.visit(context, &entry) {
            Ok(Visit::Continue) => false,
            Ok(Visit::SkipSubtree) => true,
            Err(e) => {
                error!("{e}");
                report.failures.push(e);
                true
            }
        };

        if entry.is_dir() {
            if prune {
                debug!("Pruning '{}'", entry.path.display());
                entries.skip_current_dir();
            } else {
                open_dirs.push((depth, entry.path));
            }
        }
    }
    leave_dirs(context, visitor, &mut open_dirs, 0, &mut report);

    report
}
