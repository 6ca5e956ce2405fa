//! masonjar provisions new project directories from canned "jars".
//! A jar is a directory with a metadata file inside a local clone of a jar
//! repository; opening a jar copies its tree into a fresh destination,
//! leaving out the metadata file and any file declared as a template.

/// Command-line interface module for masonjar
pub mod cli;

/// The open, list and update commands
pub mod commands;

/// Settings file, environment and defaults
pub mod config;

pub mod constants;

/// Error types and handling for masonjar
pub mod error;

/// Root-level paths that are never instantiated
pub mod ignore;

/// The jar type
pub mod jar;

pub mod logger;

/// Selecting a jar by name and preparing its destination
pub mod matcher;

/// Jar metadata parsing
pub mod metadata;

/// What happens to each path of a jar
pub mod processor;

/// Scanning a jar repository
pub mod repository;

/// Cloning and pulling the jar repository
pub mod sync;

/// Read-only source and writable destination trees
pub mod tree;

/// Jar tree traversal
pub mod walker;
