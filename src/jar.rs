//! The jar: a named template package made of a source tree and its metadata.

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use std::path::{Path, PathBuf};

/// A validated jar.
///
/// A `Jar` can only be built from a directory holding a parseable metadata
/// file, so every instance is known to be usable for instantiation.
#[derive(Debug, Clone)]
pub struct Jar {
    name: String,
    path: PathBuf,
    metadata: Metadata,
    metadata_file: PathBuf,
}

impl Jar {
    /// Builds a jar from a candidate directory.
    ///
    /// # Errors
    /// * `Error::InvalidJar` if the directory has no usable metadata file
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidJar {
                path: path.display().to_string(),
                reason: "path has no final component".to_string(),
            })?;

        let (metadata, metadata_file) = Metadata::load(&path)?;

        Ok(Self { name, path, metadata, metadata_file })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The metadata file this jar was validated with.
    pub fn metadata_file(&self) -> &Path {
        &self.metadata_file
    }

    /// Destination directory prefix, empty if unset.
    pub fn prefix(&self) -> &str {
        self.metadata.prefix()
    }
}

impl std::fmt::Display for Jar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "jar '{}' ({})", self.name, self.path.display())
    }
}
