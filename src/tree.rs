//! Filesystem capabilities used while instantiating a jar.
//!
//! [`SourceTree`] is a read-only view rooted at a jar; [`DestinationTree`] is
//! the only place that writes into the destination. Paths given to both are
//! relative to their root.

use crate::constants::DESTINATION_MODE;
use crate::error::{Error, Result};
use log::debug;
use std::fs::{self, File, Permissions};
use std::io;
use std::path::{Path, PathBuf};

/// Owner bits kept on a directory while its subtree is being written
#[cfg(unix)]
const OWNER_RWX: u32 = 0o700;

/// Read-only access to a jar's source tree.
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
}

impl SourceTree {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.root.join(relative)
    }

    /// Metadata of the entry, following symlinks.
    pub fn metadata<P: AsRef<Path>>(&self, relative: P) -> io::Result<fs::Metadata> {
        fs::metadata(self.resolve(relative))
    }

    pub fn open<P: AsRef<Path>>(&self, relative: P) -> io::Result<File> {
        File::open(self.resolve(relative))
    }
}

/// Write access to the destination tree of an instantiation.
#[derive(Debug, Clone)]
pub struct DestinationTree {
    root: PathBuf,
}

impl DestinationTree {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.root.join(relative)
    }

    /// Creates the destination root and any missing parents, owner-only.
    ///
    /// An existing directory is left untouched, including its permissions.
    ///
    /// # Returns
    /// * `true` if the directory was created, `false` if it already existed
    pub fn ensure_root(&self) -> Result<bool> {
        if self.root.is_dir() {
            debug!("Destination directory '{}' already exists", self.root.display());
            return Ok(false);
        }

        debug!("Creating destination directory '{}'", self.root.display());
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DESTINATION_MODE);
        }

        builder.create(&self.root).map_err(|source| Error::DestinationCreateFailed {
            destination: self.root.display().to_string(),
            source,
        })?;
        Ok(true)
    }

    /// Creates a single directory that stays writable by its owner, so the
    /// subtree can be filled in before [`DestinationTree::set_permissions`]
    /// applies the final mode.
    ///
    /// An already existing directory is accepted and made owner-writable.
    pub fn create_dir<P: AsRef<Path>>(
        &self,
        relative: P,
        permissions: &Permissions,
    ) -> io::Result<()> {
        let target = self.resolve(relative);
        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
            builder.mode(permissions.mode() | OWNER_RWX);
        }
        #[cfg(not(unix))]
        let _ = permissions;

        match builder.create(&target) {
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && target.is_dir() => {
                debug!("Directory '{}' already exists", target.display());
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let mut current = fs::metadata(&target)?.permissions();
                    current.set_mode(current.mode() | OWNER_RWX);
                    fs::set_permissions(&target, current)?;
                }
                Ok(())
            }
            result => result,
        }
    }

    /// Applies `permissions` verbatim to an existing entry.
    pub fn set_permissions<P: AsRef<Path>>(
        &self,
        relative: P,
        permissions: Permissions,
    ) -> io::Result<()> {
        fs::set_permissions(self.resolve(relative), permissions)
    }

    /// Streams `reader` into a new file, syncs it to disk, then applies
    /// `permissions` verbatim.
    ///
    /// A file left by an earlier run is removed first, so read-only copies
    /// are replaced rather than opened for writing.
    ///
    /// # Returns
    /// * The number of bytes written
    pub fn write_file<P: AsRef<Path>, R: io::Read>(
        &self,
        relative: P,
        reader: &mut R,
        permissions: Permissions,
    ) -> io::Result<u64> {
        let target = self.resolve(relative);
        match fs::symlink_metadata(&target) {
            Ok(existing) if !existing.is_dir() => {
                debug!("Replacing existing file '{}'", target.display());
                fs::remove_file(&target)?;
            }
            _ => {}
        }

        let mut file = File::create(&target)?;
        let written = io::copy(reader, &mut file)?;
        file.sync_all()?;
        drop(file);
        fs::set_permissions(&target, permissions)?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn ensure_root_creates_parents_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let base = TempDir::new().unwrap();
        let tree = DestinationTree::new(base.path().join("a/b/app-x1"));

        assert!(tree.ensure_root().unwrap());
        let mode = fs::metadata(tree.root()).unwrap().permissions().mode();
        // umask may only clear bits
        assert_eq!(mode & 0o077, 0);
        assert_eq!(mode & 0o700, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn ensure_root_is_idempotent() {
        use std::os::unix::fs::PermissionsExt;

        let base = TempDir::new().unwrap();
        let root = base.path().join("existing");
        fs::create_dir(&root).unwrap();
        fs::set_permissions(&root, Permissions::from_mode(0o755)).unwrap();

        let tree = DestinationTree::new(&root);
        assert!(!tree.ensure_root().unwrap());
        assert!(!tree.ensure_root().unwrap());
        assert_eq!(fs::metadata(&root).unwrap().permissions().mode() & 0o777, 0o755);
    }

    #[test]
    fn ensure_root_reports_failure() {
        let base = TempDir::new().unwrap();
        let blocker = base.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let tree = DestinationTree::new(blocker.join("dest"));
        assert!(matches!(tree.ensure_root(), Err(Error::DestinationCreateFailed { .. })));
    }

    #[test]
    fn write_file_copies_bytes() {
        let base = TempDir::new().unwrap();
        let tree = DestinationTree::new(base.path());
        let permissions = fs::metadata(base.path()).unwrap().permissions();

        let mut content: &[u8] = b"hello";
        let written = tree.write_file("out.txt", &mut content, permissions).unwrap();
        assert_eq!(written, 5);
        assert_eq!(fs::read(base.path().join("out.txt")).unwrap(), b"hello");
    }

    #[cfg(unix)]
    #[test]
    fn write_file_replaces_read_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let base = TempDir::new().unwrap();
        let tree = DestinationTree::new(base.path());
        let target = base.path().join("LICENSE");
        fs::write(&target, "old").unwrap();
        fs::set_permissions(&target, Permissions::from_mode(0o444)).unwrap();

        let mut content: &[u8] = b"new";
        tree.write_file("LICENSE", &mut content, Permissions::from_mode(0o444)).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert_eq!(fs::metadata(&target).unwrap().permissions().mode() & 0o777, 0o444);
    }

    #[cfg(unix)]
    #[test]
    fn create_dir_stays_writable_until_permissions_are_set() {
        use std::os::unix::fs::PermissionsExt;

        let base = TempDir::new().unwrap();
        let tree = DestinationTree::new(base.path());

        tree.create_dir("vendor", &Permissions::from_mode(0o555)).unwrap();
        let mode = fs::metadata(base.path().join("vendor")).unwrap().permissions().mode();
        assert_eq!(mode & 0o700, 0o700);

        let mut content: &[u8] = b"lib";
        tree.write_file("vendor/lib.txt", &mut content, Permissions::from_mode(0o644)).unwrap();
        tree.set_permissions("vendor", Permissions::from_mode(0o555)).unwrap();
        let mode = fs::metadata(base.path().join("vendor")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o555);

        // a rerun makes the directory writable again
        tree.create_dir("vendor", &Permissions::from_mode(0o555)).unwrap();
        let mode = fs::metadata(base.path().join("vendor")).unwrap().permissions().mode();
        assert_eq!(mode & 0o700, 0o700);
    }

    #[test]
    fn create_dir_accepts_existing_directory() {
        let base = TempDir::new().unwrap();
        let tree = DestinationTree::new(base.path());
        let permissions = fs::metadata(base.path()).unwrap().permissions();

        tree.create_dir("sub", &permissions).unwrap();
        tree.create_dir("sub", &permissions).unwrap();
        assert!(base.path().join("sub").is_dir());
    }
}
