#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Creates `repo/<name>` with the given metadata file and contents.
pub fn make_jar(repo: &Path, name: &str, metadata: Option<(&str, &str)>) -> PathBuf {
    let jar_dir = repo.join(name);
    fs::create_dir_all(&jar_dir).unwrap();
    if let Some((file_name, content)) = metadata {
        fs::write(jar_dir.join(file_name), content).unwrap();
    }
    jar_dir
}

/// Writes `content` at `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

/// Relative paths of every entry under `root`, sorted.
pub fn list_tree(root: &Path) -> Vec<String> {
    let mut entries: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            entry.path().strip_prefix(root).unwrap().to_string_lossy().into_owned()
        })
        .collect();
    entries.sort();
    entries
}
