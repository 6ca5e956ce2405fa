//! Jar metadata handling.
//! Every jar carries a `metadata.json` (or `metadata.toml`, `metadata.yaml`,
//! `metadata.yml`) file at its root which controls how the jar is instantiated.

use crate::constants::METADATA_FILES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed jar metadata.
///
/// Only `prefix` and `templates` drive instantiation; any other keys are
/// kept as-is and can be looked up through [`Metadata::get`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    /// Prepended to the identifier to name the destination directory.
    #[serde(default)]
    prefix: String,

    /// File names that are template sources and must not be copied.
    #[serde(default)]
    templates: IndexMap<String, serde_json::Value>,

    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

impl Metadata {
    /// Parses metadata content, choosing the format from the file name.
    pub fn parse(content: &str, file_name: &str) -> Result<Self> {
        let parsed = match file_name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(content).map_err(|e| e.to_string())
            }
            _ => Err(format!("unsupported metadata format '{file_name}'")),
        };

        parsed.map_err(|reason| Error::InvalidJar {
            path: file_name.to_string(),
            reason: format!("unable to parse metadata: {reason}"),
        })
    }

    /// Loads metadata from the first metadata file found in `jar_dir`.
    ///
    /// # Returns
    /// * The parsed metadata and the file it was read from
    ///
    /// # Errors
    /// * `Error::InvalidJar` if no metadata file exists or it cannot be read or parsed
    pub fn load<P: AsRef<Path>>(jar_dir: P) -> Result<(Self, PathBuf)> {
        let jar_dir = jar_dir.as_ref();
        let invalid = |reason: String| Error::InvalidJar {
            path: jar_dir.display().to_string(),
            reason,
        };

        let metadata_path = METADATA_FILES
            .iter()
            .map(|file_name| jar_dir.join(file_name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                invalid(format!("no metadata file found (tried: {})", METADATA_FILES.join(", ")))
            })?;

        debug!("Parsing metadata from '{}'", metadata_path.display());

        let content = std::fs::read_to_string(&metadata_path)
            .map_err(|e| invalid(format!("unable to read metadata: {e}")))?;
        let file_name = metadata_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let metadata = Self::parse(&content, file_name).map_err(|e| match e {
            Error::InvalidJar { reason, .. } => invalid(reason),
            other => other,
        })?;

        Ok((metadata, metadata_path))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `file_name` is registered under the `templates` table.
    /// Any value counts; the key's presence is what marks the file.
    pub fn is_template(&self, file_name: &str) -> bool {
        self.templates.contains_key(file_name)
    }

    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Looks up any top-level key that is not `prefix` or `templates`.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_json_metadata() {
        let metadata = Metadata::parse(
            r#"{"prefix": "app-", "templates": {"Makefile": true}, "owner": "infra"}"#,
            "metadata.json",
        )
        .unwrap();

        assert_eq!(metadata.prefix(), "app-");
        assert!(metadata.is_template("Makefile"));
        assert!(!metadata.is_template("README.md"));
        assert_eq!(metadata.get("owner"), Some(&serde_json::json!("infra")));
    }

    #[test]
    fn parses_yaml_metadata() {
        let content = "prefix: svc-\ntemplates:\n  main.tf: false\n  vars.tf: {}\n";
        let metadata = Metadata::parse(content, "metadata.yml").unwrap();

        assert_eq!(metadata.prefix(), "svc-");
        // presence is enough, whatever the value
        assert!(metadata.is_template("main.tf"));
        assert!(metadata.is_template("vars.tf"));
        assert_eq!(metadata.templates().collect::<Vec<_>>(), vec!["main.tf", "vars.tf"]);
    }

    #[test]
    fn parses_toml_metadata() {
        let content = "prefix = \"lib-\"\nowner = \"infra\"\n\n[templates]\n\"Cargo.toml\" = true\n";
        let metadata = Metadata::parse(content, "metadata.toml").unwrap();

        assert_eq!(metadata.prefix(), "lib-");
        assert!(metadata.is_template("Cargo.toml"));
        assert_eq!(metadata.get("owner"), Some(&serde_json::json!("infra")));
    }

    #[test]
    fn load_prefers_toml_over_yaml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("metadata.yml"), "prefix: yaml-\n").unwrap();
        fs::write(dir.path().join("metadata.toml"), "prefix = \"toml-\"\n").unwrap();

        let (metadata, path) = Metadata::load(dir.path()).unwrap();
        assert_eq!(metadata.prefix(), "toml-");
        assert_eq!(path, dir.path().join("metadata.toml"));
    }

    #[test]
    fn missing_keys_use_defaults() {
        let metadata = Metadata::parse("{}", "metadata.json").unwrap();
        assert_eq!(metadata.prefix(), "");
        assert_eq!(metadata.templates().count(), 0);
        assert!(metadata.get("prefix").is_none());
    }

    #[test]
    fn rejects_malformed_content() {
        let err = Metadata::parse("{not json", "metadata.json").unwrap_err();
        assert!(matches!(err, Error::InvalidJar { .. }));

        let err = Metadata::parse(r#"{"prefix": ["a"]}"#, "metadata.json").unwrap_err();
        assert!(matches!(err, Error::InvalidJar { .. }));
    }

    #[test]
    fn load_prefers_json_over_yaml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("metadata.yaml"), "prefix: yaml-\n").unwrap();
        fs::write(dir.path().join("metadata.json"), r#"{"prefix": "json-"}"#).unwrap();

        let (metadata, path) = Metadata::load(dir.path()).unwrap();
        assert_eq!(metadata.prefix(), "json-");
        assert_eq!(path, dir.path().join("metadata.json"));
    }

    #[test]
    fn load_without_metadata_file_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "hello").unwrap();

        match Metadata::load(dir.path()) {
            Err(Error::InvalidJar { path, reason }) => {
                assert_eq!(path, dir.path().display().to_string());
                assert!(reason.contains("no metadata file found"));
            }
            other => panic!("Expected InvalidJar, got {other:?}"),
        }
    }
}
