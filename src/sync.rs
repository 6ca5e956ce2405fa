//! Jar repository synchronization.
//! Keeps the local clone of the jar repository current: clones it when it is
//! missing and fast-forwards it from its remote otherwise.

use crate::error::{Error, Result};
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{AutotagOption, Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository};
use log::{debug, info};
use std::path::{Path, PathBuf};
use url::Url;

/// Where the jar repository is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSource {
    /// A URL such as `https://` or `ssh://`.
    Remote(String),
    /// scp-like syntax, `git@host:owner/repo`.
    Ssh(String),
    /// A repository on the local filesystem.
    FileSystem(PathBuf),
}

impl RepoSource {
    pub fn from_string(s: &str) -> Self {
        if let Ok(url) = Url::parse(s) {
            if matches!(url.scheme(), "http" | "https" | "git" | "ssh" | "file") {
                return Self::Remote(s.to_string());
            }
        }

        if let Some((user_host, path)) = s.split_once(':') {
            if user_host.contains('@') && !path.is_empty() && !path.starts_with("//") {
                return Self::Ssh(s.to_string());
            }
        }

        Self::FileSystem(PathBuf::from(s))
    }

    /// The location as handed to git.
    pub fn location(&self) -> String {
        match self {
            RepoSource::Remote(url) | RepoSource::Ssh(url) => url.clone(),
            RepoSource::FileSystem(path) => path.display().to_string(),
        }
    }
}

impl std::fmt::Display for RepoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoSource::Remote(url) => write!(f, "git repository: '{url}'"),
            RepoSource::Ssh(url) => write!(f, "git repository over ssh: '{url}'"),
            RepoSource::FileSystem(path) => write!(f, "local repository: '{}'", path.display()),
        }
    }
}

/// What [`sync_repository`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    UpToDate,
    FastForwarded,
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOutcome::Cloned => write!(f, "cloned"),
            SyncOutcome::UpToDate => write!(f, "already up-to-date"),
            SyncOutcome::FastForwarded => write!(f, "fast-forwarded"),
        }
    }
}

/// SSH credentials handed to libgit2, each source offered once.
///
/// libgit2 calls back after every rejected credential, so offering the same
/// one again would never end.
#[derive(Debug)]
pub struct SshCredentials {
    key_file: PathBuf,
    username_sent: bool,
    agent_tried: bool,
    key_tried: bool,
}

impl SshCredentials {
    pub fn new<P: Into<PathBuf>>(key_file: P) -> Self {
        Self { key_file: key_file.into(), username_sent: false, agent_tried: false, key_tried: false }
    }

    /// Uses `~/.ssh/id_rsa` as the key file.
    pub fn from_home() -> Self {
        let home = directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_default();
        Self::new(home.join(".ssh").join("id_rsa"))
    }

    /// The next credential to try: the username when asked for one, then
    /// the ssh agent, then the key file, then an error.
    pub fn next_credential(
        &mut self,
        username: &str,
        allowed_types: CredentialType,
    ) -> std::result::Result<Cred, git2::Error> {
        if allowed_types.contains(CredentialType::USERNAME) && !self.username_sent {
            self.username_sent = true;
            return Cred::username(username);
        }
        if !allowed_types.contains(CredentialType::SSH_KEY) {
            return Err(git2::Error::from_str(
                "the remote asks for credentials other than an ssh key",
            ));
        }

        if !self.agent_tried {
            self.agent_tried = true;
            debug!("Trying ssh agent credentials for '{username}'");
            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }
        if !self.key_tried {
            self.key_tried = true;
            debug!("Trying ssh key '{}' for '{username}'", self.key_file.display());
            return Cred::ssh_key(username, None, &self.key_file, None);
        }

        Err(git2::Error::from_str("ssh authentication failed with the agent and the key file"))
    }
}

fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut credentials = SshCredentials::from_home();
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        credentials.next_credential(username_from_url.unwrap_or("git"), allowed_types)
    });

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);
    fetch_opts
}

/// Clones `source` into `repo_dir`.
pub fn clone_repository<P: AsRef<Path>>(repo_dir: P, source: &RepoSource) -> Result<()> {
    let repo_dir = repo_dir.as_ref();
    info!("Cloning {} into '{}'", source, repo_dir.display());

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options());
    builder.clone(&source.location(), repo_dir)?;
    Ok(())
}

/// Fetches `remote_name` and fast-forwards the checked out branch.
pub fn pull_repository(repo: &Repository, remote_name: &str) -> Result<SyncOutcome> {
    let head = repo.head()?;
    let branch = head
        .shorthand()
        .filter(|_| head.is_branch())
        .ok_or_else(|| Error::SyncError("HEAD is not on a branch".to_string()))?
        .to_string();

    debug!("Fetching '{remote_name}' for branch '{branch}'");
    let mut remote = repo.find_remote(remote_name)?;
    let mut fetch_opts = fetch_options();
    fetch_opts.download_tags(AutotagOption::Auto);
    remote.fetch(&[] as &[&str], Some(&mut fetch_opts), None)?;

    let upstream_name = format!("refs/remotes/{remote_name}/{branch}");
    let upstream = repo.find_reference(&upstream_name).map_err(|e| {
        Error::SyncError(format!("no upstream '{upstream_name}' for '{branch}': {e}"))
    })?;
    let upstream_commit = repo.reference_to_annotated_commit(&upstream)?;

    let (analysis, _) = repo.merge_analysis(&[&upstream_commit])?;
    if analysis.is_up_to_date() {
        return Ok(SyncOutcome::UpToDate);
    }
    if !analysis.is_fast_forward() {
        return Err(Error::SyncError(format!(
            "local branch '{branch}' has diverged from '{upstream_name}'"
        )));
    }

    let branch_ref = format!("refs/heads/{branch}");
    let mut reference = repo.find_reference(&branch_ref)?;
    reference.set_target(upstream_commit.id(), "masonjar: fast-forward")?;
    repo.set_head(&branch_ref)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

    Ok(SyncOutcome::FastForwarded)
}

/// Brings the local jar repository at `repo_dir` up to date with `source`.
///
/// A missing directory, or one that is not a git repository, is cloned;
/// an existing clone is pulled from `remote_name`.
pub fn sync_repository<P: AsRef<Path>>(
    repo_dir: P,
    source: &RepoSource,
    remote_name: &str,
) -> Result<SyncOutcome> {
    let repo_dir = repo_dir.as_ref();

    match Repository::open(repo_dir) {
        Ok(repo) => {
            info!("Pulling '{}' from '{}'", repo_dir.display(), remote_name);
            pull_repository(&repo, remote_name)
        }
        Err(e) if e.code() == git2::ErrorCode::NotFound => {
            debug!("No repository at '{}': {}", repo_dir.display(), e);
            clone_repository(repo_dir, source)?;
            Ok(SyncOutcome::Cloned)
        }
        Err(e) => Err(Error::Git2Error(e)),
    }
}
