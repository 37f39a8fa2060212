//! Git working copy inspection
//!
//! Shells out to `git` the way a user would; nothing here writes to the repository.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use super::origin::{find_origin, Origin};
use super::ResolveError;
use crate::core::util::lossy_text;

/// What the resolver needs to know about a working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub toplevel: PathBuf,
    pub branch: String,
    pub origin: Origin,
}

impl Repo {
    /// Inspect the working copy containing `dir`. `rev` overrides the checked-out branch.
    pub fn discover(dir: &Path, rev: Option<&str>) -> Result<Self, ResolveError> {
        let toplevel = toplevel(dir)?;

        let branch = match rev {
            Some(rev) => rev.to_string(),
            None => current_branch(dir)?,
        };

        let remotes = git(dir, &["remote", "-v"])?;
        let raw = find_origin(&remotes).ok_or(ResolveError::OriginNotFound)?;
        let origin: Origin = raw
            .parse()
            .map_err(|_| ResolveError::MalformedOrigin(raw.to_string()))?;
        debug!("origin {:?} on branch {}", origin, branch);

        Ok(Self {
            toplevel,
            branch,
            origin,
        })
    }
}

/// Run git in `dir` and return its trimmed stdout
pub fn git(dir: &Path, args: &[&str]) -> Result<String, ResolveError> {
    debug!("git {} (in {})", args.join(" "), dir.display());
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound if !dir.is_dir() => ResolveError::NotARepository {
                dir: dir.to_path_buf(),
            },
            io::ErrorKind::NotFound => ResolveError::GitNotFound,
            _ => ResolveError::Git {
                args: args.join(" "),
                message: e.to_string(),
            },
        })?;

    if !output.status.success() {
        return Err(ResolveError::Git {
            args: args.join(" "),
            message: lossy_text(&output.stderr).trim().to_string(),
        });
    }
    Ok(lossy_text(&output.stdout).trim().to_string())
}

fn toplevel(dir: &Path) -> Result<PathBuf, ResolveError> {
    match git(dir, &["rev-parse", "--show-toplevel"]) {
        Ok(out) if !out.is_empty() => Ok(PathBuf::from(out)),
        Ok(_) | Err(ResolveError::Git { .. }) => Err(ResolveError::NotARepository {
            dir: dir.to_path_buf(),
        }),
        Err(e) => Err(e),
    }
}

fn current_branch(dir: &Path) -> Result<String, ResolveError> {
    let output = git(dir, &["branch"])?;
    match parse_branch(&output) {
        Some(branch) if !branch.starts_with('(') => Ok(branch.to_string()),
        // Detached HEAD: point at the commit instead
        Some(_) => git(dir, &["rev-parse", "HEAD"]),
        None => Err(ResolveError::BranchNotFound),
    }
}

/// The branch marked with `*` in `git branch` output
pub fn parse_branch(output: &str) -> Option<&str> {
    output
        .lines()
        .find_map(|line| line.strip_prefix('*'))
        .map(str::trim)
        .filter(|b| !b.is_empty())
}
