//! Built-in resolver - Map a locator to a hosted repository URL
//!
//! Supports git working copies whose `origin` remote lives on GitHub or Kiln.
//! This is what the `vcs-resolve` binary runs.

pub mod git;
pub mod host;
pub mod origin;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::model::ResolvedUrl;
use crate::core::paths::{absolutize, canonical_or_clean, make_relative, working_dir_for};
use crate::locator::{Locator, LocatorError};

use self::git::Repo;
use self::host::{Host, Target};

/// Errors raised by the built-in resolver
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error("not a git repository: {}", .dir.display())]
    NotARepository { dir: PathBuf },

    #[error("git is not installed")]
    GitNotFound,

    #[error("git {args} failed: {message}")]
    Git { args: String, message: String },

    #[error("current branch not found")]
    BranchNotFound,

    #[error("origin remote not found")]
    OriginNotFound,

    #[error("cannot read repository from origin: {0}")]
    MalformedOrigin(String),

    #[error("unknown hosting service for origin: {0}")]
    UnknownHost(String),

    #[error("{} is outside repository {}", .path.display(), .toplevel.display())]
    OutsideRepository { path: PathBuf, toplevel: PathBuf },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ResolveError {
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::Locator(e) => e.code(),
            ResolveError::NotARepository { .. } => "NOT_A_REPOSITORY",
            ResolveError::GitNotFound => "GIT_NOT_FOUND",
            ResolveError::Git { .. } => "GIT_FAILED",
            ResolveError::BranchNotFound => "BRANCH_NOT_FOUND",
            ResolveError::OriginNotFound => "ORIGIN_NOT_FOUND",
            ResolveError::MalformedOrigin(_) => "MALFORMED_ORIGIN",
            ResolveError::UnknownHost(_) => "UNKNOWN_HOST",
            ResolveError::OutsideRepository { .. } => "OUTSIDE_REPOSITORY",
            ResolveError::Url(_) => "INVALID_URL",
        }
    }
}

/// Options for a single resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Directory relative paths are taken against; the process cwd when unset
    pub base: Option<PathBuf>,
    /// Repository used for object ids and words; `base` when unset
    pub repo: Option<PathBuf>,
    /// Revision to link to instead of the current branch
    pub rev: Option<String>,
}

/// Make paths absolute and settle file-vs-directory-vs-word using the filesystem
pub fn normalize_locator(locator: Locator, base: &Path) -> Locator {
    match locator {
        Locator::FilePath(p) => Locator::FilePath(absolutize(&p, base)).refine(),
        Locator::DirectoryPath(p) => Locator::DirectoryPath(absolutize(&p, base)),
        Locator::LineRange { path, start, end } => Locator::LineRange {
            path: absolutize(&path, base),
            start,
            end,
        },
        Locator::Word(w) => match Locator::Word(base.join(&w).display().to_string()).refine() {
            Locator::Word(_) => Locator::Word(w),
            path => path,
        },
        other => other,
    }
}

/// Resolve `locator` to a URL
pub fn resolve(locator: &Locator, options: &ResolveOptions) -> Result<ResolvedUrl, ResolveError> {
    let base = match &options.base {
        Some(base) => base.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let locator = normalize_locator(locator.clone(), &base);
    debug!("resolving {:?}", locator);

    let git_dir = match locator.path() {
        Some(path) => working_dir_for(path),
        None => options.repo.clone().unwrap_or_else(|| base.clone()),
    };

    let repo = Repo::discover(&git_dir, options.rev.as_deref())?;
    let host = Host::from_origin(&repo.origin)?;
    debug!("host {} for {}", host.name(), repo.toplevel.display());

    let relative = match locator.path() {
        Some(path) => Some(repo_relative(&repo.toplevel, path)?),
        None => None,
    };
    let relative = relative.as_deref().unwrap_or_default();

    let target = match &locator {
        Locator::FilePath(_) => Target::File(relative),
        Locator::DirectoryPath(_) => Target::Directory(relative),
        Locator::LineRange { start, end, .. } => Target::Lines {
            path: relative,
            start: *start,
            end: *end,
        },
        Locator::ObjectId(hex) => Target::Object(hex),
        Locator::Word(word) => Target::Search(word),
    };

    host.url(target, &repo.branch).map(ResolvedUrl::from)
}

/// Path of `path` inside the working copy rooted at `toplevel`
fn repo_relative(toplevel: &Path, path: &Path) -> Result<String, ResolveError> {
    let toplevel_canon = canonical_or_clean(toplevel);
    if let Some(rel) = make_relative(&canonical_or_clean(path), &toplevel_canon) {
        return Ok(rel);
    }
    // The file may not exist (yet); canonicalize its directory instead
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        let candidate = canonical_or_clean(parent).join(name);
        if let Some(rel) = make_relative(&candidate, &toplevel_canon) {
            return Ok(rel);
        }
    }
    make_relative(path, toplevel).ok_or_else(|| ResolveError::OutsideRepository {
        path: path.to_path_buf(),
        toplevel: toplevel.to_path_buf(),
    })
}
