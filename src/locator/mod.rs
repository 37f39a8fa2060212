//! Locator module - What to resolve
//!
//! A locator is the single argument handed to the resolver. Its string form:
//!   /path/to/file            file or directory
//!   /path/to/file:10,15      inclusive 1-based line range
//!   deadbeef                 object id (six or more hex digits)
//!   anything_else            word, passed verbatim

pub mod commands;
pub mod context;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Object ids are six or more hex digits and nothing else
pub static OBJECT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Fa-f0-9]{6,}$").expect("Invalid OBJECT_ID_RE regex"));

/// Line range suffix: `<path>:<start>,<end>`
static LINE_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+):(\d+),(\d+)$").expect("Invalid LINE_RANGE_RE regex"));

/// Errors raised while building a locator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("buffer has no backing file")]
    NoBackingFile,

    #[error("no token at point")]
    NoTokenAtPoint,

    #[error("empty locator")]
    Empty,

    #[error("invalid line range {start},{end}: lines are 1-based and start must not exceed end")]
    InvalidRange { start: u32, end: u32 },

    #[error("line number out of range: {0}")]
    LineNumber(String),

    #[error("not an object id: {0:?}")]
    NotAnObjectId(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

impl LocatorError {
    /// Stable code reported in error results
    pub fn code(&self) -> &'static str {
        match self {
            LocatorError::NoBackingFile => "NO_BACKING_FILE",
            LocatorError::NoTokenAtPoint => "NO_TOKEN_AT_POINT",
            LocatorError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            _ => "INVALID_LOCATOR",
        }
    }
}

/// Which variant a locator is, for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    File,
    Directory,
    LineRange,
    ObjectId,
    Word,
}

/// What to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    FilePath(PathBuf),
    DirectoryPath(PathBuf),
    LineRange { path: PathBuf, start: u32, end: u32 },
    ObjectId(String),
    Word(String),
}

impl Locator {
    /// Build a line range, enforcing `1 <= start <= end`
    pub fn line_range(path: impl Into<PathBuf>, start: u32, end: u32) -> Result<Self, LocatorError> {
        if start == 0 || start > end {
            return Err(LocatorError::InvalidRange { start, end });
        }
        Ok(Locator::LineRange {
            path: path.into(),
            start,
            end,
        })
    }

    /// Build an object id, enforcing the hex pattern
    pub fn object_id(text: impl Into<String>) -> Result<Self, LocatorError> {
        let text = text.into();
        if is_object_id(&text) {
            Ok(Locator::ObjectId(text))
        } else {
            Err(LocatorError::NotAnObjectId(text))
        }
    }

    pub fn kind(&self) -> LocatorKind {
        match self {
            Locator::FilePath(_) => LocatorKind::File,
            Locator::DirectoryPath(_) => LocatorKind::Directory,
            Locator::LineRange { .. } => LocatorKind::LineRange,
            Locator::ObjectId(_) => LocatorKind::ObjectId,
            Locator::Word(_) => LocatorKind::Word,
        }
    }

    /// The filesystem path this locator refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Locator::FilePath(p) | Locator::DirectoryPath(p) => Some(p),
            Locator::LineRange { path, .. } => Some(path),
            Locator::ObjectId(_) | Locator::Word(_) => None,
        }
    }

    /// The argument as the resolver receives it. Paths keep their exact bytes.
    pub fn to_os_arg(&self) -> OsString {
        match self {
            Locator::FilePath(p) | Locator::DirectoryPath(p) => p.as_os_str().to_os_string(),
            Locator::LineRange { path, start, end } => {
                let mut arg = path.as_os_str().to_os_string();
                arg.push(format!(":{},{}", start, end));
                arg
            }
            Locator::ObjectId(text) | Locator::Word(text) => OsString::from(text),
        }
    }

    /// Display form of the argument (lossy for non-UTF-8 paths)
    pub fn to_arg(&self) -> String {
        self.to_os_arg().to_string_lossy().into_owned()
    }

    /// Upgrade using the filesystem: a file path naming a directory becomes a
    /// directory path, and a bare word naming an existing entry becomes a path
    pub fn refine(self) -> Self {
        match self {
            Locator::FilePath(p) if p.is_dir() => Locator::DirectoryPath(p),
            Locator::Word(w) => {
                let p = PathBuf::from(&w);
                if p.is_dir() {
                    Locator::DirectoryPath(p)
                } else if p.is_file() {
                    Locator::FilePath(p)
                } else {
                    Locator::Word(w)
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg())
    }
}

impl FromStr for Locator {
    type Err = LocatorError;

    /// Parse without touching the filesystem; see [`Locator::refine`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(LocatorError::Empty);
        }

        if let Some(caps) = LINE_RANGE_RE.captures(s) {
            let start = parse_line_number(&caps[2])?;
            let end = parse_line_number(&caps[3])?;
            return Locator::line_range(PathBuf::from(&caps[1]), start, end);
        }

        if is_object_id(s) {
            return Ok(Locator::ObjectId(s.to_string()));
        }

        if looks_like_path(s) {
            return Ok(Locator::FilePath(PathBuf::from(s)));
        }

        Ok(Locator::Word(s.to_string()))
    }
}

fn parse_line_number(s: &str) -> Result<u32, LocatorError> {
    s.parse()
        .map_err(|_| LocatorError::LineNumber(s.to_string()))
}

/// Whether `text` is an object id (`^[A-Fa-f0-9]{6,}$`)
pub fn is_object_id(text: &str) -> bool {
    OBJECT_ID_RE.is_match(text)
}

fn looks_like_path(s: &str) -> bool {
    s.contains('/')
        || s.contains(std::path::MAIN_SEPARATOR)
        || s.starts_with('.')
        || s.starts_with('~')
        || Path::new(s).is_absolute()
}
