//! Editing context and locator construction
//!
//! The host passes everything it knows about the editor state explicitly;
//! nothing here reads global state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{is_object_id, Locator, LocatorError};

/// A cursor position: 1-based line, 0-based column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Position of byte `offset` within `text`. Offsets past the end clamp to it.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let line = before.iter().filter(|b| **b == b'\n').count() as u32 + 1;
        let line_start = before
            .iter()
            .rposition(|b| *b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        Self {
            line,
            column: (offset - line_start) as u32,
        }
    }
}

impl FromStr for Position {
    type Err = String;

    /// `LINE` or `LINE:COLUMN`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, column) = match s.split_once(':') {
            Some((l, c)) => (l, c),
            None => (s, "0"),
        };
        let line: u32 = line
            .trim()
            .parse()
            .map_err(|_| format!("Invalid line: {}", line))?;
        let column: u32 = column
            .trim()
            .parse()
            .map_err(|_| format!("Invalid column: {}", column))?;
        if line == 0 {
            return Err("Line numbers are 1-indexed, line cannot be 0".to_string());
        }
        Ok(Self { line, column })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An active region; `end` is exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    /// Build a selection, ordering the endpoints
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Selection from byte offsets into the buffer text
    pub fn from_offsets(text: &str, start: usize, end: usize) -> Self {
        Self::new(
            Position::from_offset(text, start),
            Position::from_offset(text, end),
        )
    }

    /// Inclusive 1-based line span. The line holding the position just before
    /// the exclusive end is the last line, so an end at column 0 excludes its line.
    pub fn line_span(&self) -> (u32, u32) {
        let start = self.start.line;
        let last = if self.end.column == 0 {
            self.end.line.saturating_sub(1)
        } else {
            self.end.line
        };
        (start, last.max(start))
    }
}

/// Everything the host knows about the editor at the moment of the action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditingContext {
    /// File backing the current buffer
    pub file: Option<PathBuf>,
    /// Buffer's working directory, used when there is no file
    pub directory: PathBuf,
    /// Active region, if any
    pub selection: Option<Selection>,
    /// Token under the cursor
    pub token_at_point: Option<String>,
    /// Entry under the cursor in a directory listing
    pub listing_entry: Option<String>,
}

impl EditingContext {
    pub fn for_file(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let directory = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            file: Some(file),
            directory,
            ..Self::default()
        }
    }

    pub fn for_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token_at_point = Some(token.into());
        self
    }

    pub fn with_listing_entry(mut self, entry: impl Into<String>) -> Self {
        self.listing_entry = Some(entry.into());
        self
    }
}

/// A user-triggerable action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Whole buffer: its file, or its directory when there is none
    Buffer,
    /// Active region as a line range
    Region,
    /// Object id at point, listing entry, or the whole buffer
    Point,
    /// Token at point as a word
    Word,
    /// Region when a selection is active, point otherwise
    RegionOrPoint,
}

impl Action {
    /// Construct the locator this action resolves in `ctx`
    pub fn locator(self, ctx: &EditingContext) -> Result<Locator, LocatorError> {
        match self {
            Action::Buffer => buffer_locator(ctx),
            Action::Region => region_locator(ctx),
            Action::Point => point_locator(ctx),
            Action::Word => word_locator(ctx),
            Action::RegionOrPoint => {
                if ctx.selection.is_some() {
                    region_locator(ctx)
                } else {
                    point_locator(ctx)
                }
            }
        }
    }
}

fn buffer_locator(ctx: &EditingContext) -> Result<Locator, LocatorError> {
    Ok(match &ctx.file {
        Some(file) => Locator::FilePath(file.clone()),
        None => Locator::DirectoryPath(ctx.directory.clone()),
    })
}

fn region_locator(ctx: &EditingContext) -> Result<Locator, LocatorError> {
    let file = ctx.file.as_ref().ok_or(LocatorError::NoBackingFile)?;
    let Some(selection) = ctx.selection else {
        return Ok(Locator::FilePath(file.clone()));
    };
    let (start, end) = selection.line_span();
    Locator::line_range(file.clone(), start, end)
}

fn point_locator(ctx: &EditingContext) -> Result<Locator, LocatorError> {
    if let Some(entry) = &ctx.listing_entry {
        return Ok(Locator::DirectoryPath(ctx.directory.join(entry)));
    }
    match ctx.token_at_point.as_deref().map(str::trim) {
        Some(token) if is_object_id(token) => Ok(Locator::ObjectId(token.to_string())),
        _ => buffer_locator(ctx),
    }
}

fn word_locator(ctx: &EditingContext) -> Result<Locator, LocatorError> {
    match ctx.token_at_point.as_deref() {
        Some(token) if !token.trim().is_empty() => Ok(Locator::Word(token.to_string())),
        _ => Err(LocatorError::NoTokenAtPoint),
    }
}
