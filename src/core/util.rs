//! Common utilities

use std::path::PathBuf;

/// Check if a command is available in PATH
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Locate a command, returning its full path
pub fn find_command(cmd: &str) -> Option<PathBuf> {
    which::which(cmd).ok()
}

/// First whitespace-delimited token of a text stream
pub fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Decode process output, dropping invalid UTF-8 sequences
pub fn lossy_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
