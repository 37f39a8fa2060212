//! Clipboard integration
//!
//! Pipes text into a clipboard helper program (wl-copy, xclip, xsel, pbcopy).

use std::ffi::OsString;
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

use crate::core::util::command_exists;

/// Environment variable naming the clipboard command (program and arguments)
pub const CLIPBOARD_ENV: &str = "VCSURL_CLIPBOARD";

/// Known clipboard helpers, in preference order
pub const CLIPBOARD_HELPERS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard", "-i"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip.exe", &[]),
];

/// Errors raised while delivering a URL
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("no clipboard helper found (install wl-copy, xclip, xsel or pbcopy, or set VCSURL_CLIPBOARD)")]
    NoClipboard,

    #[error("clipboard command `{program}` failed: {message}")]
    ClipboardFailed { program: String, message: String },

    #[error("no browser opener found (install xdg-open or set VCSURL_BROWSER)")]
    NoBrowser,

    #[error("browser command `{program}` failed: {message}")]
    BrowserFailed { program: String, message: String },
}

impl DeliveryError {
    pub fn code(&self) -> &'static str {
        match self {
            DeliveryError::NoClipboard | DeliveryError::ClipboardFailed { .. } => {
                "CLIPBOARD_FAILED"
            }
            DeliveryError::NoBrowser | DeliveryError::BrowserFailed { .. } => "BROWSER_FAILED",
        }
    }
}

/// Somewhere a URL can be copied to
pub trait Clipboard {
    fn set_text(&self, text: &str) -> Result<(), DeliveryError>;
}

/// A clipboard backed by an external helper reading stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandClipboard {
    pub fn new<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a command line such as `xclip -selection primary`
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    /// Pick the configured helper, else the first installed one
    pub fn detect() -> Result<Self, DeliveryError> {
        if let Some(clipboard) = std::env::var(CLIPBOARD_ENV)
            .ok()
            .and_then(|line| Self::from_command_line(&line))
        {
            return Ok(clipboard);
        }

        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        CLIPBOARD_HELPERS
            .iter()
            .filter(|(program, _)| wayland || *program != "wl-copy")
            .find(|(program, _)| command_exists(program))
            .map(|(program, args)| Self::new(*program, args.iter().copied()))
            .ok_or(DeliveryError::NoClipboard)
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Clipboard for CommandClipboard {
    fn set_text(&self, text: &str) -> Result<(), DeliveryError> {
        let program = self.program_name();
        let failed = |message: String| DeliveryError::ClipboardFailed {
            program: program.clone(),
            message,
        };
        debug!("copying to clipboard via {}", program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| failed(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| failed(e.to_string()))?;
        }

        // xclip and xsel stay alive to own the selection; only wait for exit
        let status = child.wait().map_err(|e| failed(e.to_string()))?;
        if !status.success() {
            return Err(failed(format!("exited with {}", status)));
        }
        Ok(())
    }
}
