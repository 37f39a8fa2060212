//! Browser opener

use std::ffi::OsString;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::backends::clipboard::DeliveryError;
use crate::core::util::command_exists;

/// Environment variable naming the browser opener
pub const BROWSER_ENV: &str = "VCSURL_BROWSER";

/// Known openers, in preference order
pub const BROWSER_OPENERS: &[&str] = &["xdg-open", "open", "wslview"];

/// Somewhere a URL can be opened
pub trait Browser {
    fn open(&self, url: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBrowser {
    program: OsString,
}

impl CommandBrowser {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn detect() -> Result<Self, DeliveryError> {
        if let Some(program) = std::env::var_os(BROWSER_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::new(program));
        }
        BROWSER_OPENERS
            .iter()
            .find(|program| command_exists(program))
            .map(|program| Self::new(*program))
            .ok_or(DeliveryError::NoBrowser)
    }
}

impl Browser for CommandBrowser {
    fn open(&self, url: &str) -> Result<(), DeliveryError> {
        let program = self.program.to_string_lossy().into_owned();
        debug!("opening {} via {}", url, program);

        let status = Command::new(&self.program)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| DeliveryError::BrowserFailed {
                program: program.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(DeliveryError::BrowserFailed {
                program,
                message: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_opener_fails() {
        let browser = CommandBrowser::new("no-such-opener-a41c");
        let err = browser.open("https://example.com").unwrap_err();
        assert_eq!(err.code(), "BROWSER_FAILED");
    }

    #[test]
    fn test_opener_receives_url() {
        // `true` ignores its argument and succeeds
        assert!(CommandBrowser::new("true").open("https://example.com").is_ok());
        assert!(CommandBrowser::new("false").open("https://example.com").is_err());
    }
}
