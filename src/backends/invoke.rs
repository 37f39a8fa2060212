//! Resolver invocation
//!
//! Spawns the external resolver with the locator as one discrete argument
//! (never through a shell) and takes the first output token as the URL.

use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

use crate::core::model::ResolvedUrl;
use crate::core::util::lossy_text;
use crate::locator::Locator;

/// Default resolver executable name
pub const DEFAULT_RESOLVER: &str = "vcs-resolve";

/// Errors raised while invoking the resolver
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("resolver `{program}` not found")]
    ProcessNotFound { program: String },

    #[error("failed to run resolver `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("resolver `{program}` exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    ProcessFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("resolver `{program}` produced no output")]
    EmptyOutput { program: String },
}

impl InvocationError {
    /// Stable code reported in error results
    pub fn code(&self) -> &'static str {
        match self {
            InvocationError::ProcessNotFound { .. } => "RESOLVER_NOT_FOUND",
            InvocationError::Spawn { .. } => "RESOLVER_SPAWN_FAILED",
            InvocationError::ProcessFailed { .. } => "RESOLVER_FAILED",
            InvocationError::EmptyOutput { .. } => "EMPTY_OUTPUT",
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Anything that turns a locator into a URL
pub trait Resolve {
    fn resolve(&self, locator: &Locator) -> Result<ResolvedUrl, InvocationError>;

    /// Name shown in results
    fn name(&self) -> String;
}

/// Which output streams are searched for the URL token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capture {
    #[default]
    Stdout,
    /// stdout followed by stderr
    Combined,
}

/// An external resolver program
#[derive(Debug, Clone)]
pub struct ExternalResolver {
    program: OsString,
    leading_args: Vec<OsString>,
    capture: Capture,
    check_status: bool,
}

impl Default for ExternalResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVER)
    }
}

impl ExternalResolver {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            capture: Capture::Stdout,
            check_status: true,
        }
    }

    /// Fixed arguments placed before the locator (e.g. a script for an interpreter)
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_capture(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }

    /// Whether a non-zero exit is an error even when output holds a token
    pub fn with_check_status(mut self, check_status: bool) -> Self {
        self.check_status = check_status;
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Run the resolver once for `locator`
    pub fn invoke(&self, locator: &Locator) -> Result<ResolvedUrl, InvocationError> {
        let program = self.program_name();
        let arg = locator.to_os_arg();
        debug!("spawning {} {:?}", program, arg);

        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(&arg)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    InvocationError::ProcessNotFound {
                        program: program.clone(),
                    }
                } else {
                    InvocationError::Spawn {
                        program: program.clone(),
                        source,
                    }
                }
            })?;

        debug!("{} exited with {}", program, output.status);

        if self.check_status && !output.status.success() {
            return Err(InvocationError::ProcessFailed {
                program,
                code: output.status.code(),
                stderr: lossy_text(&output.stderr).trim().to_string(),
            });
        }

        let mut text = lossy_text(&output.stdout);
        if self.capture == Capture::Combined {
            text.push('\n');
            text.push_str(&lossy_text(&output.stderr));
        }

        parse_output(&text).ok_or(InvocationError::EmptyOutput { program })
    }
}

impl Resolve for ExternalResolver {
    fn resolve(&self, locator: &Locator) -> Result<ResolvedUrl, InvocationError> {
        self.invoke(locator)
    }

    fn name(&self) -> String {
        self.program_name()
    }
}

/// Take the URL from captured resolver output
pub fn parse_output(text: &str) -> Option<ResolvedUrl> {
    ResolvedUrl::from_output(text)
}
