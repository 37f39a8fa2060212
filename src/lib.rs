//! vcsurl - Repository URLs for what you are editing
//!
//! vcsurl provides:
//! - Locator construction from explicit editing context
//! - Invocation of an external `vcs-resolve` program, one argument per locator
//! - A built-in resolver for git working copies hosted on GitHub or Kiln
//! - Clipboard and browser delivery of the resolved URL
//! - Unified output format (raw/jsonl/json/md)

pub mod backends;
pub mod cli;
pub mod core;
pub mod flows;
pub mod locator;
pub mod resolver;
