//! Backends module - External programs the tool talks to
//!
//! Provides:
//! - invoke: Running the resolver
//! - clipboard: Clipboard helpers (wl-copy, xclip, xsel, pbcopy)
//! - browser: Browser openers (xdg-open, open)
//! - deliver: Copy/open a resolved URL
//! - doctor: Dependency checking

pub mod browser;
pub mod clipboard;
pub mod deliver;
pub mod doctor;
pub mod invoke;
