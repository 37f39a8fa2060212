//! Command table
//!
//! Stable names a host binds to keys or menus. Each name maps to one [`Action`].

use super::context::Action;
use super::LocatorError;

/// A named, host-triggerable entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub action: Action,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "vcs-url-buffer",
        action: Action::Buffer,
        description: "URL of the current file, or of its directory when the buffer has no file",
    },
    CommandSpec {
        name: "vcs-url-region",
        action: Action::Region,
        description: "URL of the selected line range",
    },
    CommandSpec {
        name: "vcs-url-point",
        action: Action::Point,
        description: "URL of the object id or listing entry at point, else of the file",
    },
    CommandSpec {
        name: "vcs-url-word",
        action: Action::Word,
        description: "Search URL for the word at point",
    },
    CommandSpec {
        name: "vcs-url-dwim",
        action: Action::RegionOrPoint,
        description: "Region URL when a selection is active, point URL otherwise",
    },
];

/// Find a command by name
pub fn lookup(name: &str) -> Result<&'static CommandSpec, LocatorError> {
    COMMANDS
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| LocatorError::UnknownCommand(name.to_string()))
}
