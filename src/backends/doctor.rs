//! Doctor - Dependency checking

use anyhow::Result;

use crate::backends::browser::BROWSER_OPENERS;
use crate::backends::clipboard::CLIPBOARD_HELPERS;
use crate::core::model::{ResultItem, ResultSet, VcsError};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::find_command;

/// Dependency status
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    pub name: String,
    pub command: Option<String>,
    pub required: bool,
    pub notes: Option<String>,
}

impl DependencyStatus {
    fn probe(name: &str, candidates: &[&str], required: bool, notes: &str) -> Self {
        let command = candidates
            .iter()
            .find_map(|c| find_command(c))
            .map(|p| p.display().to_string());
        Self {
            name: name.to_string(),
            command,
            required,
            notes: Some(notes.to_string()),
        }
    }

    pub fn available(&self) -> bool {
        self.command.is_some()
    }

    pub fn to_result_item(&self) -> ResultItem {
        let status = if self.available() { "✓" } else { "✗" };
        let required = if self.required {
            "required"
        } else {
            "optional"
        };

        let mut message = format!(
            "{} {} ({}) - {}",
            status,
            self.name,
            required,
            self.command
                .as_ref()
                .map(|c| format!("found: {}", c))
                .unwrap_or_else(|| "not found".to_string())
        );
        if let Some(notes) = &self.notes {
            message.push_str(&format!("\n  Note: {}", notes));
        }

        let mut item = ResultItem::tool(message);
        if !self.available() && self.required {
            item = item.with_error(VcsError::new(
                "MISSING_DEPENDENCY",
                format!("{} is required but not found", self.name),
            ));
        }
        item
    }
}

/// Check all dependencies
pub fn check_dependencies(resolver: &str) -> Vec<DependencyStatus> {
    let clipboards: Vec<&str> = CLIPBOARD_HELPERS.iter().map(|(p, _)| *p).collect();

    vec![
        DependencyStatus::probe(
            "resolver",
            &[resolver],
            true,
            "Client actions run this program; set --resolver or VCSURL_RESOLVER",
        ),
        DependencyStatus::probe(
            "git",
            &["git"],
            true,
            "The built-in resolver inspects working copies with git",
        ),
        DependencyStatus::probe(
            "clipboard",
            &clipboards,
            false,
            "Needed for --copy: wl-copy, xclip, xsel or pbcopy",
        ),
        DependencyStatus::probe(
            "browser",
            BROWSER_OPENERS,
            false,
            "Needed for --open: xdg-open or open",
        ),
    ]
}

/// Run the doctor command
pub fn run_doctor(resolver: &str, config: RenderConfig) -> Result<()> {
    let deps = check_dependencies(resolver);
    let result_set: ResultSet = deps.iter().map(DependencyStatus::to_result_item).collect();

    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;

    if deps.iter().any(|d| d.required && !d.available()) {
        eprintln!("\n⚠️  Some required dependencies are missing!");
    }

    Ok(())
}
