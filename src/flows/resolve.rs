//! Resolve flow - the built-in resolver as a command
//!
//! Output follows the resolver contract: the URL alone on stdout, exit 0.
//! On failure nothing is printed to stdout and the command fails.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::backends::deliver::{deliver, DeliveryOptions, Targets};
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::locator::Locator;
use crate::resolver::{resolve, ResolveOptions};

/// Resolve a locator string and deliver the URL
pub fn run_resolve(
    locator: &str,
    options: &ResolveOptions,
    delivery: DeliveryOptions,
    targets: Targets<'_>,
    config: RenderConfig,
    quiet: bool,
) -> Result<()> {
    let parsed: Locator = locator
        .parse()
        .with_context(|| format!("invalid locator {:?}", locator))?;
    let url = resolve(&parsed, options).with_context(|| format!("cannot resolve {}", locator))?;

    let outcome = deliver(&url, delivery, targets);
    let mut item = ResultItem::url(&parsed, url.as_str());
    item.meta.copied = outcome.copied;
    item.meta.opened = outcome.opened;

    let result_set: ResultSet = std::iter::once(item).collect();
    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;

    if !quiet {
        for error in &outcome.errors {
            eprintln!("{} {}", "warning:".yellow().bold(), error);
        }
    }
    Ok(())
}
