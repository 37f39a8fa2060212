//! Action flow - locator, resolver, delivery
//!
//! One synchronous pass per user action. Any failure ends the action; nothing
//! is copied or opened unless the resolver produced a URL.

use anyhow::{anyhow, Result};
use colored::Colorize;
use tracing::debug;

use crate::backends::deliver::{deliver, DeliveryOptions, Targets};
use crate::backends::invoke::Resolve;
use crate::core::model::{Meta, ResultItem, ResultSet, VcsError};
use crate::core::render::{RenderConfig, Renderer};
use crate::locator::context::{Action, EditingContext};

/// Run `action` in `ctx` and describe the outcome as a result item
pub fn perform(
    action: Action,
    ctx: &EditingContext,
    resolver: &dyn Resolve,
    options: DeliveryOptions,
    targets: Targets<'_>,
) -> ResultItem {
    let locator = match action.locator(ctx) {
        Ok(locator) => locator,
        Err(e) => return ResultItem::error(VcsError::new(e.code(), e.to_string())),
    };
    debug!("{:?} -> {}", action, locator);

    let url = match resolver.resolve(&locator) {
        Ok(url) => url,
        Err(e) => {
            return ResultItem::locator_error(&locator, VcsError::new(e.code(), e.to_string()))
        }
    };

    let delivery = deliver(&url, options, targets);
    let mut item = ResultItem::url(&locator, url.as_str()).with_meta(Meta {
        resolver: Some(resolver.name()),
        copied: delivery.copied,
        opened: delivery.opened,
    });
    for error in delivery.errors {
        item = item.with_error(VcsError::new(error.code(), error.to_string()));
    }
    item
}

/// Status line for the user, or `None` when there is nothing to say
pub fn status_line(item: &ResultItem) -> Option<String> {
    let url = item.url.as_deref()?;
    match (item.meta.copied, item.meta.opened) {
        (true, true) => Some(format!("copied and opened {}", url)),
        (true, false) => Some(format!("copied {}", url)),
        (false, true) => Some(format!("opened {}", url)),
        (false, false) => None,
    }
}

/// Run an action end to end: render the result, report status on stderr,
/// and fail when the action failed
pub fn run_action(
    action: Action,
    ctx: &EditingContext,
    resolver: &dyn Resolve,
    options: DeliveryOptions,
    targets: Targets<'_>,
    config: RenderConfig,
    quiet: bool,
) -> Result<()> {
    let item = perform(action, ctx, resolver, options, targets);

    let result_set: ResultSet = std::iter::once(item.clone()).collect();
    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;

    if !quiet {
        if let Some(line) = status_line(&item) {
            eprintln!("{} {}", "✓".green(), line);
        }
    }

    if item.errors.is_empty() {
        return Ok(());
    }
    let message = item
        .errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(anyhow!(message))
}
