//! Delivery of a resolved URL to the clipboard and/or a browser

use tracing::warn;

use crate::backends::browser::{Browser, CommandBrowser};
use crate::backends::clipboard::{Clipboard, CommandClipboard, DeliveryError};
use crate::core::model::ResolvedUrl;

/// What to do with a resolved URL besides printing it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub copy: bool,
    pub open: bool,
}

/// Outcome of a delivery
#[derive(Debug, Default)]
pub struct Delivery {
    pub copied: bool,
    pub opened: bool,
    pub errors: Vec<DeliveryError>,
}

/// Delivery targets; an `Err` records why a target could not be set up
pub struct Targets<'a> {
    pub clipboard: Result<&'a dyn Clipboard, DeliveryError>,
    pub browser: Result<&'a dyn Browser, DeliveryError>,
}

/// Helpers found on this system, looked up only when requested
#[derive(Debug, Default)]
pub struct SystemTargets {
    clipboard: Option<CommandClipboard>,
    browser: Option<CommandBrowser>,
}

impl SystemTargets {
    pub fn detect(options: DeliveryOptions) -> Self {
        Self {
            clipboard: options
                .copy
                .then(CommandClipboard::detect)
                .and_then(Result::ok),
            browser: options.open.then(CommandBrowser::detect).and_then(Result::ok),
        }
    }

    pub fn targets(&self) -> Targets<'_> {
        Targets {
            clipboard: self
                .clipboard
                .as_ref()
                .map(|c| c as &dyn Clipboard)
                .ok_or(DeliveryError::NoClipboard),
            browser: self
                .browser
                .as_ref()
                .map(|b| b as &dyn Browser)
                .ok_or(DeliveryError::NoBrowser),
        }
    }
}

/// Copy and/or open `url`. Failures are collected, not raised.
pub fn deliver(url: &ResolvedUrl, options: DeliveryOptions, targets: Targets<'_>) -> Delivery {
    let mut delivery = Delivery::default();

    if options.copy {
        match targets.clipboard.and_then(|c| c.set_text(url.as_str())) {
            Ok(()) => delivery.copied = true,
            Err(e) => {
                warn!("clipboard: {}", e);
                delivery.errors.push(e);
            }
        }
    }

    if options.open {
        match targets.browser.and_then(|b| b.open(url.as_str())) {
            Ok(()) => delivery.opened = true,
            Err(e) => {
                warn!("browser: {}", e);
                delivery.errors.push(e);
            }
        }
    }

    delivery
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::browser::testing::RecordingBrowser;
    use crate::backends::clipboard::testing::RecordingClipboard;

    fn url() -> ResolvedUrl {
        ResolvedUrl::from("https://example.com/a".to_string())
    }

    #[test]
    fn test_deliver_copy_and_open() {
        let clipboard = RecordingClipboard::default();
        let browser = RecordingBrowser::default();
        let delivery = deliver(
            &url(),
            DeliveryOptions {
                copy: true,
                open: true,
            },
            Targets {
                clipboard: Ok(&clipboard),
                browser: Ok(&browser),
            },
        );

        assert!(delivery.copied && delivery.opened);
        assert!(delivery.errors.is_empty());
        assert_eq!(*clipboard.values.borrow(), vec!["https://example.com/a"]);
        assert_eq!(*browser.opened.borrow(), vec!["https://example.com/a"]);
    }

    #[test]
    fn test_deliver_nothing_requested() {
        let clipboard = RecordingClipboard::default();
        let delivery = deliver(
            &url(),
            DeliveryOptions::default(),
            Targets {
                clipboard: Ok(&clipboard),
                browser: Err(DeliveryError::NoBrowser),
            },
        );

        assert!(!delivery.copied && !delivery.opened);
        assert!(delivery.errors.is_empty());
        assert!(clipboard.values.borrow().is_empty());
    }

    #[test]
    fn test_deliver_missing_clipboard() {
        let delivery = deliver(
            &url(),
            DeliveryOptions {
                copy: true,
                open: false,
            },
            Targets {
                clipboard: Err(DeliveryError::NoClipboard),
                browser: Err(DeliveryError::NoBrowser),
            },
        );

        assert!(!delivery.copied);
        assert_eq!(delivery.errors.len(), 1);
        assert_eq!(delivery.errors[0].code(), "CLIPBOARD_FAILED");
    }

    #[test]
    fn test_system_targets_skip_detection() {
        let helpers = SystemTargets::detect(DeliveryOptions::default());
        let targets = helpers.targets();
        assert!(matches!(targets.clipboard, Err(DeliveryError::NoClipboard)));
        assert!(matches!(targets.browser, Err(DeliveryError::NoBrowser)));
    }
}
