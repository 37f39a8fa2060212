//! Flows module - Commands combining locator construction, resolution and delivery
//!
//! Provides:
//! - action: Run a host action (buffer/region/point/word/dwim) through an external resolver
//! - resolve: Run the built-in resolver on a locator string

pub mod action;
pub mod resolve;
