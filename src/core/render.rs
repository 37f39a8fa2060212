//! Renderer module
//!
//! Renders ResultSet to different output formats: raw, jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One URL per line, nothing else. What editor hosts read.
    #[default]
    Raw,
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(OutputFormat::Raw),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Raw => self.render_raw(result_set),
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render to a writer, followed by a newline when there is any output
    pub fn render_to<W: Write>(&self, result_set: &ResultSet, mut writer: W) -> std::io::Result<()> {
        let output = self.render(result_set);
        if output.is_empty() {
            return Ok(());
        }
        writer.write_all(output.as_bytes())?;
        if !output.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut urls = Vec::new();
        let mut tools = Vec::new();
        let mut commands = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Url => urls.push(item),
                Kind::Tool => tools.push(item),
                Kind::Command => commands.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !urls.is_empty() {
            output.push_str("## URLs\n\n");
            for item in urls {
                self.render_url_md(&mut output, item);
            }
            output.push('\n');
        }

        if !commands.is_empty() {
            output.push_str("## Commands\n\n");
            for item in commands {
                output.push_str(&format!(
                    "- `{}`: {}\n",
                    item.locator.as_deref().unwrap_or_default(),
                    item.excerpt.as_deref().unwrap_or_default()
                ));
            }
            output.push('\n');
        }

        if !tools.is_empty() {
            output.push_str("## Tools\n\n");
            for item in tools {
                if let Some(excerpt) = &item.excerpt {
                    output.push_str(&format!("- {}\n", excerpt));
                }
            }
            output.push('\n');
        }

        output
    }

    fn render_url_md(&self, output: &mut String, item: &ResultItem) {
        let url = item.url.as_deref().unwrap_or_default();
        match &item.locator {
            Some(locator) => output.push_str(&format!("- `{}` → <{}>", locator, url)),
            None => output.push_str(&format!("- <{}>", url)),
        }
        if item.meta.copied {
            output.push_str(" (copied)");
        }
        if item.meta.opened {
            output.push_str(" (opened)");
        }
        output.push('\n');
    }

    /// Raw mode: URLs for url items, text for the others, nothing for errors
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| match item.kind {
                Kind::Url => item.url.clone(),
                Kind::Command => Some(format!(
                    "{}\t{}",
                    item.locator.as_deref().unwrap_or_default(),
                    item.excerpt.as_deref().unwrap_or_default()
                )),
                Kind::Tool => item.excerpt.clone(),
                Kind::Error => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::VcsError;
    use crate::locator::Locator;
    use std::path::PathBuf;

    fn url_item(path: &str, url: &str) -> ResultItem {
        ResultItem::url(&Locator::FilePath(PathBuf::from(path)), url)
    }

    #[test]
    fn test_render_raw_prints_only_urls() {
        let mut result_set = ResultSet::new();
        result_set.push(url_item("/r/a.rs", "https://example.com/a"));
        result_set.push(ResultItem::error(VcsError::new("EMPTY_OUTPUT", "nothing")));

        let output = Renderer::new(OutputFormat::Raw).render(&result_set);
        assert_eq!(output, "https://example.com/a");
    }

    #[test]
    fn test_render_jsonl() {
        let mut result_set = ResultSet::new();
        result_set.push(url_item("/r/a.rs", "https://example.com/a"));
        result_set.push(url_item("/r/b.rs", "https://example.com/b"));

        let output = Renderer::new(OutputFormat::Jsonl).render(&result_set);

        assert!(output.contains("\"locator_kind\":\"file\""));
        assert!(output.contains("https://example.com/b"));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_render_json() {
        let mut result_set = ResultSet::new();
        result_set.push(url_item("/r/a.rs", "https://example.com/a"));

        let output = Renderer::new(OutputFormat::Json).render(&result_set);

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
        assert_eq!("JSONL".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);

        let result = "yaml".parse::<OutputFormat>();
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Raw);
        assert!(!RenderConfig::default().pretty);
    }

    #[test]
    fn test_render_json_pretty() {
        let mut result_set = ResultSet::new();
        result_set.push(url_item("/r/a.rs", "https://example.com/a"));

        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::with_config(config).render(&result_set);

        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_markdown_sections() {
        let mut result_set = ResultSet::new();
        let mut item = url_item("/r/a.rs", "https://example.com/a");
        item.meta.copied = true;
        result_set.push(item);
        result_set.push(ResultItem::error(VcsError::new("RESOLVER_FAILED", "exit 2")));
        result_set.push(ResultItem::command("vcs-url-buffer", "Resolve the whole buffer"));

        let output = Renderer::new(OutputFormat::Markdown).render(&result_set);

        assert!(output.contains("## Errors"));
        assert!(output.contains("**RESOLVER_FAILED**: exit 2"));
        assert!(output.contains("## URLs"));
        assert!(output.contains("`/r/a.rs` → <https://example.com/a> (copied)"));
        assert!(output.contains("## Commands"));
    }

    #[test]
    fn test_render_markdown_empty() {
        let output = Renderer::new(OutputFormat::Markdown).render(&ResultSet::new());
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_to_writer_appends_newline() {
        let mut result_set = ResultSet::new();
        result_set.push(url_item("/r/a.rs", "https://example.com/a"));

        let mut buffer = Vec::new();
        Renderer::new(OutputFormat::Raw)
            .render_to(&result_set, &mut buffer)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "https://example.com/a\n");

        let mut empty = Vec::new();
        Renderer::new(OutputFormat::Raw)
            .render_to(&ResultSet::new(), &mut empty)
            .unwrap();
        assert!(empty.is_empty());
    }
}
