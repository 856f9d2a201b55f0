//! Output reporters for path findings (§4.7): rendered as they arrive on
//! the Path Sink Channel.

mod json;
mod text;

use anyhow::{anyhow, Result};
use std::str::FromStr;

use crate::engine::PathFinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" | "jsonl" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

/// Render a single path finding in the given format.
pub fn render(finding: &PathFinding, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::render(finding),
        OutputFormat::Json => json::render(finding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }
}
