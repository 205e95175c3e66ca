//! Output module for rendering check and crawl results
//!
//! This module handles:
//! - JSON serialization of any report
//! - Markdown site reports
//! - XML sitemaps from crawl results
//! - Writing rendered output to a file or stdout

mod markdown;
mod sitemap;

pub use markdown::format_markdown_report;
pub use sitemap::format_sitemap;

use crate::ScopeError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Serializes a report as pretty-printed JSON
pub fn to_json<T: Serialize>(report: &T) -> Result<String, ScopeError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes rendered output to `path`, or to stdout when no path is given
///
/// A trailing newline is added if missing.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), ScopeError> {
    let mut content = content.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }

    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!("Wrote output to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CrawlResult;
    use tempfile::TempDir;

    #[test]
    fn test_crawl_result_json_shape() {
        let result = CrawlResult {
            urls: vec!["http://example.test/".to_string()],
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&result).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"urls": ["http://example.test/"]}));
    }

    #[test]
    fn test_write_output_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.md");

        write_output("# Report", Some(&path)).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report\n");
    }
}
