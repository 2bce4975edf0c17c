//! Rendering a [`Summary`] for the operator.
//!
//! - [`Format::Text`]: the classic one-line `Final: ...` report
//! - [`Format::Table`]: a table via `tabled` in any [`table::TableStyle`] (feature `table`)
//! - [`Format::Json`]: a JSON document via `serde_json` (feature `json`)
//!
//! # Example
//!
//! ```rust
//! use secchi::config::Config;
//! use secchi::coordinator::Coordinator;
//! use secchi::report::{render, Format};
//!
//! let summary = Coordinator::new(Config::new(1, 10, 2).unwrap()).run().unwrap();
//! let line = render(&summary, Format::Text).unwrap();
//! assert!(line.starts_with("Final: increasing"));
//! ```

use crate::error::Result;
use crate::summary::Summary;

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;

/// Output format of the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Single `Final: ...` line.
    #[default]
    Text,
    /// Two-column table of every summary field.
    #[cfg(feature = "table")]
    Table(table::TableStyle),
    /// Pretty-printed JSON object.
    #[cfg(feature = "json")]
    Json,
}

/// Renders `summary` in the requested format.
pub fn render(summary: &Summary, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(summary.to_string()),
        #[cfg(feature = "table")]
        Format::Table(style) => Ok(table::SummaryTable::new().with_style(style).render(summary)),
        #[cfg(feature = "json")]
        Format::Json => json::JsonReport::new().pretty(true).to_json(summary),
    }
}

/// The `(name, value)` pairs shown by the table report, in display order.
pub fn fields(summary: &Summary) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("variant", summary.variant.to_string()),
        ("threads", summary.threads.to_string()),
        ("workers", summary.workers.to_string()),
        ("buckets", summary.bucket_size.to_string()),
        ("iterations", summary.iterations.to_string()),
        ("increase", summary.total_increase.to_string()),
        ("decrease", summary.total_decrease.to_string()),
        ("diff", summary.diff.to_string()),
        ("got", summary.observed.to_string()),
        ("expected", summary.expected.to_string()),
        ("operations", summary.operations.to_string()),
    ];
    if summary.balanced_operations + summary.crossed_operations > 0 {
        fields.push(("balanced", summary.balanced_operations.to_string()));
        fields.push(("crossed", summary.crossed_operations.to_string()));
    }
    if let Some(claimed) = summary.claimed {
        fields.push(("claimed", claimed.to_string()));
    }
    fields.push(("last diff", summary.last_diff.to_string()));
    fields.push(("elapsed (us)", summary.elapsed_us.to_string()));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::summary::tests::sample;

    #[test]
    fn test_render_text() {
        let summary = sample(Variant::Bucketed);
        assert_eq!(
            render(&summary, Format::Text).unwrap(),
            "Final: increasing 4000 decreasing 36000 diff 32000 got 40000 expected 40000"
        );
    }

    #[cfg(feature = "table")]
    #[test]
    fn test_render_table_style() {
        let summary = sample(Variant::Bucketed);
        let ascii = render(&summary, Format::Table(table::TableStyle::Ascii)).unwrap();
        let markdown = render(&summary, Format::Table(table::TableStyle::Markdown)).unwrap();

        assert!(ascii.starts_with('+'));
        assert!(markdown.starts_with("| Field"));
        assert!(markdown.contains("| 40000"));
    }

    #[test]
    fn test_fields_bucketed() {
        let fields = fields(&sample(Variant::Bucketed));
        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert!(names.contains(&"balanced"));
        assert!(names.contains(&"crossed"));
        assert!(!names.contains(&"claimed"));
        assert_eq!(fields[0], ("variant", "bucketed".to_string()));
    }

    #[test]
    fn test_fields_budget() {
        let mut summary = sample(Variant::Budget);
        summary.balanced_operations = 0;
        summary.crossed_operations = 0;
        summary.claimed = Some(1000);

        let fields = fields(&summary);
        assert!(fields.contains(&("claimed", "1000".to_string())));
        assert!(!fields.iter().any(|(name, _)| *name == "balanced"));
    }
}
