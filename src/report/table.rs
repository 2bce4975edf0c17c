//! Table rendering of a run summary.
//!
//! Requires the `table` feature.
//!
//! ```rust,ignore
//! use secchi::report::table::{SummaryTable, TableStyle};
//!
//! println!("{}", SummaryTable::new().with_style(TableStyle::Rounded).render(&summary));
//! // ╭────────────┬──────────╮
//! // │ Field      │ Value    │
//! // ├────────────┼──────────┤
//! // │ variant    │ bucketed │
//! // │ increase   │ 4000     │
//! // ...
//! ```

use tabled::{settings::Style, Table, Tabled};

use crate::summary::Summary;

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// GitHub-flavored Markdown table
    Markdown,
    /// No borders, just spacing
    Blank,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Renders a [`Summary`] as a two-column table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryTable {
    style: TableStyle,
}

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }

    pub fn render(&self, summary: &Summary) -> String {
        let rows: Vec<FieldRow> = super::fields(summary)
            .into_iter()
            .map(|(name, value)| FieldRow { name, value })
            .collect();

        let mut table = Table::new(&rows);
        self.apply_style(&mut table);
        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::summary::tests::sample;

    #[test]
    fn test_render_contains_values() {
        let output = SummaryTable::new().render(&sample(Variant::Bucketed));
        assert!(output.contains("Field"));
        assert!(output.contains("bucketed"));
        assert!(output.contains("36000"));
        assert!(output.contains("expected"));
    }

    #[test]
    fn test_ascii_style() {
        let output = SummaryTable::new()
            .with_style(TableStyle::Ascii)
            .render(&sample(Variant::Bucketed));
        assert!(output.contains('+'));
        assert!(output.contains('|'));
    }

    #[test]
    fn test_markdown_style() {
        let output = SummaryTable::new()
            .with_style(TableStyle::Markdown)
            .render(&sample(Variant::Bucketed));
        assert!(output.contains("| Field"));
    }

    #[test]
    fn test_blank_style_has_no_borders() {
        let output = SummaryTable::new()
            .with_style(TableStyle::Blank)
            .render(&sample(Variant::SingleLock));
        assert!(output.contains("single-lock"));
        assert!(!output.contains('|'));
        assert!(!output.contains('+'));
    }
}
