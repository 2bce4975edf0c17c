//! JSON rendering of a run summary.
//!
//! Requires the `json` feature.
//!
//! ```rust,ignore
//! use secchi::report::json::JsonReport;
//!
//! let json = JsonReport::new().to_json(&summary)?;
//! // {"variant":"bucketed","threads":4,...,"observed":40000,"expected":40000,...}
//! ```

use serde::Serialize;

use crate::error::Result;
use crate::summary::Summary;

#[derive(Serialize)]
struct Document<'a> {
    #[serde(flatten)]
    summary: &'a Summary,
    conserved: bool,
    drift: i64,
}

/// Serializes a [`Summary`] to JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonReport {
    pretty: bool,
}

impl JsonReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables indented output.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    /// Serializes `summary` plus the derived `conserved` and `drift` fields.
    pub fn to_json(&self, summary: &Summary) -> Result<String> {
        let document = Document {
            summary,
            conserved: summary.is_conserved(),
            drift: summary.drift(),
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(json)
    }
}
