//! Output formatter trait for CLI results.

use anyhow::Result;
use arcwatch_core::ExtractOutcome;
use arcwatch_core::SharedSink;
use arcwatch_core::SkipReason;
use arcwatch_core::WatchOptions;
use arcwatch_core::WatchSpec;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a one-shot extraction
    fn format_extraction_result(&self, archive: &Path, outcome: &ExtractOutcome) -> Result<()>;

    /// Announce a watch that has just started
    fn format_watch_started(&self, spec: &WatchSpec, options: &WatchOptions) -> Result<()>;

    /// Announce that intake is closed and in-flight tasks are draining
    fn format_watch_stopping(&self);

    /// Format warning message
    fn format_warning(&self, message: &str);

    /// Console sink that prints the pipeline's operational lines in this
    /// formatter's style
    fn console_sink(&self) -> SharedSink;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Skipped,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
        }
    }

    pub fn skipped(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Skipped,
            data: Some(data),
        }
    }
}

/// Short machine-friendly name of a skip reason
pub const fn skip_reason_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::VanishedSource => "vanished",
        SkipReason::UnrecognizedFormat => "unrecognized",
    }
}

/// Sentence describing a skip reason
pub const fn skip_reason_text(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::VanishedSource => "the file disappeared before it could be opened",
        SkipReason::UnrecognizedFormat => "not a supported archive",
    }
}
