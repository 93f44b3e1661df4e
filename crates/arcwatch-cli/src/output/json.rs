//! JSON output formatter for machine-readable results.

use super::console_sink::ConsoleMode;
use super::console_sink::ConsoleSink;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::skip_reason_name;
use anyhow::Result;
use arcwatch_core::ExtractOutcome;
use arcwatch_core::SharedSink;
use arcwatch_core::WatchOptions;
use arcwatch_core::WatchSpec;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::sync::Arc;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ExtractionOutput {
    archive: String,
    format: &'static str,
    target_dir: String,
    files_extracted: usize,
    directories_created: usize,
    entries_skipped: usize,
    bytes_written: u64,
    attempts: u32,
    duration_ms: u128,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct SkippedOutput {
    archive: String,
    reason: &'static str,
}

fn extraction_output(archive: &Path, outcome: &ExtractOutcome) -> Result<String> {
    let json = match outcome {
        ExtractOutcome::Extracted(info) => serde_json::to_string(&JsonOutput::success(
            "extract",
            ExtractionOutput {
                archive: archive.display().to_string(),
                format: info.kind.name(),
                target_dir: info.target_dir.display().to_string(),
                files_extracted: info.files_extracted,
                directories_created: info.directories_created,
                entries_skipped: info.entries_skipped,
                bytes_written: info.bytes_written,
                attempts: info.attempts,
                duration_ms: info.duration.as_millis(),
                warnings: info.warnings.clone(),
            },
        ))?,
        ExtractOutcome::Skipped(reason) => serde_json::to_string(&JsonOutput::skipped(
            "extract",
            SkippedOutput {
                archive: archive.display().to_string(),
                reason: skip_reason_name(*reason),
            },
        ))?,
    };
    Ok(json)
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, archive: &Path, outcome: &ExtractOutcome) -> Result<()> {
        let json = extraction_output(archive, outcome)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn format_watch_started(&self, spec: &WatchSpec, options: &WatchOptions) -> Result<()> {
        #[derive(Serialize)]
        struct WatchStarted {
            source: String,
            destination: String,
            workers: usize,
            max_attempts: u32,
            retry_interval_ms: u128,
        }

        Self::output(&JsonOutput::success(
            "watch",
            WatchStarted {
                source: spec.source_root().display().to_string(),
                destination: spec.destination_root().display().to_string(),
                workers: options.workers,
                max_attempts: options.retry.max_attempts,
                retry_interval_ms: options.retry.interval.as_millis(),
            },
        ))
    }

    fn format_watch_stopping(&self) {
        #[derive(Serialize)]
        struct Stopping {
            draining: bool,
        }

        let _ = Self::output(&JsonOutput::success("stop", Stopping { draining: true }));
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }

    fn console_sink(&self) -> SharedSink {
        Arc::new(ConsoleSink::new(ConsoleMode::Json))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use arcwatch_core::ArchiveKind;
    use arcwatch_core::ExtractedInfo;
    use arcwatch_core::SkipReason;
    use std::path::PathBuf;

    #[test]
    fn test_extracted_output() {
        let mut info = ExtractedInfo::new(ArchiveKind::Zip, PathBuf::from("/out/ReleaseA"));
        info.files_extracted = 2;
        info.attempts = 3;

        let json = extraction_output(
            Path::new("/dl/ReleaseA/game.zip"),
            &ExtractOutcome::Extracted(info),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["operation"], "extract");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["format"], "zip");
        assert_eq!(value["data"]["files_extracted"], 2);
        assert_eq!(value["data"]["attempts"], 3);
    }

    #[test]
    fn test_skipped_output() {
        let json = extraction_output(
            Path::new("/dl/ReleaseA/readme.nfo"),
            &ExtractOutcome::Skipped(SkipReason::UnrecognizedFormat),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "skipped");
        assert_eq!(value["data"]["reason"], "unrecognized");
    }
}
