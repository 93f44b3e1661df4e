//! Human-readable output formatter with colors and styling.

use super::console_sink::ConsoleMode;
use super::console_sink::ConsoleSink;
use super::formatter::OutputFormatter;
use super::formatter::skip_reason_text;
use anyhow::Result;
use arcwatch_core::ExtractOutcome;
use arcwatch_core::SharedSink;
use arcwatch_core::WatchOptions;
use arcwatch_core::WatchSpec;
use console::Term;
use console::style;
use std::path::Path;
use std::sync::Arc;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn headline(&self, mark: &str, text: &str) {
        let line = if self.use_colors {
            format!("{} {text}", style(mark).green().bold())
        } else {
            text.to_owned()
        };
        let _ = self.term.write_line(&line);
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, archive: &Path, outcome: &ExtractOutcome) -> Result<()> {
        let info = match outcome {
            ExtractOutcome::Extracted(info) => info,
            ExtractOutcome::Skipped(reason) => {
                self.format_warning(&format!(
                    "Nothing extracted from {}: {}",
                    archive.display(),
                    skip_reason_text(*reason)
                ));
                return Ok(());
            }
        };

        if self.quiet {
            return Ok(());
        }

        self.headline(
            "✓",
            &format!("Extracted {} into {}", archive.display(), info.target_dir.display()),
        );
        let _ = self.term.write_line(&format!("  Format: {}", info.kind));
        let _ = self
            .term
            .write_line(&format!("  Files extracted: {}", info.files_extracted));
        let _ = self
            .term
            .write_line(&format!("  Directories: {}", info.directories_created));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(info.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Entries skipped: {}", info.entries_skipped));
            let _ = self
                .term
                .write_line(&format!("  Attempts: {}", info.attempts));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", info.duration));
        }

        for warning in &info.warnings {
            self.format_warning(warning);
        }

        Ok(())
    }

    fn format_watch_started(&self, spec: &WatchSpec, options: &WatchOptions) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(
            "●",
            &format!("Watching {}", spec.source_root().display()),
        );
        let _ = self.term.write_line(&format!(
            "  Extracting into: {}",
            spec.destination_root().display()
        ));
        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Workers: {}", options.workers));
            let _ = self.term.write_line(&format!(
                "  Retry: {} attempts, {:?} apart",
                options.retry.max_attempts, options.retry.interval
            ));
        }
        let _ = self.term.write_line("Press Ctrl-C to stop.");

        Ok(())
    }

    fn format_watch_stopping(&self) {
        if self.quiet {
            return;
        }
        let _ = self
            .term
            .write_line("Stopping: waiting for running extractions to finish...");
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }

    fn console_sink(&self) -> SharedSink {
        Arc::new(ConsoleSink::new(ConsoleMode::Human {
            quiet: self.quiet,
            colors: self.use_colors,
        }))
    }
}
