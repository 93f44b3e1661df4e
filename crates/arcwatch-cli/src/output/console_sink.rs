//! Console sink for the pipeline's operational lines.

use arcwatch_core::LogSink;
use console::Term;
use console::style;
use serde::Serialize;
use std::sync::Mutex;
use std::sync::PoisonError;

/// What an operational line reports, judged by its leading words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Detected,
    Extracted,
    Failed,
    Other,
}

impl LineKind {
    pub fn of(line: &str) -> Self {
        if line.starts_with("New file detected:") {
            Self::Detected
        } else if line.starts_with("Extracted ") {
            Self::Extracted
        } else if line.starts_with("Extraction ") && line.contains(" failed") {
            Self::Failed
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    Human { quiet: bool, colors: bool },
    Json,
}

/// Prints each line to stdout under a lock.
///
/// In quiet mode only failures are shown; in JSON mode every line becomes
/// one compact JSON object.
pub struct ConsoleSink {
    mode: ConsoleMode,
    term: Mutex<Term>,
}

impl ConsoleSink {
    pub fn new(mode: ConsoleMode) -> Self {
        Self {
            mode,
            term: Mutex::new(Term::stdout()),
        }
    }

    fn render(&self, line: &str) -> Option<String> {
        let kind = LineKind::of(line);
        match self.mode {
            ConsoleMode::Json => {
                #[derive(Serialize)]
                struct WatchLine<'a> {
                    event: LineKind,
                    message: &'a str,
                }

                serde_json::to_string(&WatchLine {
                    event: kind,
                    message: line,
                })
                .ok()
            }
            ConsoleMode::Human { quiet, .. } if quiet && kind != LineKind::Failed => None,
            ConsoleMode::Human { colors: false, .. } => Some(line.to_owned()),
            ConsoleMode::Human { colors: true, .. } => Some(match kind {
                LineKind::Detected => style(line).cyan().to_string(),
                LineKind::Extracted => format!("{} {line}", style("✓").green().bold()),
                LineKind::Failed => style(line).red().to_string(),
                LineKind::Other => line.to_owned(),
            }),
        }
    }
}

impl LogSink for ConsoleSink {
    fn append(&self, line: &str) {
        let Some(rendered) = self.render(line) else {
            return;
        };
        let term = self.term.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = term.write_line(&rendered) {
            tracing::warn!("[console] failed to write line: {e}");
        }
    }
}
