//! Diagnostic logging to stderr.
//!
//! Operational lines ("New file detected", "Extracted ...") go through
//! [`LogSink`](arcwatch_core::sink::LogSink) to stdout. This subscriber only
//! carries `tracing` diagnostics such as retry traces and watcher errors.
//!
//! `RUST_LOG` takes precedence over the command-line flags:
//! ```bash
//! RUST_LOG=arcwatch_core=debug arcwatch watch --source dl --dest out
//! ```

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static INIT: Once = Once::new();

/// Level used when `RUST_LOG` is unset.
fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Only the first call takes effect.
pub fn init(verbose: bool, quiet: bool) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(default_directive(verbose, quiet))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .compact()
            .with_filter(filter);

        // A subscriber installed by an embedding test harness wins.
        let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
    });
}
