//! Watch command implementation.

use crate::cli::WatchArgs;
use crate::error::convert_configuration_error;
use crate::error::convert_watch_error;
use crate::launcher;
use crate::launcher::LauncherRoots;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use arcwatch_core::SharedSink;
use arcwatch_core::WatchOptions;
use arcwatch_core::WatchSpec;
use arcwatch_core::sink::FanoutSink;
use arcwatch_core::sink::FileSink;
use arcwatch_core::start_watch;
use arcwatch_core::stop_watch;
use std::sync::Arc;

/// Explicit directories win, then an explicit launcher file, then discovery.
fn resolve_roots(args: &WatchArgs) -> Result<LauncherRoots> {
    if let (Some(source), Some(dest)) = (&args.source, &args.dest) {
        return Ok(LauncherRoots {
            source: source.clone(),
            dest: dest.clone(),
        });
    }

    let config = match &args.launcher_config {
        Some(path) => path.clone(),
        None => launcher::discover()?,
    };
    tracing::info!("[watch] using launcher config {}", config.display());
    launcher::read_roots(&config)
}

fn build_options(args: &WatchArgs) -> WatchOptions {
    let options = WatchOptions::default().with_retry(args.retry.policy());
    match args.workers {
        Some(n) => options.with_workers(usize::from(n)),
        None => options,
    }
}

fn build_sink(args: &WatchArgs, formatter: &dyn OutputFormatter) -> Result<SharedSink> {
    let console = formatter.console_sink();
    let Some(path) = &args.log_file else {
        return Ok(console);
    };

    let file = FileSink::open(path)
        .with_context(|| format!("failed to open log file '{}'", path.display()))?;
    Ok(Arc::new(FanoutSink::new(vec![console, Arc::new(file)])))
}

fn wait_for_ctrl_c() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start signal runtime")?;
    runtime
        .block_on(tokio::signal::ctrl_c())
        .context("failed to listen for Ctrl-C")
}

pub fn execute(args: &WatchArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let roots = resolve_roots(args)?;
    let spec = WatchSpec::new(&roots.source, &roots.dest).map_err(convert_configuration_error)?;
    let options = build_options(args);
    let sink = build_sink(args, formatter)?;

    let handle = start_watch(spec, &options, sink).map_err(convert_watch_error)?;
    formatter.format_watch_started(handle.spec(), &options)?;

    let waited = wait_for_ctrl_c();

    let drain = stop_watch(handle);
    formatter.format_watch_stopping();
    drain.wait();

    waited
}
