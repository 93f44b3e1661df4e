//! CLI argument parsing using clap.

use arcwatch_core::RetryPolicy;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "arcwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch a download folder and extract every archive that appears
    Watch(WatchArgs),
    /// Extract a single archive into DEST/<parent folder name>
    Extract(ExtractArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Folder to watch recursively
    #[arg(long, value_name = "DIR", requires = "dest", conflicts_with = "launcher_config")]
    pub source: Option<PathBuf>,

    /// Folder archives are extracted into (must exist)
    #[arg(long, value_name = "DIR", requires = "source")]
    pub dest: Option<PathBuf>,

    /// Launcher config file to read RootPath from (default: auto-discover)
    #[arg(long, value_name = "FILE")]
    pub launcher_config: Option<PathBuf>,

    /// Number of extraction workers (default: number of CPUs)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Append operational log lines to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub retry: RetryArgs,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination root; contents land in DEST/<archive's parent folder>
    #[arg(short, long, value_name = "DIR")]
    pub dest: PathBuf,

    #[command(flatten)]
    pub retry: RetryArgs,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(clap::Args)]
pub struct RetryArgs {
    /// Attempts before giving up on a locked file
    #[arg(
        long,
        value_name = "N",
        default_value_t = RetryPolicy::DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    /// Wait between attempts (e.g. 5, 5s, 500ms, 1m)
    #[arg(long, value_name = "INTERVAL", default_value = "5s", value_parser = parse_interval)]
    pub retry_interval: Duration,
}

impl RetryArgs {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_interval)
    }
}

/// Parse a duration with optional suffix (ms, s, m); bare numbers are seconds
#[allow(clippy::option_if_let_else)]
fn parse_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty interval".to_string());
    }

    let (num_str, millis_per_unit) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, 1)
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1000)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60_000)
    } else {
        (s, 1000)
    };

    num_str
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid interval: {s}"))
        .and_then(|n| {
            n.checked_mul(millis_per_unit)
                .ok_or_else(|| format!("interval overflow: {s}"))
        })
        .map(Duration::from_millis)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("5").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_interval("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_interval("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_interval("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_interval("0").unwrap(), Duration::ZERO);
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("").is_err());
        assert!(parse_interval("-1s").is_err());
    }

    #[test]
    fn test_parse_interval_overflow() {
        assert!(parse_interval("18446744073709551615m").is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_retry_policy() {
        let cli = Cli::try_parse_from(["arcwatch", "extract", "a.zip", "--dest", "out"]).unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.retry.policy(), RetryPolicy::default());
    }

    #[test]
    fn test_source_requires_dest() {
        assert!(Cli::try_parse_from(["arcwatch", "watch", "--source", "dl"]).is_err());
        assert!(
            Cli::try_parse_from([
                "arcwatch",
                "watch",
                "--source",
                "dl",
                "--dest",
                "out",
                "--launcher-config",
                "user"
            ])
            .is_err()
        );
    }
}
