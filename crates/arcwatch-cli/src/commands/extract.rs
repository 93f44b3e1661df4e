//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::error::convert_configuration_error;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use arcwatch_core::DestDir;
use arcwatch_core::Extractor;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    if !args.archive.is_file() {
        bail!(
            "Archive not found: {}\n\
             HINT: Check the path; directories cannot be extracted.",
            args.archive.display()
        );
    }

    // Target folder is named after the archive's real parent folder.
    let archive = args
        .archive
        .canonicalize()
        .with_context(|| format!("failed to resolve '{}'", args.archive.display()))?;
    let dest = DestDir::new(&args.dest).map_err(convert_configuration_error)?;

    let policy = args.retry.policy();
    let extractor = Extractor::new().with_retry(policy);

    let outcome = add_archive_context(
        extractor.extract_observed(&archive, dest.as_path(), |attempt| {
            if attempt > 1 {
                formatter.format_warning(&format!(
                    "{} is locked, retrying (attempt {attempt}/{})",
                    archive.display(),
                    policy.max_attempts
                ));
            }
        }),
        &archive,
    )?;

    formatter.format_extraction_result(&archive, &outcome)?;

    Ok(())
}
