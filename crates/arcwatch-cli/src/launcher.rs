//! Source/destination discovery from the Crackpipe launcher's config file.
//!
//! The launcher keeps a line-oriented `key=value` file under
//! `%LOCALAPPDATA%\Packages\Phalcode.*\LocalCache\Roaming\Crackpipe\config\user`.
//! Its `RootPath` entry names the folder holding `Crackpipe\Downloads` and
//! `Crackpipe\Installations`.

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

const ROOT_PATH_KEY: &str = "RootPath";

/// Watch roots derived from the launcher's `RootPath`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherRoots {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl LauncherRoots {
    pub fn from_root(root: &Path) -> Self {
        let crackpipe = root.join("Crackpipe");
        Self {
            source: crackpipe.join("Downloads"),
            dest: crackpipe.join("Installations"),
        }
    }
}

/// Value of the first line whose key is `RootPath` (any case).
pub fn parse_root_path(content: &str) -> Option<PathBuf> {
    content.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case(ROOT_PATH_KEY) {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then(|| PathBuf::from(value))
    })
}

/// Reads `config` and derives the watch roots.
pub fn read_roots(config: &Path) -> Result<LauncherRoots> {
    let content = fs::read_to_string(config)
        .with_context(|| format!("failed to read launcher config '{}'", config.display()))?;

    let root = parse_root_path(&content).ok_or_else(|| {
        anyhow!(
            "No RootPath entry in launcher config '{}'\n\
             HINT: Pass --source and --dest explicitly.",
            config.display()
        )
    })?;

    Ok(LauncherRoots::from_root(&root))
}

/// Finds the launcher config under `local_app_data`.
pub fn discover_in(local_app_data: &Path) -> Option<PathBuf> {
    let pattern = local_app_data
        .join("Packages")
        .join("Phalcode.*")
        .join("LocalCache")
        .join("Roaming")
        .join("Crackpipe")
        .join("config")
        .join("user");
    let pattern = pattern.to_str()?;
    let escaped = glob::Pattern::escape(pattern).replace("Phalcode.[*]", "Phalcode.*");

    glob::glob(&escaped)
        .ok()?
        .filter_map(std::result::Result::ok)
        .find(|path| path.is_file())
}

/// Finds the launcher config under the user's local application data folder.
pub fn discover() -> Result<PathBuf> {
    let local = dirs::data_local_dir().ok_or_else(|| {
        anyhow!(
            "Cannot locate the local application data folder\n\
             HINT: Pass --launcher-config or --source and --dest."
        )
    })?;

    discover_in(&local).ok_or_else(|| {
        anyhow!(
            "Launcher config not found under '{}'\n\
             HINT: Pass --launcher-config or --source and --dest.",
            local.display()
        )
    })
}
