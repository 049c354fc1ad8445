use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;

use crate::cli::Cli;

pub fn resolve_settings_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = cli.settings_path.as_ref() {
        return Ok(path.clone());
    }
    let dirs = ProjectDirs::from("dev", "autovolume", "autovolume")
        .ok_or_else(|| anyhow!("failed to resolve default config directory"))?;
    let dir = dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join("settings.json"))
}
