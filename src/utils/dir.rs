use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

const APPLICATION_DIR: &str = "tasktimer";

/// Resolves `$XDG_STATE_HOME/tasktimer` (or `$HOME/.local/state/tasktimer`, `%APPDATA%\tasktimer`
/// on Windows) and makes sure it exists.
pub fn create_application_default_path() -> Result<PathBuf> {
    let base = {
        cfg_if::cfg_if! {
            if #[cfg(windows)] {
                env::var("APPDATA")
                    .map(PathBuf::from)
                    .map_err(|_| anyhow!("APPDATA should be present on Windows"))?
            } else {
                env::var("XDG_STATE_HOME")
                    .map(PathBuf::from)
                    .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".local/state")))
                    .map_err(|_| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))?
            }
        }
    };
    create_application_path(&base)
}

pub fn create_application_path(base: &Path) -> Result<PathBuf> {
    let path = base.join(APPLICATION_DIR);
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
