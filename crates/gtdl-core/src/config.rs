use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loaded from `~/.config/gtdl/config.toml` (or `--config`).
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Account name used for the site login.
    pub user: String,
    /// Account password.
    pub password: String,
    /// Absolute URL of the course page to crawl.
    #[serde(rename = "course-url")]
    pub course_url: String,
    /// Directory the chapter/tutorial/lesson tree is written under.
    pub basedir: PathBuf,
}

// Debug must never leak the password into logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("course_url", &self.course_url)
            .field("basedir", &self.basedir)
            .finish()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gtdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from `path`, or from the default XDG location when `None`.
///
/// There is no default file to fall back on (credentials have no sensible
/// default), so a missing or unreadable file is a fatal error.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let cfg: Config = toml::from_str(&data)
        .with_context(|| format!("invalid config file: {}", path.display()))?;
    Ok(cfg)
}
