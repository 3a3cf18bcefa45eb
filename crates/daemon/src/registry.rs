use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

pub const REGISTRY_FILE: &str = ".mounty_name";

/// Used when nothing is registered and the hostname is unavailable.
pub const FALLBACK_NAME: &str = "Unknown Device";

/// The persisted display name: one line of text at a well-known path.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.mounty_name`, or `.mounty_name` in the working directory when
    /// there is no home.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(REGISTRY_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The registered name, or `None` when nothing (or only whitespace) is stored.
    pub fn load(&self) -> Result<Option<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.path.display()))
            }
        };

        Ok(content
            .lines()
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string))
    }

    pub fn register(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() || name.contains(['\n', '\r']) {
            bail!("device name must be a single non-empty line");
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, format!("{}\n", name))
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        debug!("Registered {:?} at {}", name, self.path.display());
        Ok(())
    }

    /// Name to announce: the registered one, else the hostname, else
    /// [`FALLBACK_NAME`]. Read once per process.
    pub fn display_name(&self) -> String {
        match self.load() {
            Ok(Some(name)) => return name,
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable registry: {:#}", e),
        }

        hostname::get()
            .map(|h| h.to_string_lossy().trim().to_string())
            .ok()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| FALLBACK_NAME.to_string())
    }
}
