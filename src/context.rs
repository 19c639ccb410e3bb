use crate::error::Result;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Explicit per-session state for bridge operations.
///
/// The cache directory holds per-operation scratch directories; the log
/// path is only quoted in user-facing failure messages so people know
/// where to look.
#[derive(Debug, Clone)]
pub struct BridgeContext {
    pub cache_dir: PathBuf,
    pub log_path: PathBuf,
    pub timeout: Duration,
}

impl BridgeContext {
    /// Bound on one external converter run.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    pub fn new(cache_dir: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            cache_dir,
            log_path: log_path.into(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Context rooted in the system temp directory.
    pub fn in_temp_dir() -> Result<Self> {
        let base = std::env::temp_dir();
        Self::new(base.join("maxbridge_cache"), base.join("maxbridge.log"))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scratch directory for one operation. Dropped on every exit path,
    /// which removes the directory and everything staged inside it.
    pub fn scratch_dir(&self, prefix: &str) -> Result<TempDir> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&self.cache_dir)?;
        Ok(dir)
    }

    /// "See log: ..." suffix appended to user-facing failure messages.
    pub fn log_pointer(&self) -> String {
        format!("see log: {}", self.log_path.display())
    }
}
