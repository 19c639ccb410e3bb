//! Locating installs of the external application.
//!
//! Discovery is a pluggable strategy injected by the caller; the bridge
//! core never probes the system on its own. The provided strategy scans
//! configured root directories (the original probed the Windows registry,
//! which lives with the caller, not here).

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Relative locations of the batch console inside an install root, in
/// preference order.
const CONSOLE_CANDIDATES: [&str; 2] = ["3dsmaxbatch.exe", "3dsmaxbatch"];

/// One candidate install of the external application.
#[derive(Debug, Clone, PartialEq)]
pub struct Install {
    pub root: PathBuf,
    pub console: PathBuf,
    pub version: f32,
}

/// Strategy returning candidate installs, highest version first.
pub trait Discovery {
    fn candidates(&self) -> Vec<Install>;
}

/// Highest-version candidate, if any.
pub fn best(strategy: &dyn Discovery) -> Option<Install> {
    strategy.candidates().into_iter().next()
}

/// Filesystem probe over a list of vendor root directories, e.g.
/// `C:/Program Files/Autodesk`. Each entry whose name ends in a version
/// number and contains a batch console becomes a candidate.
#[derive(Debug, Clone, Default)]
pub struct KnownRoots {
    roots: Vec<PathBuf>,
}

impl KnownRoots {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// The stock vendor directory on Windows.
    pub fn windows_defaults() -> Self {
        Self::new(["C:/Program Files/Autodesk"])
    }

    fn probe_entry(dir: &Path) -> Option<Install> {
        let name = dir.file_name()?.to_str()?;
        let version = parse_version(name)?;
        let console = CONSOLE_CANDIDATES
            .iter()
            .map(|c| dir.join(c))
            .find(|p| p.is_file())?;
        debug!("found install {} (version {version})", dir.display());
        Some(Install {
            root: dir.to_path_buf(),
            console,
            version,
        })
    }
}

impl Discovery for KnownRoots {
    fn candidates(&self) -> Vec<Install> {
        let mut found = Vec::new();
        for root in &self.roots {
            let Ok(entries) = fs::read_dir(root) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir()
                    && let Some(install) = Self::probe_entry(&path)
                {
                    found.push(install);
                }
            }
        }
        found.sort_by(|a, b| b.version.total_cmp(&a.version));
        found
    }
}

/// Version from a trailing number in a directory name. Year-style values
/// normalize to the internal numbering ("2026" and "28.0" compare the
/// same way the vendor's own versioning does).
pub fn parse_version(name: &str) -> Option<f32> {
    let tail: String = name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let tail = tail.trim_matches('.');
    let value: f32 = tail.parse().ok()?;
    if value >= 2020.0 {
        Some(value - 2000.0)
    } else if value > 0.0 {
        Some(value)
    } else {
        None
    }
}
