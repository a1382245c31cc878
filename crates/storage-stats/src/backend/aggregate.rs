//! Aggregate backend implementation.
//!
//! Asks the OS for one disk-usage figure per directory (`du -sk`) instead of
//! walking the tree in-process. Figures are in KiB and include the blocks
//! held by the directories themselves, so an empty directory reports a small
//! non-zero size on most filesystems.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::volume::{StatvfsProbe, VolumeProbe};

use super::Backend;

/// Backend reading directory usage from the system `du` tool.
pub struct AggregateBackend {
    probe: Box<dyn VolumeProbe>,
}

impl AggregateBackend {
    /// Create a new AggregateBackend.
    ///
    /// Returns an error if `du` is not available.
    pub fn new() -> Result<Self> {
        if !Self::is_available() {
            return Err(Error::attribute("du", "disk usage tool not found"));
        }
        Ok(Self {
            probe: Box::new(StatvfsProbe),
        })
    }

    /// Check if `du` is available on this system.
    pub fn is_available() -> bool {
        Command::new("which")
            .arg("du")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Replace the volume probe (useful for testing).
    pub fn with_probe(mut self, probe: Box<dyn VolumeProbe>) -> Self {
        self.probe = probe;
        self
    }
}

impl Backend for AggregateBackend {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    fn probe(&self) -> &dyn VolumeProbe {
        self.probe.as_ref()
    }

    fn directory_size(&self, path: &Path) -> Result<u64> {
        // du reports a symlink itself rather than its target
        let resolved = std::fs::canonicalize(path).map_err(|e| Error::DirectoryUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?;
        if !resolved.is_dir() {
            return Err(Error::DirectoryUnavailable {
                path: path.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            });
        }

        let output = Command::new("du")
            .arg("-sk")
            .arg(&resolved)
            .output()
            .map_err(|e| Error::attribute(path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::warn!("du failed for {}: {}", path.display(), stderr);
            return Err(Error::attribute(path, stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_du_kib(&stdout)
            .map(|kib| kib.saturating_mul(1024))
            .ok_or_else(|| Error::attribute(path, format!("unexpected du output: {stdout}")))
    }
}

/// Parse the leading KiB figure of `du -sk` output: `<kib>\t<path>`.
fn parse_du_kib(output: &str) -> Option<u64> {
    output.split_whitespace().next()?.parse().ok()
}
