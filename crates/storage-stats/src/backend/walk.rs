//! Walk backend: sums file sizes by traversing each directory tree.

use std::path::Path;

use crate::error::Result;
use crate::volume::{StatvfsProbe, VolumeProbe};
use crate::walk::{WalkOptions, directory_size};

use super::Backend;

/// Backend that measures directories with [`directory_size`].
pub struct WalkBackend {
    options: WalkOptions,
    probe: Box<dyn VolumeProbe>,
}

impl WalkBackend {
    /// Create a walk backend probing volumes with `statvfs`.
    pub fn new(options: WalkOptions) -> Self {
        Self {
            options,
            probe: Box::new(StatvfsProbe),
        }
    }

    /// Replace the volume probe (useful for testing).
    pub fn with_probe(mut self, probe: Box<dyn VolumeProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Walk options in effect
    pub fn options(&self) -> &WalkOptions {
        &self.options
    }
}

impl Default for WalkBackend {
    fn default() -> Self {
        Self::new(WalkOptions::default())
    }
}

impl Backend for WalkBackend {
    fn name(&self) -> &'static str {
        "walk"
    }

    fn probe(&self) -> &dyn VolumeProbe {
        self.probe.as_ref()
    }

    fn directory_size(&self, path: &Path) -> Result<u64> {
        directory_size(path, &self.options)
    }
}
