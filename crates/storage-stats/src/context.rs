//! Explicit description of the application whose storage is measured.
//!
//! The service never looks up the application's identity or directories on
//! its own; the host builds a [`PlatformContext`] and hands it over at
//! construction time.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Application identity and the directories that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformContext {
    /// Application identifier (e.g. `com.example.app`)
    pub app_id: String,
    /// Installed binary/bundle directory. Must exist; never created.
    pub bundle_dir: PathBuf,
    /// Persistent support data directory (user-data space)
    pub data_dir: PathBuf,
    /// Cache directory
    pub cache_dir: PathBuf,
    /// User-visible documents directory, counted with the cache when set
    pub documents_dir: Option<PathBuf>,
    /// Paths probed in order for the canonical volume
    pub volume_candidates: Vec<PathBuf>,
}

impl PlatformContext {
    /// Build a context from explicit directories.
    ///
    /// The data directory is the first volume candidate.
    pub fn new(
        app_id: impl Into<String>,
        bundle_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        let data_dir = data_dir.into();
        Self {
            app_id: app_id.into(),
            bundle_dir: bundle_dir.into(),
            volume_candidates: vec![data_dir.clone()],
            data_dir,
            cache_dir: cache_dir.into(),
            documents_dir: None,
        }
    }

    /// Resolve the platform's conventional locations for `app_id`.
    ///
    /// - bundle: directory containing the running executable
    /// - data: `dirs::data_dir()/<app_id>`
    /// - cache: `dirs::cache_dir()/<app_id>`
    /// - volumes: the home directory
    pub fn for_app(app_id: &str) -> Result<Self> {
        if app_id.trim().is_empty() {
            return Err(Error::InvalidContext("empty application id".to_string()));
        }

        let exe = std::env::current_exe()
            .map_err(|e| Error::InvalidContext(format!("cannot locate executable: {e}")))?;
        let bundle_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::InvalidContext("executable has no parent".to_string()))?;

        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::InvalidContext("no data directory".to_string()))?
            .join(app_id);
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| Error::InvalidContext("no cache directory".to_string()))?
            .join(app_id);
        let home = dirs::home_dir()
            .ok_or_else(|| Error::InvalidContext("no home directory".to_string()))?;

        let mut ctx = Self::new(app_id, bundle_dir, data_dir, cache_dir);
        ctx.volume_candidates = vec![home];
        Ok(ctx)
    }

    /// Count a documents directory together with the cache
    pub fn with_documents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.documents_dir = Some(dir.into());
        self
    }

    /// Replace the volume candidates
    pub fn with_volume_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.volume_candidates = candidates;
        self
    }

    /// Append a volume candidate (probed after the existing ones)
    pub fn push_volume_candidate(&mut self, path: impl Into<PathBuf>) {
        self.volume_candidates.push(path.into());
    }

    /// The bundle directory, which must already exist.
    pub fn bundle(&self) -> Result<&Path> {
        match fs::metadata(&self.bundle_dir) {
            Ok(m) if m.is_dir() => Ok(&self.bundle_dir),
            Ok(_) => Err(Error::DirectoryUnavailable {
                path: self.bundle_dir.clone(),
                source: io::Error::other("not a directory"),
            }),
            Err(e) => Err(Error::DirectoryUnavailable {
                path: self.bundle_dir.clone(),
                source: e,
            }),
        }
    }
}

/// Resolve a well-known directory, creating it if it does not exist yet.
///
/// Creation is a side effect of the query, matching how platforms hand out
/// support/cache/documents directories.
pub fn ensure_dir(path: &Path) -> Result<&Path> {
    match fs::metadata(path) {
        Ok(m) if m.is_dir() => return Ok(path),
        Ok(_) => {
            return Err(Error::DirectoryUnavailable {
                path: path.to_path_buf(),
                source: io::Error::other("not a directory"),
            });
        }
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            return Err(Error::DirectoryUnavailable {
                path: path.to_path_buf(),
                source: e,
            });
        }
        Err(_) => {}
    }

    fs::create_dir_all(path).map_err(|e| Error::DirectoryUnavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Created {}", path.display());
    Ok(path)
}
