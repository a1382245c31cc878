use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use storage_stats::{PlatformContext, SizeMode, Strategy, WalkOptions};

use crate::cli::TargetArgs;
use crate::paths;

/// App identifier used when neither the config nor the CLI names one
pub const DEFAULT_APP_ID: &str = "storage-space";

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Default config file location
pub fn config_path() -> Result<PathBuf> {
    Ok(paths::config_dir()?.join(CONFIG_FILE))
}

// ============================================================================
// Config
// ============================================================================

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub app_id: Option<String>,
    pub bundle_dir: Option<String>,
    pub data_dir: Option<String>,
    pub cache_dir: Option<String>,
    pub documents_dir: Option<String>,
    pub extra_volumes: Vec<String>,
    pub strategy: Option<Strategy>,
    pub size_mode: Option<SizeMode>,
    pub max_depth: Option<usize>,
}

impl Config {
    /// Load config from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path()?, false),
        };

        if !explicit && !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid {}", path.display()))
    }

    /// Parse config from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config format")
    }

    /// Apply CLI overrides on top of the file values
    pub fn with_overrides(mut self, args: &TargetArgs) -> Self {
        fn set<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        set(&mut self.app_id, args.app_id.as_ref());
        set(&mut self.bundle_dir, args.bundle_dir.as_ref());
        set(&mut self.data_dir, args.data_dir.as_ref());
        set(&mut self.cache_dir, args.cache_dir.as_ref());
        set(&mut self.documents_dir, args.documents_dir.as_ref());
        self.extra_volumes.extend(args.volumes.iter().cloned());

        if let Some(s) = args.strategy {
            self.strategy = Some(s.into());
        }
        if let Some(m) = args.size_mode {
            self.size_mode = Some(m.into());
        }
        if args.max_depth.is_some() {
            self.max_depth = args.max_depth;
        }
        self
    }

    pub fn app_id(&self) -> &str {
        self.app_id.as_deref().unwrap_or(DEFAULT_APP_ID)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy.unwrap_or_default()
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            size_mode: self.size_mode.unwrap_or_default(),
            max_depth: self.max_depth,
        }
    }

    /// Build the platform context: platform defaults, then config values.
    ///
    /// Volume candidates: an explicit data dir first, then the platform
    /// default (home), then `extra_volumes`.
    pub fn context(&self) -> Result<PlatformContext> {
        let mut ctx = PlatformContext::for_app(self.app_id())
            .context("Could not resolve platform directories")?;

        if let Some(dir) = &self.bundle_dir {
            ctx.bundle_dir = paths::expand(dir);
        }
        if let Some(dir) = &self.data_dir {
            ctx.data_dir = paths::expand(dir);
            ctx.volume_candidates.insert(0, ctx.data_dir.clone());
        }
        if let Some(dir) = &self.cache_dir {
            ctx.cache_dir = paths::expand(dir);
        }
        if let Some(dir) = &self.documents_dir {
            ctx.documents_dir = Some(paths::expand(dir));
        }
        for volume in &self.extra_volumes {
            ctx.push_volume_candidate(paths::expand(volume));
        }

        Ok(ctx)
    }
}

// ============================================================================
// Tests
// ============================================================================
