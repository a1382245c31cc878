use std::path::Path;

use crate::context::{PlatformContext, ensure_dir};
use crate::error::Result;
use crate::types::{AppUsedSpace, Strategy, VolumeSpace};
use crate::volume::{VolumeProbe, first_volume};
use crate::walk::WalkOptions;

/// OS-reported aggregate sizes (`du`).
pub mod aggregate;
/// In-process directory walk.
pub mod walk;

pub use aggregate::AggregateBackend;
pub use walk::WalkBackend;

/// Backend trait for storage measurements
///
/// This trait abstracts how directory sizes are obtained, allowing us to:
/// - Walk the tree ourselves and sum file sizes
/// - Ask the OS for one aggregate figure per directory
/// - Mock for testing
///
/// Volume probing and the app-usage breakdown are shared and built on top of
/// [`probe`](Backend::probe) and [`directory_size`](Backend::directory_size).
pub trait Backend: Send + Sync {
    /// Short name for logs and the CLI
    fn name(&self) -> &'static str;

    /// Probe used for volume capacity
    fn probe(&self) -> &dyn VolumeProbe;

    /// Total size of the directory tree at `path`
    fn directory_size(&self, path: &Path) -> Result<u64>;

    /// Capacity of the first readable volume candidate
    fn volume_space(&self, ctx: &PlatformContext) -> Result<VolumeSpace> {
        first_volume(self.probe(), &ctx.volume_candidates).map(|(_, space)| space)
    }

    /// Space used by the application, split by category
    ///
    /// Any failure aborts the whole breakdown; there are no partial results.
    fn app_used_space(&self, ctx: &PlatformContext) -> Result<AppUsedSpace> {
        let app_used_space = self.directory_size(ctx.bundle()?)?;
        let user_data_space = self.directory_size(ensure_dir(&ctx.data_dir)?)?;

        let mut cache_space = self.directory_size(ensure_dir(&ctx.cache_dir)?)?;
        if let Some(documents) = &ctx.documents_dir {
            let documents_space = self.directory_size(ensure_dir(documents)?)?;
            log::debug!("documents: {documents_space} bytes");
            cache_space = cache_space.saturating_add(documents_space);
        }

        log::debug!(
            "[{}] bundle: {app_used_space}, data: {user_data_space}, cache: {cache_space}",
            self.name()
        );

        Ok(AppUsedSpace {
            app_used_space,
            user_data_space,
            cache_space,
        })
    }
}

/// Build the backend for a strategy.
///
/// Called once per service; the choice does not change afterwards.
pub fn select(strategy: Strategy, options: WalkOptions) -> Result<Box<dyn Backend>> {
    let backend: Box<dyn Backend> = match strategy {
        Strategy::Walk => Box::new(WalkBackend::new(options)),
        Strategy::Aggregate => Box::new(AggregateBackend::new()?),
    };
    log::debug!("Selected {} backend", backend.name());
    Ok(backend)
}
