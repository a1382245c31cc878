//! # storage-stats
//!
//! Storage statistics for an application: free/total space of the volume
//! backing its data, and the space the application itself occupies, split
//! into app (bundle/binary), user-data, and cache categories.
//!
//! ## Queries
//!
//! | Operation | Result keys (bytes) |
//! |---|---|
//! | `getLocalStorageStatistic` | `free`, `total` |
//! | `getAppUsedSpace` | `appUsedSpace`, `userDataSpace`, `cacheSpace` |
//!
//! Both are read-only, except that resolving the support, cache and
//! documents directories creates them when they do not exist yet.
//!
//! ## Blocking
//!
//! Every query runs synchronously and `getAppUsedSpace` may walk large
//! directory trees. Run queries off latency-sensitive threads;
//! [`StorageService`] is `Send + Sync` so it can be moved to a worker.
//!
//! ## Error policy
//!
//! Fail fast: an unreadable entry anywhere in a walk, or a directory that
//! cannot be resolved, aborts the whole query with a structured
//! [`Error`]. There are no partial results and no silent zeros.
//!
//! ## Example
//!
//! ```no_run
//! use storage_stats::{PlatformContext, StorageService, Strategy, WalkOptions};
//!
//! let ctx = PlatformContext::for_app("com.example.app").expect("context");
//! let service = StorageService::new(ctx, Strategy::Walk, WalkOptions::default())
//!     .expect("backend");
//!
//! let volume = service.get_local_storage_statistic().expect("volume");
//! println!("{} of {} bytes free", volume.free, volume.total);
//!
//! let usage = service.get_app_used_space().expect("usage");
//! println!("cache: {} bytes", usage.cache_space);
//! ```
//!
//! ## Backends
//!
//! - `walk` (default): traverses each directory and sums file sizes
//! - `aggregate`: asks the OS for one disk-usage figure per directory

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Measurement strategies.
pub mod backend;
/// Method-channel bridge.
pub mod channel;
/// Platform context (application identity and directories).
pub mod context;
/// Error types for storage queries.
pub mod error;
/// Result records and options.
pub mod types;
/// Volume capacity probing.
pub mod volume;
/// Directory-size computation.
pub mod walk;

pub use channel::{CHANNEL_NAME, Method, MethodCall, MethodResponse, StorageChannel};
pub use context::PlatformContext;
pub use error::{Error, NOT_IMPLEMENTED, Result, STORAGE_SPACE_ERROR};
pub use types::{AppUsedSpace, LocalStorageStatistic, SizeMode, Strategy, VolumeSpace};
pub use walk::WalkOptions;

use backend::Backend;

/// Storage Statistics Query Service.
///
/// Holds the platform context and the backend selected for this platform.
/// Each query reads live OS state; nothing is cached between calls.
pub struct StorageService {
    ctx: PlatformContext,
    backend: Box<dyn Backend>,
}

impl StorageService {
    /// Create a service, selecting the backend for `strategy` once.
    pub fn new(ctx: PlatformContext, strategy: Strategy, options: WalkOptions) -> Result<Self> {
        let backend = backend::select(strategy, options)?;
        Ok(Self { ctx, backend })
    }

    /// Create a service with a custom backend (useful for testing).
    pub fn with_backend(ctx: PlatformContext, backend: Box<dyn Backend>) -> Self {
        Self { ctx, backend }
    }

    /// The platform context this service measures
    pub fn context(&self) -> &PlatformContext {
        &self.ctx
    }

    /// Name of the selected backend
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Free and total space of the canonical volume.
    ///
    /// Candidates from the context are probed in order; the first one that
    /// answers wins and no aggregation across volumes takes place.
    ///
    /// # Errors
    ///
    /// - `VolumeUnavailable`: no candidate yielded volume metadata
    /// - `InvalidContext`: the context lists no candidates
    pub fn get_local_storage_statistic(&self) -> Result<LocalStorageStatistic> {
        let space = self.backend.volume_space(&self.ctx)?;
        Ok(LocalStorageStatistic::from(space))
    }

    /// Space used by the application: bundle, user data, and cache.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable`: the bundle is missing, or a well-known
    ///   directory could not be created
    /// - `AttributeReadFailure`: an entry's size could not be read
    pub fn get_app_used_space(&self) -> Result<AppUsedSpace> {
        self.backend.app_used_space(&self.ctx)
    }
}
