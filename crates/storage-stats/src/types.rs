use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat key/value result carried across the bridge.
pub type ResultMap = BTreeMap<String, i64>;

/// Byte counts cross the bridge as int64.
fn wire(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}

/// Free and total capacity of the canonical storage volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStorageStatistic {
    /// Free bytes
    pub free: u64,
    /// Total bytes
    pub total: u64,
}

impl LocalStorageStatistic {
    /// Create a statistic, clamping `free` so that `free <= total` holds.
    pub fn new(free: u64, total: u64) -> Self {
        if free > total {
            log::debug!("free space {free} exceeds total {total}, clamping");
        }
        Self {
            free: free.min(total),
            total,
        }
    }

    /// Bytes in use on the volume
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }

    /// Bridge form: `free`, `total`
    pub fn to_map(&self) -> ResultMap {
        BTreeMap::from([
            ("free".to_string(), wire(self.free)),
            ("total".to_string(), wire(self.total)),
        ])
    }
}

impl From<VolumeSpace> for LocalStorageStatistic {
    fn from(space: VolumeSpace) -> Self {
        Self::new(space.free, space.total)
    }
}

/// Space used by the application, split by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUsedSpace {
    /// Installed binary/bundle
    pub app_used_space: u64,
    /// Persistent support data, excluding cache
    pub user_data_space: u64,
    /// Reclaimable cache (plus documents, where configured)
    pub cache_space: u64,
}

impl AppUsedSpace {
    /// Sum of all three categories
    pub fn total(&self) -> u64 {
        self.app_used_space
            .saturating_add(self.user_data_space)
            .saturating_add(self.cache_space)
    }

    /// Bridge form: `appUsedSpace`, `userDataSpace`, `cacheSpace`
    pub fn to_map(&self) -> ResultMap {
        BTreeMap::from([
            ("appUsedSpace".to_string(), wire(self.app_used_space)),
            ("userDataSpace".to_string(), wire(self.user_data_space)),
            ("cacheSpace".to_string(), wire(self.cache_space)),
        ])
    }
}

/// Raw capacity figures reported by a volume probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSpace {
    /// Capacity in bytes
    pub total: u64,
    /// Bytes available to unprivileged users
    pub free: u64,
}

/// How a file's size is counted during a directory walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    /// Allocated-on-disk size where the OS reports it, else logical length
    #[default]
    Allocated,
    /// Logical file length
    Logical,
}

/// Which backend measures application directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Walk the directory tree and sum file sizes
    #[default]
    Walk,
    /// Ask the OS for one aggregate figure per directory
    Aggregate,
}
