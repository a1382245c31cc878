//! Directory-size computation by walking a file tree.
//!
//! Symbolic links below the root are not followed: a link contributes its own
//! size, so link cycles cannot occur. A root that is itself a link to a
//! directory is resolved and walked. Directories contribute nothing themselves, which
//! makes an empty directory size 0 and the total additive over children.
//!
//! Unreadable entries abort the walk (fail fast). In [`SizeMode::Allocated`]
//! totals are counted in 512-byte blocks on Unix and usually exceed the
//! logical sum of file lengths.

use std::fs::Metadata;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::SizeMode;

/// Options for a directory walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// How each file's size is counted
    pub size_mode: SizeMode,
    /// Maximum depth below the root (unbounded when `None`)
    pub max_depth: Option<usize>,
}

impl WalkOptions {
    /// Options with the given size mode and no depth limit
    pub fn new(size_mode: SizeMode) -> Self {
        Self {
            size_mode,
            max_depth: None,
        }
    }
}

/// Sum the sizes of every file under `root`.
pub fn directory_size(root: &Path, options: &WalkOptions) -> Result<u64> {
    let root_meta = std::fs::metadata(root).map_err(|e| Error::DirectoryUnavailable {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !root_meta.is_dir() {
        return Err(Error::DirectoryUnavailable {
            path: root.to_path_buf(),
            source: io::Error::other("not a directory"),
        });
    }

    let mut walker = WalkDir::new(root).follow_links(false);
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut total: u64 = 0;
    for entry in walker {
        let entry = entry.map_err(|e| entry_error(root, e))?;

        // The root is walked through its link when it is one
        if entry.depth() == 0 || entry.file_type().is_dir() {
            continue;
        }

        let metadata = entry
            .metadata()
            .map_err(|e| Error::attribute(entry.path(), e))?;
        total = total.saturating_add(file_size(&metadata, options.size_mode));
    }

    log::trace!("{}: {} bytes", root.display(), total);
    Ok(total)
}

/// Map a walk error to the entry it happened on, falling back to the root.
fn entry_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    Error::attribute(path, err)
}

/// Size of a single entry under the given mode.
#[cfg(unix)]
pub fn file_size(metadata: &Metadata, mode: SizeMode) -> u64 {
    use std::os::unix::fs::MetadataExt;

    match mode {
        // st_blocks is always in 512-byte units regardless of st_blksize
        SizeMode::Allocated => metadata.blocks().saturating_mul(512),
        SizeMode::Logical => metadata.len(),
    }
}

/// Size of a single entry under the given mode.
///
/// Allocation size is not reported here, so both modes use the logical length.
#[cfg(not(unix))]
pub fn file_size(metadata: &Metadata, _mode: SizeMode) -> u64 {
    metadata.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn logical() -> WalkOptions {
        WalkOptions::new(SizeMode::Logical)
    }

    fn write_bytes(path: &Path, len: usize) {
        fs::write(path, vec![0x5a; len]).unwrap();
    }

    #[test]
    fn test_empty_dir_is_zero() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(directory_size(tmp.path(), &logical()).unwrap(), 0);
        assert_eq!(
            directory_size(tmp.path(), &WalkOptions::default()).unwrap(),
            0
        );
    }

    #[test]
    fn test_known_sizes_sum() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("a.bin"), 100);
        write_bytes(&tmp.path().join("b.bin"), 250);
        write_bytes(&tmp.path().join("c.bin"), 4096);

        assert_eq!(directory_size(tmp.path(), &logical()).unwrap(), 4446);
    }

    #[test]
    fn test_additive_over_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("one").join("two");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(tmp.path().join("empty")).unwrap();

        write_bytes(&tmp.path().join("top.bin"), 10);
        write_bytes(&tmp.path().join("one").join("mid.bin"), 20);
        write_bytes(&nested.join("deep.bin"), 30);

        let opts = logical();
        let whole = directory_size(tmp.path(), &opts).unwrap();
        let one = directory_size(&tmp.path().join("one"), &opts).unwrap();
        let empty = directory_size(&tmp.path().join("empty"), &opts).unwrap();

        assert_eq!(one, 50);
        assert_eq!(empty, 0);
        assert_eq!(whole, 10 + one + empty);
    }

    #[test]
    fn test_idempotent() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("x"), 1234);
        fs::create_dir(tmp.path().join("sub")).unwrap();
        write_bytes(&tmp.path().join("sub").join("y"), 99);

        let opts = WalkOptions::default();
        let first = directory_size(tmp.path(), &opts).unwrap();
        let second = directory_size(tmp.path(), &opts).unwrap();
        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn test_allocated_counts_blocks() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("a"), 100);
        write_bytes(&tmp.path().join("b"), 5000);

        let allocated = directory_size(tmp.path(), &WalkOptions::default()).unwrap();
        assert_eq!(allocated % 512, 0);
    }

    #[test]
    fn test_max_depth_limits_walk() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        write_bytes(&tmp.path().join("top"), 7);
        write_bytes(&tmp.path().join("sub").join("hidden"), 1000);

        let opts = WalkOptions {
            size_mode: SizeMode::Logical,
            max_depth: Some(1),
        };
        assert_eq!(directory_size(tmp.path(), &opts).unwrap(), 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_not_followed() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("data"), 64);
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("loop")).unwrap();

        let size = directory_size(tmp.path(), &logical()).unwrap();
        let link_len = fs::symlink_metadata(tmp.path().join("loop")).unwrap().len();
        assert_eq!(size, 64 + link_len);
    }

    #[test]
    fn test_missing_root_is_directory_unavailable() {
        let tmp = TempDir::new().unwrap();
        let err = directory_size(&tmp.path().join("missing"), &logical()).unwrap_err();
        assert!(matches!(err, Error::DirectoryUnavailable { .. }));
    }

    #[test]
    fn test_file_root_is_directory_unavailable() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain");
        write_bytes(&file, 3);
        let err = directory_size(&file, &logical()).unwrap_err();
        assert!(matches!(err, Error::DirectoryUnavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_is_followed() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real-cache");
        fs::create_dir(&real).unwrap();
        write_bytes(&real.join("blob"), 100);
        let link = tmp.path().join("cache");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        crate::context::ensure_dir(&link).unwrap();
        assert_eq!(directory_size(&link, &logical()).unwrap(), 100);
        assert_eq!(
            directory_size(&link, &WalkOptions::default()).unwrap(),
            directory_size(&real, &WalkOptions::default()).unwrap()
        );
    }

    #[test]
    fn test_walk_error_is_attribute_failure() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("gone");
        let err = WalkDir::new(&gone)
            .into_iter()
            .next()
            .unwrap()
            .unwrap_err();

        match entry_error(tmp.path(), err) {
            Error::AttributeReadFailure { path, reason } => {
                assert_eq!(path, gone);
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
