//! Volume capacity probing.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::VolumeSpace;

/// Reads capacity figures for the volume containing a path.
///
/// The default implementation is [`StatvfsProbe`]; hosts with their own
/// volume accounting (or tests) can supply another one.
pub trait VolumeProbe: Send + Sync {
    /// Capacity of the volume containing `path`
    fn probe(&self, path: &Path) -> io::Result<VolumeSpace>;
}

/// Probe backed by POSIX `statvfs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsProbe;

impl VolumeProbe for StatvfsProbe {
    #[cfg(unix)]
    #[allow(unsafe_code)]
    fn probe(&self, path: &Path) -> io::Result<VolumeSpace> {
        use std::ffi::CString;
        use std::mem::MaybeUninit;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        // SAFETY: statvfs is a standard POSIX call. We check the return value
        // before reading the struct.
        let stat = unsafe {
            let mut stat: MaybeUninit<libc::statvfs> = MaybeUninit::uninit();
            if libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }
            stat.assume_init()
        };

        let frsize = u64::from(stat.f_frsize);
        Ok(VolumeSpace {
            total: u64::from(stat.f_blocks).saturating_mul(frsize),
            free: u64::from(stat.f_bavail).saturating_mul(frsize),
        })
    }

    #[cfg(not(unix))]
    fn probe(&self, path: &Path) -> io::Result<VolumeSpace> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!(
                "volume statistics not supported on this platform: {}",
                path.display()
            ),
        ))
    }
}

/// Probe candidates in order and return the first volume that answers.
///
/// Volumes are never aggregated: the first readable candidate is the
/// canonical one and the search stops there.
pub fn first_volume(
    probe: &dyn VolumeProbe,
    candidates: &[PathBuf],
) -> Result<(PathBuf, VolumeSpace)> {
    let mut last_error: Option<(PathBuf, io::Error)> = None;

    for candidate in candidates {
        match probe.probe(candidate) {
            Ok(space) => {
                log::debug!(
                    "Using volume at {} (total {}, free {})",
                    candidate.display(),
                    space.total,
                    space.free
                );
                return Ok((candidate.clone(), space));
            }
            Err(e) => {
                log::debug!("Could not get storage volume for {}: {}", candidate.display(), e);
                last_error = Some((candidate.clone(), e));
            }
        }
    }

    match last_error {
        Some((path, source)) => Err(Error::VolumeUnavailable { path, source }),
        None => Err(Error::InvalidContext(
            "no volume candidates configured".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Probe answering from a fixed table; unknown paths fail with NotFound.
    struct TableProbe(HashMap<PathBuf, VolumeSpace>);

    impl VolumeProbe for TableProbe {
        fn probe(&self, path: &Path) -> io::Result<VolumeSpace> {
            self.0
                .get(path)
                .copied()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_statvfs_on_temp_dir() {
        let tmp = TempDir::new().unwrap();
        let space = StatvfsProbe.probe(tmp.path()).unwrap();
        assert!(space.total > 0);
        assert!(space.free <= space.total);
    }

    #[cfg(unix)]
    #[test]
    fn test_statvfs_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        let err = StatvfsProbe.probe(&tmp.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_first_readable_candidate_wins() {
        let second = VolumeSpace { total: 100, free: 40 };
        let third = VolumeSpace { total: 900, free: 900 };
        let probe = TableProbe(HashMap::from([
            (PathBuf::from("/b"), second),
            (PathBuf::from("/c"), third),
        ]));

        let candidates = vec![
            PathBuf::from("/a"),
            PathBuf::from("/b"),
            PathBuf::from("/c"),
        ];
        let (path, space) = first_volume(&probe, &candidates).unwrap();
        assert_eq!(path, PathBuf::from("/b"));
        assert_eq!(space, second);
    }

    #[test]
    fn test_no_readable_candidate() {
        let probe = TableProbe(HashMap::new());
        let err = first_volume(&probe, &[PathBuf::from("/x"), PathBuf::from("/y")]).unwrap_err();
        match err {
            Error::VolumeUnavailable { path, source } => {
                assert_eq!(path, PathBuf::from("/y"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_candidates() {
        let err = first_volume(&StatvfsProbe, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidContext(_)));
    }
}
