use anyhow::{Context as _, Result};
use std::io::{self, Write};
use storage_stats::{CHANNEL_NAME, MethodCall, MethodResponse, StorageChannel};

/// Run one call and print its JSON response.
///
/// Returns false when the response is an error.
pub fn call(channel: &StorageChannel, method: &str) -> Result<bool> {
    let response = channel.handle(&MethodCall::new(method));
    let mut stdout = io::stdout().lock();
    write_response(&mut stdout, &response)?;
    Ok(!response.is_error())
}

/// Serve line-delimited JSON calls on stdin/stdout until EOF.
pub fn serve(channel: &StorageChannel) -> Result<()> {
    log::info!("Serving channel '{CHANNEL_NAME}' on stdin/stdout");
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let answered = channel
        .serve(stdin, stdout)
        .context("Bridge I/O failed")?;
    log::info!("Bridge closed after {answered} call(s)");
    Ok(())
}

fn write_response<W: Write>(writer: &mut W, response: &MethodResponse) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, response)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use storage_stats::{PlatformContext, SizeMode, StorageService, Strategy, WalkOptions};
    use tempfile::TempDir;

    fn channel(tmp: &TempDir) -> StorageChannel {
        let bundle = tmp.path().join("bundle");
        fs::create_dir_all(&bundle).unwrap();
        fs::write(bundle.join("bin"), vec![0u8; 321]).unwrap();
        let ctx = PlatformContext::new(
            "com.example.cli",
            bundle,
            tmp.path().join("data"),
            tmp.path().join("cache"),
        );
        let service =
            StorageService::new(ctx, Strategy::Walk, WalkOptions::new(SizeMode::Logical)).unwrap();
        StorageChannel::new(service)
    }

    #[test]
    fn test_write_response_is_json() {
        let mut out = Vec::new();
        write_response(&mut out, &MethodResponse::NotImplemented).unwrap();
        let parsed: MethodResponse = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, MethodResponse::NotImplemented);
    }

    #[test]
    fn test_call_success_and_unknown() {
        let tmp = TempDir::new().unwrap();
        let ch = channel(&tmp);
        assert!(call(&ch, "getAppUsedSpace").unwrap());
        assert!(call(&ch, "getSomethingElse").unwrap());
    }

    #[test]
    fn test_call_error() {
        let tmp = TempDir::new().unwrap();
        let ch = channel(&tmp);
        // A file where the cache directory should be
        fs::write(tmp.path().join("cache"), "blocked").unwrap();
        assert!(!call(&ch, "getAppUsedSpace").unwrap());
    }
}
