//! Example: query storage statistics for an application
//!
//! Run with: cargo run -p storage-stats --example query -- com.example.app

use storage_stats::{
    MethodCall, MethodResponse, PlatformContext, StorageChannel, StorageService, Strategy,
    WalkOptions,
};

fn main() -> storage_stats::Result<()> {
    let app_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "com.example.app".to_string());

    let ctx = PlatformContext::for_app(&app_id)?;
    println!("bundle: {}", ctx.bundle_dir.display());
    println!("data:   {}", ctx.data_dir.display());
    println!("cache:  {}", ctx.cache_dir.display());

    let service = StorageService::new(ctx, Strategy::Walk, WalkOptions::default())?;

    let volume = service.get_local_storage_statistic()?;
    println!("\nvolume: {} free of {} bytes", volume.free, volume.total);

    let usage = service.get_app_used_space()?;
    println!(
        "app: {} / user data: {} / cache: {}",
        usage.app_used_space, usage.user_data_space, usage.cache_space
    );

    // The same queries through the bridge
    let channel = StorageChannel::new(service);
    for method in ["getLocalStorageStatistic", "getAppUsedSpace", "getBatteryLevel"] {
        match channel.handle(&MethodCall::new(method)) {
            MethodResponse::Success { result } => println!("{method}: {result:?}"),
            MethodResponse::Error { code, details, .. } => {
                println!("{method}: {code} ({})", details.unwrap_or_default());
            }
            MethodResponse::NotImplemented => println!("{method}: not implemented"),
        }
    }

    Ok(())
}
