use anyhow::{Context as _, Result};
use colored::Colorize;
use storage_stats::StorageService;

use crate::Context;
use crate::ui;

/// Show free/total space of the canonical volume
pub fn volume(ctx: &Context, service: &StorageService, json: bool) -> Result<()> {
    let stat = service
        .get_local_storage_statistic()
        .context("Failed to calculate storage space")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stat.to_map())?);
        return Ok(());
    }

    ui::header("Local Storage");
    ui::kv("Total", &ui::format_size(stat.total));
    ui::kv("Free", &ui::format_size(stat.free).green().to_string());
    ui::kv("Used", &ui::format_usage(stat.used(), stat.total));

    if ctx.verbose > 0 {
        ui::dim(&format!("{} bytes free of {}", stat.free, stat.total));
    }
    Ok(())
}

/// Show the app's space usage by category
pub fn app(ctx: &Context, service: &StorageService, json: bool) -> Result<()> {
    let usage = service
        .get_app_used_space()
        .context("Failed to calculate storage space")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&usage.to_map())?);
        return Ok(());
    }

    let app_ctx = service.context();
    ui::header(&format!("App Storage: {}", app_ctx.app_id));
    ui::kv("App", &ui::format_size(usage.app_used_space));
    ui::kv("User data", &ui::format_size(usage.user_data_space));
    ui::kv("Cache", &ui::format_size(usage.cache_space));
    ui::kv("Total", &ui::format_size(usage.total()).bold().to_string());

    if ctx.verbose > 0 {
        ui::dim(&format!("bundle: {}", app_ctx.bundle_dir.display()));
        ui::dim(&format!("data: {}", app_ctx.data_dir.display()));
        ui::dim(&format!("cache: {}", app_ctx.cache_dir.display()));
        if let Some(docs) = &app_ctx.documents_dir {
            ui::dim(&format!("documents: {}", docs.display()));
        }
    }
    Ok(())
}

/// Show the resolved platform context
pub fn context(service: &StorageService, config_file: &str, json: bool) -> Result<()> {
    let app_ctx = service.context();

    if json {
        println!("{}", serde_json::to_string_pretty(app_ctx)?);
        return Ok(());
    }

    ui::header("Platform Context");
    ui::kv("Config", config_file);
    ui::kv("App id", &app_ctx.app_id);
    ui::kv("Backend", service.backend_name());
    ui::kv("Bundle", &app_ctx.bundle_dir.display().to_string());
    ui::kv("Data", &app_ctx.data_dir.display().to_string());
    ui::kv("Cache", &app_ctx.cache_dir.display().to_string());
    ui::kv(
        "Documents",
        &app_ctx
            .documents_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "-".dimmed().to_string()),
    );
    for (i, volume) in app_ctx.volume_candidates.iter().enumerate() {
        ui::kv(&format!("Volume #{}", i + 1), &volume.display().to_string());
    }
    Ok(())
}
