mod cli;
mod commands;
mod config;
mod paths;
mod ui;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use storage_stats::{StorageChannel, StorageService};

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "storage-space", &mut io::stdout());
        return Ok(());
    }

    let config = config::Config::load(cli.target.config.as_deref())?.with_overrides(&cli.target);
    let platform = config.context()?;
    let service = StorageService::new(platform, config.strategy(), config.walk_options())
        .context("Could not select storage backend")?;
    log::debug!("Using {} backend", service.backend_name());

    match cli.command {
        Command::Volume { json } => commands::query::volume(&ctx, &service, json),
        Command::App { json } => commands::query::app(&ctx, &service, json),
        Command::Context { json } => {
            let config_file = match &cli.target.config {
                Some(p) => p.display().to_string(),
                None => config::config_path()?.display().to_string(),
            };
            commands::query::context(&service, &config_file, json)
        }
        Command::Call { method } => {
            let channel = StorageChannel::new(service);
            if !commands::bridge::call(&channel, &method)? {
                if !ctx.quiet {
                    ui::error(&format!("{method} failed"));
                }
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Bridge => commands::bridge::serve(&StorageChannel::new(service)),
        Command::Completions { .. } => Ok(()),
    }
}
