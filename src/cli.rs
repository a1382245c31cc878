use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "storage-space")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Query storage statistics for an application", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Which application to measure and how. Overrides the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Config file (default: <config dir>/config.toml)
    #[arg(long, global = true, env = "STORAGE_SPACE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Application identifier (e.g. com.example.app)
    #[arg(long, global = true)]
    pub app_id: Option<String>,

    /// Installed bundle/binary directory
    #[arg(long, global = true)]
    pub bundle_dir: Option<String>,

    /// Persistent support data directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<String>,

    /// Documents directory, counted as cache
    #[arg(long, global = true)]
    pub documents_dir: Option<String>,

    /// Extra volume to probe after the defaults (repeatable)
    #[arg(long = "volume", global = true)]
    pub volumes: Vec<String>,

    /// How directory sizes are measured
    #[arg(long, value_enum, global = true)]
    pub strategy: Option<StrategyArg>,

    /// How file sizes are counted during a walk
    #[arg(long, value_enum, global = true)]
    pub size_mode: Option<SizeModeArg>,

    /// Maximum walk depth below each directory
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show free/total space of the volume backing the app's data
    Volume {
        /// Print the bridge map as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show space used by the app (bundle, user data, cache)
    App {
        /// Print the bridge map as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one bridge call and print the JSON response
    Call {
        /// Method name (getLocalStorageStatistic, getAppUsedSpace)
        method: String,
    },

    /// Serve line-delimited JSON method calls on stdin/stdout
    Bridge,

    /// Show the resolved platform context
    Context {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Walk,
    Aggregate,
}

impl From<StrategyArg> for storage_stats::Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Walk => Self::Walk,
            StrategyArg::Aggregate => Self::Aggregate,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SizeModeArg {
    Allocated,
    Logical,
}

impl From<SizeModeArg> for storage_stats::SizeMode {
    fn from(arg: SizeModeArg) -> Self {
        match arg {
            SizeModeArg::Allocated => Self::Allocated,
            SizeModeArg::Logical => Self::Logical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_overrides() {
        let cli = Cli::try_parse_from([
            "storage-space",
            "app",
            "--json",
            "--app-id",
            "com.example.app",
            "--strategy",
            "aggregate",
            "--size-mode",
            "logical",
            "--volume",
            "/media/a",
            "--volume",
            "/media/b",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::App { json: true }));
        assert_eq!(cli.target.app_id.as_deref(), Some("com.example.app"));
        assert_eq!(cli.target.strategy, Some(StrategyArg::Aggregate));
        assert_eq!(cli.target.size_mode, Some(SizeModeArg::Logical));
        assert_eq!(cli.target.volumes, vec!["/media/a", "/media/b"]);
    }

    #[test]
    fn test_parse_call() {
        let cli = Cli::try_parse_from(["storage-space", "-vv", "call", "getAppUsedSpace"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Call { method } => assert_eq!(method, "getAppUsedSpace"),
            _ => panic!("expected call"),
        }
    }
}
