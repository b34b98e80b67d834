//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Server Sentinel: agentless fleet health checks over SSH
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(author, version, about = "Server Sentinel command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file (YAML, or TOML by extension)
    #[arg(
        short,
        long,
        global = true,
        env = "SENTINEL_CONFIG",
        default_value = "config.yaml"
    )]
    pub config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output; only errors and requested data are printed
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Options shared by every command
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            config: self.config.clone(),
            verbose: self.verbose,
            quiet: self.quiet,
            color: !self.no_color,
        }
    }
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    /// Configuration file
    pub config: PathBuf,
    /// `-v` count
    pub verbose: u8,
    /// `-q` given
    pub quiet: bool,
    /// ANSI colors enabled
    pub color: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List configured servers (credentials are never shown)
    #[command(about = "List the servers in the configuration")]
    List {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Run a health check now
    #[command(about = "Probe servers now and print their health")]
    Run {
        /// Server names to probe; none or `all` probes every server
        servers: Vec<String>,

        /// Raw run request, e.g. '{"action":"run","servers":["web1"]}'
        #[arg(long, conflicts_with = "servers")]
        request: Option<String>,

        /// Output format for the results
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Run the daily scheduled health check until interrupted
    #[command(about = "Run scheduled health checks in the foreground")]
    Daemon {
        /// Local fire time (HH:MM), overrides `schedule.daily_at`
        #[arg(long)]
        at: Option<String>,

        /// Run one health check immediately on startup
        #[arg(long)]
        run_now: bool,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    Table,
    /// Output as JSON
    Json,
}
