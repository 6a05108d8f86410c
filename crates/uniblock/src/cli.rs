//! Clap derive structures for the `uniblock` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// uniblock -- allow or block UniFi clients as switch/lock accessories
#[derive(Debug, Parser)]
#[command(
    name = "uniblock",
    version,
    about = "Allow or block UniFi network clients through switch or lock accessories",
    long_about = "Logs in to a UniFi controller, reconciles its known clients with the\n\
        persisted accessory cache, and reads or writes each client's access state.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "UNIBLOCK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, reconcile clients with the accessory cache, and list accessories
    #[command(alias = "ls")]
    Discover,

    /// Read a client's current access state from the controller
    Get(TargetArgs),

    /// Allow or block a client
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Client MAC address
    pub mac: String,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Client MAC address
    pub mac: String,

    /// Desired access
    pub access: Access,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Access {
    /// Allow network access (switch on / lock unsecured)
    Allow,
    /// Block network access (switch off / lock secured)
    Block,
}
