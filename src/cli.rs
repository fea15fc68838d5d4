//! CLI argument parsing for the policy registry tool.
//!
//! The CLI is intentionally thin: every command loads a manifest, builds an
//! engine, and reports, so the same registry logic can be embedded elsewhere
//! unchanged.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the policy registry tool.
#[derive(Parser, Debug)]
#[command(
    name = "bpol",
    version,
    about = "Policy lifecycle registry for build-configuration switches",
    after_help = "Commands:\n  list --manifest <FILE>                     List policies and effective values\n  info --manifest <FILE> --name <NAME>       Show one policy's full record\n  check --manifest <FILE> [--set N=V ...]    Read every policy and report notices\n  version --manifest <FILE> --minimum <VER>  Bulk-activate a compatibility range\n\nExamples:\n  bpol list --manifest policies.json\n  bpol info --manifest policies.json --name P0004\n  bpol check --manifest policies.json --set P0004=NEW --json\n  bpol version --manifest policies.json --minimum 3.2 --maximum 3.9",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level registry commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    List(ListArgs),
    Info(InfoArgs),
    Check(CheckArgs),
    Version(VersionArgs),
}

/// List command inputs.
#[derive(Parser, Debug)]
#[command(about = "List registered policies and their effective values")]
pub struct ListArgs {
    /// Policy manifest (policies.json)
    #[arg(long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Info command inputs for a single policy.
#[derive(Parser, Debug)]
#[command(about = "Show one policy's metadata and effective value")]
pub struct InfoArgs {
    /// Policy manifest (policies.json)
    #[arg(long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Policy name (case-sensitive)
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Check command inputs: apply explicit settings, then read everything.
#[derive(Parser, Debug)]
#[command(about = "Read every policy and report lifecycle notices")]
pub struct CheckArgs {
    /// Policy manifest (policies.json)
    #[arg(long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Explicit setting applied before reading (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Version command inputs for bulk range activation.
#[derive(Parser, Debug)]
#[command(about = "Bulk-activate policies for a compatibility range")]
pub struct VersionArgs {
    /// Policy manifest (policies.json)
    #[arg(long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Minimum compatible version; policies introduced at or before it are set NEW
    #[arg(long, value_name = "VER")]
    pub minimum: String,

    /// Optional maximum version; policies introduced at or after it are set OLD
    #[arg(long, value_name = "VER")]
    pub maximum: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
