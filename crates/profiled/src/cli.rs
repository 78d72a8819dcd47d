//! Clap derive structures for the `profiled` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// profiled -- manage configuration profiles on a cluster node
#[derive(Debug, Parser)]
#[command(
    name = "profiled",
    version,
    about = "Manage configuration profiles from the command line",
    long_about = "Create, inspect, update, rename and delete configuration profiles\n\
        in this node's state file. Every committed change is forwarded to the\n\
        cluster peers listed in the config file.",
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
    /// Project to operate in (falls back to the default namespace when the
    /// project has no isolated profiles)
    #[arg(long, env = "PROFILED_PROJECT", global = true)]
    pub project: Option<String>,

    /// Config file path
    #[arg(long, env = "PROFILED_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// State file path (overrides `[node] state_file`)
    #[arg(long, env = "PROFILED_STATE", global = true)]
    pub state: Option<PathBuf>,

    /// Output format (defaults to `[defaults] output`, then table)
    #[arg(long, short = 'o', env = "PROFILED_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List profiles
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a profile and its ETag
    #[command(alias = "get")]
    Show(ShowArgs),

    /// Create a profile
    Create(CreateArgs),

    /// Replace a profile's description, config and devices from a file
    Edit(EditArgs),

    /// Merge changes into a profile
    Patch(PatchArgs),

    /// Rename a profile
    #[command(alias = "mv")]
    Rename(RenameArgs),

    /// Delete a profile
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Return full profiles instead of URIs
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Profile name
    pub name: String,
}

/// Field flags shared by `create` and `patch`.
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Profile description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Config entry as key=value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Device as name:key=value,key=value (repeatable)
    #[arg(long = "device", value_name = "NAME:KEY=VALUE,...")]
    pub devices: Vec<String>,

    /// Read a JSON document first; flags are applied on top
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Profile name
    pub name: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Profile name
    pub name: String,

    /// JSON document with description, config and devices
    #[arg(long, short = 'F')]
    pub from_file: PathBuf,

    /// Only write if the profile still has this ETag
    #[arg(long)]
    pub etag: Option<String>,
}

#[derive(Debug, Args)]
pub struct PatchArgs {
    /// Profile name
    pub name: String,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Only write if the profile still has this ETag
    #[arg(long)]
    pub etag: Option<String>,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Current profile name
    pub name: String,

    /// New profile name
    pub new_name: String,

    /// Only rename if the profile still has this ETag
    #[arg(long)]
    pub etag: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Profile name
    pub name: String,

    /// Only delete if the profile still has this ETag
    #[arg(long)]
    pub etag: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Store the cluster token in the system keyring
    SetToken,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
