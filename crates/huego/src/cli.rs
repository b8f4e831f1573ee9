//! Clap derive structures for the `huego` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// huego -- query a Philips Hue bridge over the CLIP v2 API
#[derive(Debug, Parser)]
#[command(
    name = "huego",
    version,
    about = "Query Philips Hue bridges from the command line",
    long_about = "A small CLI over the Hue bridge CLIP v2 REST API.\n\n\
        Lists and inspects lights, fetches any resource type, and issues\n\
        raw requests with the bridge application key attached.",
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
    /// Bridge profile to use
    #[arg(long, short = 'p', env = "HUE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "HUE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Bridge address: URL or host[:port] (overrides profile)
    #[arg(long, short = 'b', env = "HUE_BRIDGE", global = true)]
    pub bridge: Option<String>,

    /// Bridge application key
    #[arg(long, env = "HUE_APP_KEY", global = true, hide_env_values = true)]
    pub app_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HUE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept the bridge's self-signed TLS certificate
    #[arg(long, short = 'k', env = "HUE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HUE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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
    /// List and inspect lights
    #[command(alias = "l")]
    Lights(LightsArgs),

    /// Fetch any CLIP v2 resource type
    #[command(alias = "res")]
    Resource(ResourceArgs),

    /// Issue a request against a raw bridge path
    Raw(RawArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LIGHTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LightsArgs {
    #[command(subcommand)]
    pub command: LightsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightsCommand {
    /// List all lights
    #[command(alias = "ls")]
    List,

    /// Show one light
    Get {
        /// Light resource id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCE / RAW
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourceArgs {
    /// Resource type (light, room, zone, scene, device, ...)
    pub resource_type: String,

    /// Resource id (omit to list all)
    pub id: Option<String>,

    /// Raw query string appended to the list request
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct RawArgs {
    /// Request path, e.g. /clip/v2/resource/bridge
    pub path: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Raw query string
    #[arg(long)]
    pub query: Option<String>,

    /// JSON request body
    #[arg(long, short = 'd')]
    pub data: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved settings for the active profile
    Show,

    /// Print the configuration file path
    Path,

    /// List configured profiles
    Profiles,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
