//! Clap derive structures for the `carewatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// carewatch -- headless console for a care-facility monitoring backend
#[derive(Debug, Parser)]
#[command(
    name = "carewatch",
    version,
    about = "Watch cards, alarms, and vitals from the command line",
    long_about = "A headless console for CareWatch monitoring backends.\n\n\
        Lists cards and active alarms, acknowledges alarm events subject to\n\
        role/unit policy, and runs the audible alarm monitor in the foreground.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "CAREWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 's', env = "CAREWATCH_SERVER", global = true)]
    pub server: Option<String>,

    /// Pre-issued access token
    #[arg(long, env = "CAREWATCH_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Session role (required with --token; otherwise reported by login)
    #[arg(long, env = "CAREWATCH_ROLE", global = true)]
    pub role: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CAREWATCH_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CAREWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: 30, or the profile's value)
    #[arg(long, env = "CAREWATCH_TIMEOUT", global = true)]
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
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List monitorable cards with their current alarm state
    #[command(alias = "c")]
    Cards(CardsArgs),

    /// List alarm events across all cards
    #[command(alias = "a")]
    Alarms(AlarmsArgs),

    /// Acknowledge (handle) an alarm event
    Ack(AckArgs),

    /// Run the audible alarm monitor in the foreground
    #[command(alias = "mon")]
    Monitor(MonitorArgs),

    /// Inspect or scaffold the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Per-command args ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CardsArgs {
    /// Only show cards with at least one active alarm
    #[arg(long)]
    pub alarming: bool,
}

#[derive(Debug, Args)]
pub struct AlarmsArgs {
    /// Include acknowledged events (default: active only)
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct AckArgs {
    /// The alarm event id to acknowledge
    pub event_id: String,
}

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Poll interval in seconds (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration (secrets redacted)
    Show,
    /// Write a starter config file
    Init,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
