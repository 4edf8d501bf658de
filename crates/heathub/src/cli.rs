//! Clap derive structures for the `heathub` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// heathub -- control a Heat Hub from the command line
#[derive(Debug, Parser)]
#[command(
    name = "heathub",
    version,
    about = "Monitor and control a Heat Hub heating controller",
    long_about = "Monitor and control a Heat Hub heating controller.\n\n\
        Reads the hub's rooms, devices, hot water and smart plugs over its\n\
        local HTTP API, and sends setpoint, mode, boost, away, eco and plug commands.",
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
    /// Hub profile to use
    #[arg(long, short = 'p', env = "HEATHUB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Hub address (overrides profile)
    #[arg(long, short = 'a', env = "HEATHUB_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Hub shared secret (prefer HEATHUB_SECRET or the profile's secret_env)
    #[arg(long, global = true)]
    pub secret: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HEATHUB_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HEATHUB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Shared value types ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Follow the schedule
    Auto,
    /// Hold the manual setpoint / state
    Manual,
}

impl ModeArg {
    pub fn is_manual(self) -> bool {
        self == Self::Manual
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AwayActionArg {
    /// Switch the plug off while away
    Off,
    /// Leave the plug as it is
    NoChange,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Hub connectivity, identity and system settings
    #[command(alias = "st")]
    Status,

    /// Heating zones
    #[command(alias = "room", alias = "r")]
    Rooms(RoomsArgs),

    /// Paired devices (room stats, valves, plugs, the hub itself)
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// The hot-water zone
    #[command(alias = "hw")]
    HotWater(HotWaterArgs),

    /// Smart plugs
    #[command(alias = "plug")]
    Plugs(PlugsArgs),

    /// Away and eco mode
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Poll the hub and print a line after every refresh
    Watch(WatchArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms
    #[command(alias = "ls")]
    List,

    /// Show one room
    Get {
        /// Room name (case-insensitive)
        name: String,
    },

    /// Hold a manual setpoint
    #[command(name = "set-point", alias = "sp")]
    SetPoint {
        name: String,
        /// Target temperature in °C
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
    },

    /// Switch between schedule and manual control
    Mode { name: String, mode: ModeArg },

    /// Enable or disable open-window detection
    Window { name: String, state: Toggle },

    /// Boost to a temperature for a while
    Boost {
        name: String,
        /// Boost temperature in °C
        celsius: f64,
        /// Boost duration in minutes
        #[arg(long, short = 'm', default_value = "60")]
        minutes: u32,
    },

    /// Cancel an active boost or manual override
    #[command(name = "cancel-boost")]
    CancelBoost { name: String },

    /// Replace the room's schedule with a JSON document
    Schedule {
        name: String,
        /// Path to the schedule JSON ("-" for stdin)
        file: PathBuf,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List,

    /// Show one device by id or serial number
    Get { device: String },

    /// Lock or unlock the device's physical controls
    Lock { id: u32, state: Toggle },
}

// ── Hot water ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HotWaterArgs {
    #[command(subcommand)]
    pub command: HotWaterCommand,
}

#[derive(Debug, Subcommand)]
pub enum HotWaterCommand {
    /// Show the hot-water zone
    Show,

    /// Switch between schedule and manual control
    Mode { mode: ModeArg },

    /// Set the manual hot-water state (raw hub setpoint, tenths of °C)
    #[command(name = "set-point")]
    SetPoint {
        #[arg(allow_negative_numbers = true)]
        set_point: i32,
    },

    /// Heat water for a while
    Boost {
        #[arg(long, short = 'm', default_value = "60")]
        minutes: u32,
    },

    /// Cancel an active boost
    #[command(name = "cancel-boost")]
    CancelBoost,
}

// ── Smart plugs ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PlugsArgs {
    #[command(subcommand)]
    pub command: PlugsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlugsCommand {
    /// List smart plugs
    #[command(alias = "ls")]
    List,

    /// Show one plug by id or serial number
    Get { plug: String },

    /// Switch the plug relay
    Output { id: u32, state: Toggle },

    /// Switch between schedule and manual control
    Mode { id: u32, mode: ModeArg },

    /// What the plug does when away mode is switched on
    #[command(name = "away-action")]
    AwayAction { id: u32, action: AwayActionArg },

    /// Replace the plug's schedule with a JSON document
    Schedule {
        id: u32,
        /// Path to the schedule JSON ("-" for stdin)
        file: PathBuf,
    },
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Switch away mode on or off
    Away { state: Toggle },

    /// Switch eco mode on or off
    Eco { state: Toggle },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the loaded configuration (secrets redacted)
    Show,

    /// List configured profiles
    Profiles,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}
