//! Clap derive structures for the `sdx-gateway` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sdx-gateway -- expose an OESS domain to the AtlanticWave-SDX controller
#[derive(Debug, Parser)]
#[command(
    name = "sdx-gateway",
    version,
    about = "Translate OESS topology and circuits into the SDX model",
    long_about = "Pulls nodes, links and interfaces from an OESS workgroup and\n\
        publishes them as an SDX topology document. L2VPN commands create,\n\
        inspect and remove point-to-point circuits by SDX port id.",
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
    /// Path to the TOML config file (defaults to the platform config dir)
    #[arg(long, short = 'C', env = "SDX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Log line format on stderr
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates from OESS
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Per-call OESS timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh and print the SDX topology document
    #[command(alias = "topo")]
    Topology,

    /// Keep one gateway running and re-publish the topology on an interval
    ///
    /// Prints the document on the first refresh and again whenever it
    /// changes. The version survives across refreshes, so administrative
    /// changes bump it and unchanged refreshes print nothing.
    Watch(WatchArgs),

    /// Manage L2VPN point-to-point services
    L2vpn(L2vpnArgs),

    /// Inspect the OESS interface / SDX port registry
    #[command(alias = "reg")]
    Registry(RegistryArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes
    #[arg(long, short = 'i', default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Stop after this many refreshes (runs until killed when omitted)
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}

// ── L2VPN ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct L2vpnArgs {
    #[command(subcommand)]
    pub command: L2vpnCommand,
}

#[derive(Debug, Subcommand)]
pub enum L2vpnCommand {
    /// List services created through the gateway
    #[command(alias = "ls")]
    List,

    /// Show one service by id
    Get {
        /// Service (OESS circuit) id
        id: u64,
    },

    /// Create a service from a JSON request
    ///
    /// Accepts `{name, endpoints: [{port_id, vlan}, ...]}` or the
    /// point-to-point form `{name, uni_a: {port_id, tag: {value}}, uni_z: ...}`.
    Create {
        /// JSON request file; reads stdin when omitted or "-"
        #[arg(long, short = 'f')]
        from_file: Option<PathBuf>,
    },

    /// Delete a service by id
    #[command(alias = "rm")]
    Delete {
        /// Service (OESS circuit) id
        id: u64,
    },

    /// Delete the first service matching name, ports and VLANs
    ///
    /// Request form: `{name, uni_a: {interface_id, tag: {value}}, uni_z: ...}`.
    DeleteMatching {
        /// JSON request file; reads stdin when omitted or "-"
        #[arg(long, short = 'f')]
        from_file: Option<PathBuf>,
    },
}

// ── Registry ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegistryCommand {
    /// OESS interface id to SDX port
    #[command(name = "oess2sdx")]
    OessToSdx,

    /// SDX port id to OESS interface
    #[command(name = "sdx2oess")]
    SdxToOess,
}
