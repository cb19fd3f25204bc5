use clap::{ArgAction, Parser, ValueEnum};

/// cidr-labels — print the CIDR labels a prefix expands to.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Addresses or prefixes (e.g. `10.0.0.1`, `10.0.0.0/8`, `2001:db8::/32`).
    #[arg(required = true, value_name = "PREFIX")]
    pub prefixes: Vec<String>,

    /// Treat IPv4 as enabled.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        env = "CIDR_LABELS_ENABLE_IPV4"
    )]
    pub enable_ipv4: bool,

    /// Treat IPv6 as enabled. With IPv4 also enabled, world labels are
    /// split into `world-ipv4` and `world-ipv6`.
    #[arg(
        long,
        default_value_t = false,
        action = ArgAction::Set,
        env = "CIDR_LABELS_ENABLE_IPV6"
    )]
    pub enable_ipv6: bool,

    /// Print only the label of each input instead of its full expansion.
    #[arg(long)]
    pub parse_only: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `source:key` per line, sorted by key.
    Text,
    /// One JSON object per input.
    Json,
}
