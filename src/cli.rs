use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Terminal chat client with selectable models and toggleable connectors", long_about = None)]
pub struct Args {
    /// Send this message, print the reply and exit
    pub query: Option<String>,

    /// Model to select at startup
    #[arg(short, long)]
    pub model: Option<String>,

    /// Response provider to use [possible values: simulated, echo]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds to wait for a reply before giving up (0 waits forever)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Print the transcript as JSON instead of chat bubbles (non-interactive only)
    #[arg(long)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
