use clap::Parser;

/// Pulse — live notification feed client for the analytics dashboard.
#[derive(Parser, Debug)]
#[command(name = "pulse", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Notification stream URL override.
    #[arg(long)]
    pub url: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
