mod platform;

use clap::{Parser, ValueEnum};

/// Toggle blocklist sources and merge them into a single hosts file.
#[derive(Debug, Parser)]
#[command(name = "blockhost", version, about)]
struct Args {
    /// Apply the saved selection once and exit instead of prompting.
    #[arg(long)]
    apply: bool,

    /// Enable a source before starting; may be repeated.
    #[arg(long = "enable", value_name = "ID")]
    enable: Vec<String>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogTarget {
    File,
    Terminal,
    Both,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let destination = match args.log {
        LogTarget::File => blockhost_logging::LogDestination::File,
        LogTarget::Terminal => blockhost_logging::LogDestination::Terminal,
        LogTarget::Both => blockhost_logging::LogDestination::Both,
    };
    platform::run_app(platform::AppOptions {
        apply_once: args.apply,
        enable: args.enable,
        log_destination: destination,
        verbose: args.verbose,
    })
}
