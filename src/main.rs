mod cmd;
mod config;
mod logging;
mod util;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cmd::config::ConfigCmd;
use crate::cmd::run::RunArgs;

#[derive(Parser)]
#[command(name = "codemod", version, about = "Preview or apply the file commands produced by a codemod run", long_about = None, disable_help_subcommand = true)]
struct Cli {
    /// Respond with JSON
    #[arg(short = 'j', long, global = true)]
    json: bool,
    /// Force terminal output even if the config enables JSON
    #[arg(long, global = true, conflicts_with = "json")]
    no_json: bool,
    /// Log debug output to stderr
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview (--dry) or apply a batch of file commands emitted by a codemod engine
    Run(RunArgs),
    /// Show or persist default run options
    Config(ConfigCmd),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);
    let json_override = if cli.json {
        Some(true)
    } else if cli.no_json {
        Some(false)
    } else {
        None
    };
    match cli.command {
        Commands::Run(args) => {
            let cfg = config::load_config().unwrap_or_else(|e| {
                tracing::warn!("ignoring unreadable config: {e:#}");
                config::Config::default()
            });
            cmd::run::handle_run(args.into_options(json_override, &cfg))
        }
        Commands::Config(config_cmd) => cmd::config::handle_config(config_cmd, cli.json),
    }
}
