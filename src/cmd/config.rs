use anyhow::Result;
use clap::Args;

use crate::config::{Config, DEFAULT_THREAD_COUNT, load_config, save_config};

#[derive(Args, Debug, Default)]
pub struct ConfigCmd {
    /// Show current defaults
    #[arg(long)]
    pub show: bool,

    /// Reset all persisted defaults before applying other flags
    #[arg(long)]
    pub reset: bool,

    /// Default number of worker threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Default glob pattern(s) to exclude (replaces the stored list)
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Respond with JSON by default: true | false
    #[arg(long)]
    pub use_json: Option<bool>,

    /// Default context lines around hunks instead of full-content previews
    #[arg(long)]
    pub context: Option<usize>,

    /// Go back to full-content previews
    #[arg(long, conflicts_with = "context")]
    pub full_content: bool,
}

/// Apply the flags of `cmd` to `cfg`. Returns true when anything changed.
pub fn apply_updates(cfg: &mut Config, cmd: &ConfigCmd) -> bool {
    let before = cfg.clone();
    if cmd.reset {
        *cfg = Config::default();
    }
    if let Some(threads) = cmd.threads {
        cfg.default_threads = Some(threads.max(1));
    }
    if !cmd.exclude.is_empty() {
        cfg.default_exclude = Some(cmd.exclude.clone());
    }
    if let Some(use_json) = cmd.use_json {
        cfg.use_json = Some(use_json);
    }
    if let Some(context) = cmd.context {
        cfg.context_lines = Some(context);
    }
    if cmd.full_content {
        cfg.context_lines = None;
    }
    *cfg != before
}

pub fn handle_config(cmd: ConfigCmd, json: bool) -> Result<()> {
    let mut cfg: Config = load_config().unwrap_or_default();
    let changed = apply_updates(&mut cfg, &cmd);
    if changed {
        save_config(&cfg)?;
        if !json {
            println!("{} Defaults saved.", crate::util::sym_check(crate::util::color_enabled_stdout()));
        }
    }
    if cmd.show || !changed {
        print_config(&cfg, json)?;
    }
    Ok(())
}

fn print_config(cfg: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(cfg)?);
        return Ok(());
    }
    match cfg.default_threads {
        Some(n) => println!("threads: {n}"),
        None => println!("threads: {DEFAULT_THREAD_COUNT} (built-in)"),
    }
    let exclude = cfg.exclude_patterns();
    if exclude.is_empty() {
        println!("exclude: (none)");
    } else {
        println!("exclude: {}", exclude.join(", "));
    }
    println!("json: {}", cfg.json());
    match cfg.context_lines {
        Some(n) => println!("context: {n} lines"),
        None => println!("context: full content"),
    }
    Ok(())
}
