pub mod apply;
pub mod input;
pub mod renderer;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use codemod_dryrun_diff::{DiffOptions, PreviewEngine};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{Config, DEFAULT_DRY_RUN};
use input::PathFilter;
use renderer::{RenderOptions, print_blocks, render_console, render_json};

/// Batches at least this large get a spinner while previews are computed.
const SPINNER_THRESHOLD: usize = 200;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// JSON file of file commands emitted by the codemod engine (`-` for stdin)
    #[arg(short = 'c', long)]
    pub commands: String,
    /// Glob pattern(s) for files to include
    #[arg(short = 'i', long, num_args = 1..)]
    pub include: Vec<String>,
    /// Glob pattern(s) for files to exclude
    #[arg(short = 'e', long, num_args = 1..)]
    pub exclude: Vec<String>,
    /// Directory the commands are applied to
    #[arg(short = 't', long, default_value = ".")]
    pub target: PathBuf,
    /// Number of worker threads
    #[arg(short = 'n', long)]
    pub threads: Option<usize>,
    /// Perform a dry run
    #[arg(short = 'd', long, default_value_t = DEFAULT_DRY_RUN)]
    pub dry: bool,
    /// Codemod name attributed to commands that carry none
    #[arg(long)]
    pub codemod_name: Option<String>,
    /// Show N context lines around each hunk instead of the full content
    #[arg(long)]
    pub context: Option<usize>,
    /// Page terminal output through `less -R`
    #[arg(long)]
    pub pager: bool,
}

/// Fully resolved options for one run: CLI flags over persisted config over
/// built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub commands: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub target: PathBuf,
    pub threads: usize,
    pub dry: bool,
    pub json: bool,
    pub codemod_name: Option<String>,
    pub context: Option<usize>,
    pub pager: bool,
}

impl RunArgs {
    /// `json` is the command-line override; `None` defers to the config.
    pub fn into_options(self, json: Option<bool>, cfg: &Config) -> RunOptions {
        RunOptions {
            commands: self.commands,
            include: self.include,
            exclude: if self.exclude.is_empty() { cfg.exclude_patterns() } else { self.exclude },
            target: self.target,
            threads: self.threads.unwrap_or_else(|| cfg.threads()).max(1),
            dry: self.dry,
            json: json.unwrap_or_else(|| cfg.json()),
            codemod_name: self.codemod_name,
            context: self.context.or(cfg.context_lines),
            pager: self.pager,
        }
    }
}

pub fn handle_run(opts: RunOptions) -> Result<()> {
    let commands = input::read_commands(&opts.commands, opts.codemod_name.as_deref())?;
    let commands = PathFilter::new(&opts.include, &opts.exclude).apply(commands);
    tracing::debug!(commands = commands.len(), threads = opts.threads, dry = opts.dry, "starting run");

    let engine = PreviewEngine::with_options(DiffOptions { context: opts.context });
    let spinner = (!opts.json && commands.len() >= SPINNER_THRESHOLD).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} computing {msg} previews...") {
            pb.set_style(style);
        }
        pb.set_message(commands.len().to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });
    let previews = engine.compute_diffs_parallel(&commands, opts.threads);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if opts.json {
        println!("{}", render_json(&previews)?);
    } else if commands.is_empty() {
        let ce = crate::util::color_enabled_stdout();
        println!("{} No file commands matched the include/exclude patterns.", crate::util::sym_cross(ce));
    } else {
        let color = crate::util::color_enabled_stdout();
        let render_opts = RenderOptions { pager: opts.pager };
        print_blocks(render_console(&previews, &commands, color), &render_opts)?;
    }

    if opts.dry {
        return Ok(());
    }
    let applied = apply::apply_commands(&opts.target, &commands)?;
    let ce = crate::util::color_enabled_stderr();
    eprintln!(
        "{} Applied {} to {}",
        crate::util::sym_check(ce),
        crate::util::plural(applied, "file command"),
        opts.target.display()
    );
    Ok(())
}
