use std::io::{self, Read};

use anyhow::{Context, Result};
use codemod_dryrun_diff::FileCommand;
use codemod_dryrun_diff::protocol::{RawFileCommand, validate_commands};
use wildmatch::WildMatch;

/// Read a JSON array of file commands from `source` (`-` for stdin).
pub fn read_commands(source: &str, fallback_name: Option<&str>) -> Result<Vec<FileCommand>> {
    let text = if source == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read file commands from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read file commands from {source}"))?
    };
    parse_commands(&text, fallback_name).with_context(|| format!("invalid file commands in {source}"))
}

pub fn parse_commands(text: &str, fallback_name: Option<&str>) -> Result<Vec<FileCommand>> {
    let raw: Vec<RawFileCommand> = serde_json::from_str(text).context("expected a JSON array of file commands")?;
    Ok(validate_commands(raw, fallback_name)?)
}

/// Include/exclude glob filter over each command's primary path.
pub struct PathFilter {
    include: Vec<WildMatch>,
    exclude: Vec<WildMatch>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: include.iter().map(|p| WildMatch::new(p)).collect(),
            exclude: exclude.iter().map(|p| WildMatch::new(p)).collect(),
        }
    }

    pub fn allows(&self, path: &str) -> bool {
        let relative = path.trim_start_matches("./").trim_start_matches('/');
        // Rooted form lets `**/dir/**` also match `dir` at the top level.
        let rooted = format!("/{relative}");
        let hit = |pats: &[WildMatch]| pats.iter().any(|p| p.matches(relative) || p.matches(&rooted));

        if !self.include.is_empty() && !hit(&self.include) {
            return false;
        }
        !hit(&self.exclude)
    }

    pub fn apply(&self, commands: Vec<FileCommand>) -> Vec<FileCommand> {
        let total = commands.len();
        let kept: Vec<FileCommand> = commands.into_iter().filter(|c| self.allows(c.primary_path())).collect();
        if kept.len() != total {
            tracing::debug!(total, kept = kept.len(), "filtered file commands by include/exclude patterns");
        }
        kept
    }
}
