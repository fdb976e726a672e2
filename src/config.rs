use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "codemod-dryrun";

pub const DEFAULT_THREAD_COUNT: usize = 4;
pub const DEFAULT_DRY_RUN: bool = false;
pub const DEFAULT_USE_JSON: bool = false;
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["**/node_modules/**", "**/.git/**"];

/// Defaults persisted between runs. Anything unset falls back to the
/// built-in constants above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Worker threads used to compute previews
    #[serde(default)]
    pub default_threads: Option<usize>,
    /// Glob patterns excluded when `--exclude` is not given
    #[serde(default)]
    pub default_exclude: Option<Vec<String>>,
    /// Respond with JSON unless overridden
    #[serde(default)]
    pub use_json: Option<bool>,
    /// Context lines around hunks; unset renders full content
    #[serde(default)]
    pub context_lines: Option<usize>,
}

impl Config {
    pub fn threads(&self) -> usize {
        self.default_threads.filter(|n| *n > 0).unwrap_or(DEFAULT_THREAD_COUNT)
    }

    pub fn exclude_patterns(&self) -> Vec<String> {
        match &self.default_exclude {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn json(&self) -> bool {
        self.use_json.unwrap_or(DEFAULT_USE_JSON)
    }
}

pub fn load_config() -> Result<Config> {
    let cfg: Config = confy::load(APP_NAME, None).context("failed to load config")?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    confy::store(APP_NAME, None, cfg).context("failed to save config")?;
    Ok(())
}
