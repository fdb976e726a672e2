use owo_colors::OwoColorize;
use supports_color::Stream;

pub fn color_enabled_stdout() -> bool {
    std::env::var_os("NO_COLOR").is_none() && supports_color::on(Stream::Stdout).is_some()
}

pub fn color_enabled_stderr() -> bool {
    std::env::var_os("NO_COLOR").is_none() && supports_color::on(Stream::Stderr).is_some()
}

pub fn sym_check(enabled: bool) -> String {
    if enabled { format!("{}", "✔".green().bold()) } else { "✔".to_string() }
}

pub fn sym_cross(enabled: bool) -> String {
    if enabled { format!("{}", "✖".red().bold()) } else { "x".to_string() }
}

/// Render a count with a singular/plural noun, e.g. `1 file` / `3 files`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 { format!("{count} {noun}") } else { format!("{count} {noun}s") }
}
