use similar::{Algorithm, ChangeTag, TextDiff};

pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Context lines around each hunk. `None` renders the full content
    /// without hunk headers.
    pub context: Option<usize>,
}

impl DiffOptions {
    pub fn full() -> Self {
        Self { context: None }
    }

    pub fn windowed(context: usize) -> Self {
        Self { context: Some(context) }
    }
}

/// Line diff between `old` and `new`. Returns an empty string when the two
/// are identical.
pub fn render_diff(old: &str, new: &str, options: DiffOptions) -> String {
    if old == new {
        return String::new();
    }
    let diff = TextDiff::configure().algorithm(Algorithm::Lcs).diff_lines(old, new);

    match options.context {
        Some(radius) => diff.unified_diff().context_radius(radius).missing_newline_hint(true).to_string(),
        None => {
            let mut out = String::with_capacity(old.len() + new.len());
            for change in diff.iter_all_changes() {
                let sign = match change.tag() {
                    ChangeTag::Equal => ' ',
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                };
                out.push(sign);
                out.push_str(change.value());
                if change.missing_newline() {
                    out.push('\n');
                    out.push_str(NO_NEWLINE_MARKER);
                    out.push('\n');
                }
            }
            out
        }
    }
}
