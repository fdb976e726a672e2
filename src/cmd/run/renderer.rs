use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

use codemod_dryrun_diff::protocol::CommandKind;
use codemod_dryrun_diff::{DiffPreview, FileCommand};
use codemod_dryrun_diff::diff::NO_NEWLINE_MARKER;
use owo_colors::OwoColorize;

pub struct RenderOptions {
    pub pager: bool,
}

/// Terminal rendering of a dry run: one block per preview, then a summary.
pub fn render_console(previews: &[DiffPreview], commands: &[FileCommand], color: bool) -> String {
    let mut out = String::new();
    for preview in previews {
        if color {
            out.push_str(&format!("{}  {}\n", preview.filename.bold(), preview.codemod_name.dimmed()));
        } else {
            out.push_str(&format!("{}  ({})\n", preview.filename, preview.codemod_name));
        }
        if preview.diff.is_empty() {
            let note = "(no content changes)";
            if color {
                out.push_str(&format!("{}\n", note.dimmed()));
            } else {
                out.push_str(note);
                out.push('\n');
            }
        } else {
            for line in preview.diff.lines() {
                out.push_str(&paint_line(line, color));
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out.push_str(&summary_line(commands));
    out.push('\n');
    out
}

fn paint_line(line: &str, color: bool) -> String {
    if !color {
        return line.to_string();
    }
    if line == NO_NEWLINE_MARKER {
        format!("{}", line.dimmed())
    } else if line.starts_with("@@") {
        format!("{}", line.cyan())
    } else if line.starts_with('+') {
        format!("{}", line.green())
    } else if line.starts_with('-') {
        format!("{}", line.red())
    } else {
        line.to_string()
    }
}

/// e.g. `3 file commands: 1 created, 2 updated`
pub fn summary_line(commands: &[FileCommand]) -> String {
    let mut counts: BTreeMap<CommandKind, usize> = BTreeMap::new();
    for command in commands {
        *counts.entry(command.kind()).or_default() += 1;
    }
    let head = crate::util::plural(commands.len(), "file command");
    if counts.is_empty() {
        return head;
    }
    let parts: Vec<String> = counts
        .iter()
        .map(|(kind, n)| {
            let verb = match kind {
                CommandKind::CreateFile => "created",
                CommandKind::UpdateFile => "updated",
                CommandKind::DeleteFile => "deleted",
                CommandKind::MoveFile => "moved",
                CommandKind::CopyFile => "copied",
            };
            format!("{n} {verb}")
        })
        .collect();
    format!("{head}: {}", parts.join(", "))
}

/// Ordered JSON array of `{filename, codemodName, diff}` objects.
pub fn render_json(previews: &[DiffPreview]) -> Result<String> {
    serde_json::to_string_pretty(previews).context("failed to serialize previews")
}

pub fn print_blocks(assembled: String, opts: &RenderOptions) -> Result<()> {
    if opts.pager && std::io::stdout().is_terminal() {
        let mut less = Command::new("less");
        less.arg("-R");
        return page_through(&mut less, &assembled);
    }
    print!("{assembled}");
    Ok(())
}

/// Feed `text` to a pager process on stdin and fail if it exits unsuccessfully.
fn page_through(pager: &mut Command, text: &str) -> Result<()> {
    let mut child = pager.stdin(Stdio::piped()).spawn().context("failed to spawn pager")?;
    if let Some(mut stdin) = child.stdin.take() {
        // The pager may quit before reading everything.
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            tracing::debug!("pager closed its input early: {e}");
        }
    }
    let status = child.wait().context("failed to wait for pager")?;
    if !status.success() {
        bail!("pager exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemod_dryrun_diff::compute_diffs;
    use pretty_assertions::assert_eq;

    fn batch() -> Vec<FileCommand> {
        vec![
            FileCommand::UpdateFile {
                old_path: "src/a.ts".into(),
                old_content: "var a = 1;\n".into(),
                new_content: "const a = 1;\n".into(),
                codemod_name: "no-var".into(),
                new_path: None,
            },
            FileCommand::DeleteFile { old_path: "src/b.ts".into(), codemod_name: "no-var".into() },
            FileCommand::UpdateFile {
                old_path: "src/c.ts".into(),
                old_content: "var c;\n".into(),
                new_content: "let c;\n".into(),
                codemod_name: "no-var".into(),
                new_path: None,
            },
        ]
    }

    #[test]
    fn plain_console_output() {
        let commands = batch();
        let previews = compute_diffs(&commands);
        let out = render_console(&previews, &commands, false);
        assert_eq!(
            out,
            "src/a.ts  (no-var)\n-var a = 1;\n+const a = 1;\n\n\
             src/b.ts  (no-var)\n(no content changes)\n\n\
             src/c.ts  (no-var)\n-var c;\n+let c;\n\n\
             3 file commands: 2 updated, 1 deleted\n"
        );
    }

    #[test]
    fn summary_for_empty_batch() {
        assert_eq!(summary_line(&[]), "0 file commands");
    }

    #[test]
    fn colored_lines_keep_their_text() {
        let painted = paint_line("+added", true);
        assert!(painted.contains("+added"));
        assert_ne!(painted, "+added");
        assert_eq!(paint_line(" same", true), " same");
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let previews = compute_diffs(&batch()[1..2]);
        let value: serde_json::Value = serde_json::from_str(&render_json(&previews).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([{"filename": "src/b.ts", "codemodName": "no-var", "diff": ""}]));
    }

    #[cfg(unix)]
    #[test]
    fn pager_exit_status_is_reported() {
        let mut ok = Command::new("sh");
        ok.args(["-c", "cat > /dev/null"]);
        assert!(page_through(&mut ok, "some output\n").is_ok());

        let mut failing = Command::new("sh");
        failing.args(["-c", "cat > /dev/null; exit 3"]);
        let err = page_through(&mut failing, "some output\n").unwrap_err();
        assert!(format!("{err:#}").contains("pager exited"), "{err:#}");
    }
}
