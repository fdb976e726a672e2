use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use codemod_dryrun_diff::FileCommand;
use tracing::debug;

/// Resolve a command path under `target`, refusing anything that escapes it.
fn resolve(target: &Path, path: &str) -> Result<PathBuf> {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        if !candidate.starts_with(target) {
            bail!("path {} is outside of target {}", candidate.display(), target.display());
        }
        return Ok(candidate.to_path_buf());
    }
    if candidate.components().any(|c| matches!(c, Component::ParentDir)) {
        bail!("path {path} escapes target {}", target.display());
    }
    Ok(target.join(candidate))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Write a file that must not exist yet.
fn write_new_file(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("refusing to overwrite {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}

fn ensure_absent(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite {}", path.display());
    }
    Ok(())
}

/// The file on disk must still hold the content the preview was computed from.
fn ensure_unchanged(path: &Path, expected: &str) -> Result<()> {
    let current = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if current != expected {
        bail!("{} changed on disk since the file commands were produced", path.display());
    }
    Ok(())
}

/// Apply one command under `target`.
pub fn apply_command(target: &Path, command: &FileCommand) -> Result<()> {
    match command {
        FileCommand::CreateFile { new_path, new_content, .. } => {
            write_new_file(&resolve(target, new_path)?, new_content)?;
        }
        FileCommand::UpdateFile { old_path, old_content, new_content, new_path, .. } => {
            let old = resolve(target, old_path)?;
            ensure_unchanged(&old, old_content)?;
            match new_path.as_deref().filter(|p| *p != old_path.as_str()) {
                Some(new_path) => {
                    write_new_file(&resolve(target, new_path)?, new_content)?;
                    fs::remove_file(&old).with_context(|| format!("failed to remove {}", old.display()))?;
                }
                None => write_file(&old, new_content)?,
            }
        }
        FileCommand::DeleteFile { old_path, .. } => {
            let old = resolve(target, old_path)?;
            fs::remove_file(&old).with_context(|| format!("failed to remove {}", old.display()))?;
        }
        FileCommand::MoveFile { old_path, new_path, .. } => {
            let (old, new) = (resolve(target, old_path)?, resolve(target, new_path)?);
            ensure_absent(&new)?;
            ensure_parent(&new)?;
            fs::rename(&old, &new)
                .with_context(|| format!("failed to move {} to {}", old.display(), new.display()))?;
        }
        FileCommand::CopyFile { old_path, new_path, old_content, new_content, .. } => {
            let (old, new) = (resolve(target, old_path)?, resolve(target, new_path)?);
            if let Some(expected) = old_content {
                ensure_unchanged(&old, expected)?;
            }
            match new_content {
                Some(content) => write_new_file(&new, content)?,
                None => {
                    ensure_absent(&new)?;
                    ensure_parent(&new)?;
                    fs::copy(&old, &new)
                        .with_context(|| format!("failed to copy {} to {}", old.display(), new.display()))?;
                }
            }
        }
    }
    Ok(())
}

/// Apply commands in order, stopping at the first failure. Returns how many
/// were applied.
pub fn apply_commands(target: &Path, commands: &[FileCommand]) -> Result<usize> {
    for (index, command) in commands.iter().enumerate() {
        debug!(index, kind = %command.kind(), path = command.primary_path(), "applying file command");
        apply_command(target, command).with_context(|| {
            format!("{} #{index} from codemod '{}' failed", command.kind(), command.codemod_name())
        })?;
    }
    Ok(commands.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn name() -> String {
        "test-codemod".to_string()
    }

    #[test]
    fn applies_every_kind() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.ts"), "old a\n").unwrap();
        fs::write(root.join("b.ts"), "b\n").unwrap();
        fs::write(root.join("c.ts"), "c\n").unwrap();
        fs::write(root.join("d.ts"), "d\n").unwrap();

        let commands = vec![
            FileCommand::CreateFile { new_path: "new/e.ts".into(), new_content: "e\n".into(), codemod_name: name() },
            FileCommand::UpdateFile {
                old_path: "a.ts".into(),
                old_content: "old a\n".into(),
                new_content: "new a\n".into(),
                codemod_name: name(),
                new_path: None,
            },
            FileCommand::DeleteFile { old_path: "b.ts".into(), codemod_name: name() },
            FileCommand::MoveFile { old_path: "c.ts".into(), new_path: "moved/c.ts".into(), codemod_name: name() },
            FileCommand::CopyFile {
                old_path: "d.ts".into(),
                new_path: "copy/d.ts".into(),
                codemod_name: name(),
                old_content: None,
                new_content: None,
            },
        ];
        assert_eq!(apply_commands(root, &commands).unwrap(), 5);

        assert_eq!(fs::read_to_string(root.join("new/e.ts")).unwrap(), "e\n");
        assert_eq!(fs::read_to_string(root.join("a.ts")).unwrap(), "new a\n");
        assert!(!root.join("b.ts").exists());
        assert!(!root.join("c.ts").exists());
        assert_eq!(fs::read_to_string(root.join("moved/c.ts")).unwrap(), "c\n");
        assert_eq!(fs::read_to_string(root.join("d.ts")).unwrap(), "d\n");
        assert_eq!(fs::read_to_string(root.join("copy/d.ts")).unwrap(), "d\n");
    }

    #[test]
    fn relocating_update_removes_old_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "x\n").unwrap();
        let command = FileCommand::UpdateFile {
            old_path: "a.js".into(),
            old_content: "x\n".into(),
            new_content: "y\n".into(),
            codemod_name: name(),
            new_path: Some("a.ts".into()),
        };
        apply_command(dir.path(), &command).unwrap();
        assert!(!dir.path().join("a.js").exists());
        assert_eq!(fs::read_to_string(dir.path().join("a.ts")).unwrap(), "y\n");
    }

    #[test]
    fn stale_update_is_refused() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.ts"), "edited by hand\n").unwrap();
        let command = FileCommand::UpdateFile {
            old_path: "a.ts".into(),
            old_content: "baseline\n".into(),
            new_content: "codemod output\n".into(),
            codemod_name: "upgrade".into(),
            new_path: None,
        };
        let err = apply_commands(dir.path(), &[command]).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("changed on disk"), "{msg}");
        assert!(msg.contains("codemod 'upgrade'"), "{msg}");
        assert_eq!(fs::read_to_string(dir.path().join("a.ts")).unwrap(), "edited by hand\n");
    }

    #[test]
    fn create_over_existing_file_is_refused() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("exists.ts"), "keep\n").unwrap();
        let command = FileCommand::CreateFile {
            new_path: "exists.ts".into(),
            new_content: "new\n".into(),
            codemod_name: "scaffold".into(),
        };
        let err = apply_commands(dir.path(), &[command]).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("refusing to overwrite"), "{msg}");
        assert!(msg.contains("codemod 'scaffold'"), "{msg}");
        assert_eq!(fs::read_to_string(dir.path().join("exists.ts")).unwrap(), "keep\n");
    }

    #[test]
    fn relocating_update_does_not_clobber_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "x\n").unwrap();
        fs::write(dir.path().join("a.ts"), "already here\n").unwrap();
        let command = FileCommand::UpdateFile {
            old_path: "a.js".into(),
            old_content: "x\n".into(),
            new_content: "y\n".into(),
            codemod_name: name(),
            new_path: Some("a.ts".into()),
        };
        assert!(apply_command(dir.path(), &command).is_err());
        assert_eq!(fs::read_to_string(dir.path().join("a.js")).unwrap(), "x\n");
        assert_eq!(fs::read_to_string(dir.path().join("a.ts")).unwrap(), "already here\n");
    }

    #[test]
    fn move_onto_existing_file_is_refused() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.ts"), "a\n").unwrap();
        fs::write(dir.path().join("b.ts"), "b\n").unwrap();
        let command = FileCommand::MoveFile { old_path: "a.ts".into(), new_path: "b.ts".into(), codemod_name: name() };
        assert!(apply_command(dir.path(), &command).is_err());
        assert_eq!(fs::read_to_string(dir.path().join("b.ts")).unwrap(), "b\n");
    }

    #[test]
    fn parent_dir_paths_are_rejected() {
        let dir = TempDir::new().unwrap();
        let command = FileCommand::CreateFile {
            new_path: "../escape.ts".into(),
            new_content: String::new(),
            codemod_name: name(),
        };
        let err = apply_commands(dir.path(), &[command]).unwrap_err();
        assert!(format!("{err:#}").contains("escapes target"));
    }

    #[test]
    fn failure_names_the_codemod() {
        let dir = TempDir::new().unwrap();
        let command = FileCommand::DeleteFile { old_path: "missing.ts".into(), codemod_name: "cleanup".into() };
        let err = apply_commands(dir.path(), &[command]).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("deleteFile #0 from codemod 'cleanup'"), "{msg}");
    }
}
