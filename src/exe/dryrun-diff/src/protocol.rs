use serde::{Deserialize, Serialize};

use crate::error::{DryRunError, Result};

/// A single filesystem mutation produced by a codemod run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FileCommand {
    CreateFile {
        new_path: String,
        new_content: String,
        codemod_name: String,
    },
    UpdateFile {
        old_path: String,
        old_content: String,
        new_content: String,
        codemod_name: String,
        /// Set when the update also relocates the file.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_path: Option<String>,
    },
    DeleteFile {
        old_path: String,
        codemod_name: String,
    },
    MoveFile {
        old_path: String,
        new_path: String,
        codemod_name: String,
    },
    CopyFile {
        old_path: String,
        new_path: String,
        codemod_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old_content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_content: Option<String>,
    },
}

impl FileCommand {
    pub fn codemod_name(&self) -> &str {
        match self {
            FileCommand::CreateFile { codemod_name, .. }
            | FileCommand::UpdateFile { codemod_name, .. }
            | FileCommand::DeleteFile { codemod_name, .. }
            | FileCommand::MoveFile { codemod_name, .. }
            | FileCommand::CopyFile { codemod_name, .. } => codemod_name,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            FileCommand::CreateFile { .. } => CommandKind::CreateFile,
            FileCommand::UpdateFile { .. } => CommandKind::UpdateFile,
            FileCommand::DeleteFile { .. } => CommandKind::DeleteFile,
            FileCommand::MoveFile { .. } => CommandKind::MoveFile,
            FileCommand::CopyFile { .. } => CommandKind::CopyFile,
        }
    }

    /// The path a command is about: the new file for creations, the source otherwise.
    pub fn primary_path(&self) -> &str {
        match self {
            FileCommand::CreateFile { new_path, .. } => new_path,
            FileCommand::UpdateFile { old_path, .. }
            | FileCommand::DeleteFile { old_path, .. }
            | FileCommand::MoveFile { old_path, .. }
            | FileCommand::CopyFile { old_path, .. } => old_path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandKind {
    CreateFile,
    UpdateFile,
    DeleteFile,
    MoveFile,
    CopyFile,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::CreateFile => "createFile",
            CommandKind::UpdateFile => "updateFile",
            CommandKind::DeleteFile => "deleteFile",
            CommandKind::MoveFile => "moveFile",
            CommandKind::CopyFile => "copyFile",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preview record for one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPreview {
    pub filename: String,
    pub codemod_name: String,
    pub diff: String,
}

/// Loose wire shape of a command: every field optional so a missing one can
/// be reported against its codemod and index instead of as a bare decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFileCommand {
    pub kind: Option<CommandKind>,
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub old_content: Option<String>,
    pub new_content: Option<String>,
    pub codemod_name: Option<String>,
}

impl RawFileCommand {
    /// Validate into a [`FileCommand`]. `fallback_name` attributes commands
    /// the engine emitted without a codemod name.
    pub fn validate(self, index: usize, fallback_name: Option<&str>) -> Result<FileCommand> {
        let codemod_name = self
            .codemod_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| fallback_name.filter(|n| !n.trim().is_empty()).map(str::to_string));
        let kind_label = self.kind.map(|k| k.as_str()).unwrap_or("unknown");

        let invalid = |name: Option<&str>, field: &'static str| DryRunError::InvalidCommand {
            index,
            codemod_name: name.unwrap_or("<unnamed>").to_string(),
            kind: kind_label,
            field,
        };

        let Some(kind) = self.kind else {
            return Err(invalid(codemod_name.as_deref(), "kind"));
        };
        let Some(codemod_name) = codemod_name else {
            return Err(invalid(None, "codemodName"));
        };
        let name = Some(codemod_name.as_str());
        let path = |value: Option<String>, field: &'static str| {
            value.filter(|p| !p.is_empty()).ok_or_else(|| invalid(name, field))
        };
        let content = |value: Option<String>, field: &'static str| value.ok_or_else(|| invalid(name, field));

        let command = match kind {
            CommandKind::CreateFile => FileCommand::CreateFile {
                new_path: path(self.new_path, "newPath")?,
                new_content: content(self.new_content, "newContent")?,
                codemod_name: codemod_name.clone(),
            },
            CommandKind::UpdateFile => FileCommand::UpdateFile {
                old_path: path(self.old_path, "oldPath")?,
                old_content: content(self.old_content, "oldContent")?,
                new_content: content(self.new_content, "newContent")?,
                new_path: self.new_path.filter(|p| !p.is_empty()),
                codemod_name: codemod_name.clone(),
            },
            CommandKind::DeleteFile => FileCommand::DeleteFile {
                old_path: path(self.old_path, "oldPath")?,
                codemod_name: codemod_name.clone(),
            },
            CommandKind::MoveFile => FileCommand::MoveFile {
                old_path: path(self.old_path, "oldPath")?,
                new_path: path(self.new_path, "newPath")?,
                codemod_name: codemod_name.clone(),
            },
            CommandKind::CopyFile => FileCommand::CopyFile {
                old_path: path(self.old_path, "oldPath")?,
                new_path: path(self.new_path, "newPath")?,
                old_content: self.old_content,
                new_content: self.new_content,
                codemod_name: codemod_name.clone(),
            },
        };
        Ok(command)
    }
}

/// Validate a whole batch, stopping at the first bad command.
pub fn validate_commands(raw: Vec<RawFileCommand>, fallback_name: Option<&str>) -> Result<Vec<FileCommand>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, cmd)| cmd.validate(index, fallback_name))
        .collect()
}
