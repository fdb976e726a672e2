//! Turns file commands into preview records.
//!
//! Every command yields exactly one [`DiffPreview`], in input order, whether
//! or not it has a diff body.

use std::thread;

use crossbeam_channel::unbounded;
use tracing::{debug, trace};

use crate::diff::{DiffOptions, render_diff};
use crate::protocol::{DiffPreview, FileCommand};

#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewEngine {
    options: DiffOptions,
}

impl PreviewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn compute_diff(&self, command: &FileCommand) -> DiffPreview {
        let (filename, diff) = match command {
            FileCommand::DeleteFile { old_path, .. } => (old_path.clone(), String::new()),
            FileCommand::MoveFile { old_path, new_path, .. } => (format!("{old_path} -> {new_path}"), String::new()),
            FileCommand::CopyFile { old_path, new_path, old_content, new_content, .. } => {
                let diff = match (old_content, new_content) {
                    (Some(old), Some(new)) => render_diff(old, new, self.options),
                    _ => String::new(),
                };
                (format!("COPIED: {old_path} -> {new_path}"), diff)
            }
            FileCommand::CreateFile { new_path, new_content, .. } => {
                (new_path.clone(), render_diff("", new_content, self.options))
            }
            FileCommand::UpdateFile { old_path, old_content, new_content, new_path, .. } => {
                let filename = match new_path {
                    Some(new_path) if new_path != old_path => format!("{old_path} -> {new_path}"),
                    _ => old_path.clone(),
                };
                (filename, render_diff(old_content, new_content, self.options))
            }
        };
        trace!(kind = %command.kind(), %filename, diff_len = diff.len(), "computed preview");

        DiffPreview {
            filename,
            codemod_name: command.codemod_name().to_string(),
            diff,
        }
    }

    pub fn compute_diffs(&self, commands: &[FileCommand]) -> Vec<DiffPreview> {
        commands.iter().map(|c| self.compute_diff(c)).collect()
    }

    /// Same result as [`Self::compute_diffs`], computed on up to `threads`
    /// scoped workers pulling from a shared queue.
    pub fn compute_diffs_parallel(&self, commands: &[FileCommand], threads: usize) -> Vec<DiffPreview> {
        let workers = threads.min(commands.len());
        if workers <= 1 {
            return self.compute_diffs(commands);
        }
        debug!(commands = commands.len(), workers, "computing previews in parallel");

        let (job_tx, job_rx) = unbounded::<(usize, &FileCommand)>();
        let (done_tx, done_rx) = unbounded::<(usize, DiffPreview)>();
        for job in commands.iter().enumerate() {
            // Receiver is alive for the whole scope below.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    for (idx, command) in job_rx.iter() {
                        if done_tx.send((idx, self.compute_diff(command))).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(done_tx);

        // Reassemble in input order.
        let mut results: Vec<Option<DiffPreview>> = vec![None; commands.len()];
        for (idx, preview) in done_rx.iter() {
            results[idx] = Some(preview);
        }
        results
            .into_iter()
            .zip(commands)
            .map(|(preview, command)| preview.unwrap_or_else(|| self.compute_diff(command)))
            .collect()
    }
}

/// [`PreviewEngine::compute_diff`] with full-content diffs.
pub fn compute_diff(command: &FileCommand) -> DiffPreview {
    PreviewEngine::new().compute_diff(command)
}

/// [`PreviewEngine::compute_diffs`] with full-content diffs.
pub fn compute_diffs(commands: &[FileCommand]) -> Vec<DiffPreview> {
    PreviewEngine::new().compute_diffs(commands)
}

/// [`PreviewEngine::compute_diffs_parallel`] with full-content diffs.
pub fn compute_diffs_parallel(commands: &[FileCommand], threads: usize) -> Vec<DiffPreview> {
    PreviewEngine::new().compute_diffs_parallel(commands, threads)
}
