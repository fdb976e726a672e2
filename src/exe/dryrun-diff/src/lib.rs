//! Dry-run preview of the file commands emitted by a codemod run.
//!
//! Commands come in through [`protocol::RawFileCommand`] (the loose wire
//! shape), get validated into [`FileCommand`], and are turned into
//! [`DiffPreview`] records by the engine. Nothing here touches the
//! filesystem.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod diff;
pub mod engine;
pub mod error;
pub mod protocol;

pub use diff::DiffOptions;
pub use engine::{PreviewEngine, compute_diff, compute_diffs, compute_diffs_parallel};
pub use error::DryRunError;
pub use protocol::{DiffPreview, FileCommand, RawFileCommand};
