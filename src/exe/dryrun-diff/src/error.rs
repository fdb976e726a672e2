use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DryRunError {
    /// A command is missing a required field, or carries an empty one.
    #[error("invalid {kind} command at index {index} from codemod '{codemod_name}': missing or empty `{field}`")]
    InvalidCommand {
        index: usize,
        codemod_name: String,
        kind: &'static str,
        field: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, DryRunError>;
