use thiserror::Error;

/// Errors raised while building the data the renderer consumes.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("A network needs at least one layer")]
    NoLayers,
    #[error("Layer {index} must have at least one neuron")]
    EmptyLayer { index: usize },
    #[error("Confusion matrix must be square and non-empty (got {rows} rows, row {row} has {len} cells)")]
    NotSquare { rows: usize, row: usize, len: usize },
    #[error("Unknown network template '{name}'")]
    UnknownTemplate { name: String },
    #[error("Invalid template definition: {0}")]
    Template(#[from] serde_json::Error),
}

/// Why a session action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("Please create a network first")]
    NoNetwork,
    #[error("Please load a dataset first")]
    NoDataset,
    #[error("Please select a file")]
    NoDatasetFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The action was aborted and reported to the log sink as a warning.
    #[error(transparent)]
    PreconditionNotMet(#[from] Precondition),
}
