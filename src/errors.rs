use thiserror::Error;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents a submission body that could not be decoded.
    #[error("Malformed form submission")]
    MalformedFormSubmission,

    /// Represents a submission sent as neither a form nor JSON.
    #[error("Unsupported media type")]
    UnsupportedMediaType,

    /// Represents an illegal transition of the submission workflow.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Enumerates errors returned by the store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    /// Represents a store that cannot currently be reached.
    #[error("store unavailable")]
    Unavailable,
}

/// Enumerates attempts to drive the submission workflow from a state
/// that does not allow the action.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Fields may only change while editing.
    #[error("fields can only be edited while editing")]
    NotEditing,

    /// A submission is already being saved.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// The action needs a state the workflow is not in.
    #[error("cannot {action} while {phase}")]
    UnexpectedPhase {
        action: &'static str,
        phase: &'static str,
    },
}
