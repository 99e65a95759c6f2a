//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors describe why a structural operation did not happen.
///
/// `move_node` and `nest_node` never surface these: they turn every error
/// into a no-op that hands back the original tree. The `try_*` variants
/// return them for callers that want the reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NotFound(String),

    #[error("cannot relocate {dragged} relative to {target}: target is the node itself or inside its subtree")]
    SelfReference { dragged: String, target: String },

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("invalid node path: {0}")]
    InvalidPath(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
