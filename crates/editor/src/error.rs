//! Typed failure results for engine mutations.
//!
//! Every mutating operation either fully applies and records one history
//! snapshot, or returns one of these and leaves the document unchanged.

use shared::{DocumentId, LayerId};

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by engine operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No document with the given id is open
    DocumentNotFound(DocumentId),
    /// A mutation was requested while no document is active
    NoActiveDocument,
    /// The referenced layer is not in the active document's layer list
    LayerNotFound(LayerId),
    /// A fill could not resolve a usable base layer
    NoBaseLayer,
    /// The target area cannot fit a second copy of the base layer
    InsufficientSpace,
    /// The external decode collaborator rejected the image bytes
    Decode(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::DocumentNotFound(id) => write!(f, "Document '{}' not found", id),
            EngineError::NoActiveDocument => write!(f, "No active document"),
            EngineError::LayerNotFound(id) => write!(f, "Layer '{}' not found", id),
            EngineError::NoBaseLayer => write!(f, "No usable base layer for fill"),
            EngineError::InsufficientSpace => {
                write!(f, "Target area cannot fit a second copy of the base layer")
            }
            EngineError::Decode(msg) => write!(f, "Image decode failed: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
