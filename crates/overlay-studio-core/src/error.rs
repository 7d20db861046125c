//! Engine error type.

use crate::scene::ComponentId;
use thiserror::Error;

/// Errors produced by the geometry engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Component not found: {0}")]
    UnknownComponent(ComponentId),
    #[error("Component {0} cannot be its own parent")]
    SelfParent(ComponentId),
    #[error("Parenting {child} under {parent} would create a cycle")]
    CycleDetected {
        child: ComponentId,
        parent: ComponentId,
    },
    #[error("Operation needs at least {required} selected components, got {actual}")]
    InsufficientSelection { required: usize, actual: usize },
    #[error("Bounding box has zero extent")]
    DegenerateBounds,
    #[error("Resize would shrink a group member below the minimum size")]
    BelowGroupMinimum,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
