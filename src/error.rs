use thiserror::Error;

/// Top-level error type for the brepkit shape kernel.
#[derive(Debug, Error)]
pub enum BrepError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to shape construction and modelling operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid dimension {parameter} = {value}: must be finite and positive")]
    InvalidDimension { parameter: &'static str, value: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while building typed value containers.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("type mismatch at index {index}: expected {expected}, found {found}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors raised while decoding serialized shapes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("corrupt shape data: {0}")]
    CorruptData(String),
}

impl BrepError {
    /// Returns `true` if this is an [`OperationError::InvalidDimension`].
    #[must_use]
    pub fn is_invalid_dimension(&self) -> bool {
        matches!(
            self,
            Self::Operation(OperationError::InvalidDimension { .. })
        )
    }

    /// Returns `true` if this is a [`ContainerError::TypeMismatch`].
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::Container(ContainerError::TypeMismatch { .. }))
    }

    /// Returns `true` if this is a [`CodecError::CorruptData`].
    #[must_use]
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, Self::Codec(CodecError::CorruptData(_)))
    }
}

/// Convenience type alias for results using [`BrepError`].
pub type Result<T> = std::result::Result<T, BrepError>;
