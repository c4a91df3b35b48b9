use thiserror::Error;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable failures: setup mistakes the caller can correct.
///
/// Contract violations (bad lifecycle ordering, unsupported tags, tensor
/// precondition failures) are not represented here; they panic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Protobuf parsing error: {0}")]
    ProtobufError(#[from] prost::DecodeError),

    #[error("Missing {0} path")]
    MissingPath(String),

    #[error("Failed to load model from {0}: {1}")]
    ModelLoadError(PathBuf, String),

    #[error("Invalid model description: {0}")]
    InvalidModel(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Model description contains no operators")]
    EmptyGraph,

    #[error("Operator not found: {0}")]
    OperatorNotFound(String),

    #[error("Operator {0} is referenced but never defined")]
    UndefinedOperator(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
