use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("Invalid dimension")]
    InvalidDimension = 1,
    #[error("Shape mismatch")]
    ShapeMismatch = 2,
    #[error("Invalid sequence length")]
    InvalidSequenceLength = 3,
    #[error("Invalid run length")]
    InvalidRunLength = 4,
    #[error("Odd dimension not supported")]
    OddDimension = 5,
    #[error("Index out of range")]
    IndexOutOfRange = 6,

    // Logic errors
    #[error("Invalid argument levels")]
    InvalidArgumentLevels = 100,
}
