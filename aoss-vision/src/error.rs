use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VisionError {
    #[error("frame has zero size ({width}x{height})")]
    EmptyFrame { width: usize, height: usize },

    #[error("frame size {width}x{height} does not fit in memory")]
    TooLarge { width: usize, height: usize },

    #[error("pixel buffer holds {actual} bytes, {expected} needed")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("image sizes differ: {left:?} vs {right:?}")]
    SizeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

pub type Result<T> = std::result::Result<T, VisionError>;
