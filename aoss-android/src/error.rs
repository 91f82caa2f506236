use aoss_vision::VisionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid frame size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error("JNI call failed: {0}")]
    Jni(#[from] jni::errors::Error),
}

impl BridgeError {
    /// Java exception class raised for this error
    pub fn java_class(&self) -> &'static str {
        match self {
            BridgeError::InvalidSize { .. } | BridgeError::Vision(_) => {
                "java/lang/IllegalArgumentException"
            }
            BridgeError::Jni(_) => "java/lang/RuntimeException",
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
