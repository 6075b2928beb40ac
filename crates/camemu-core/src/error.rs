use thiserror::Error;

/// Return codes of the camera capability handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("operation not supported in current state")]
    WrongStateForOperation,
    #[error("value out of range")]
    OutOfRange,
    #[error("operation not supported")]
    NotSupported,
    #[error("camera state lock poisoned")]
    LockPoisoned,
}

pub type HandlerResult<T> = Result<T, CameraError>;
