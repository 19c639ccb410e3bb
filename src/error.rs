use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failures of a whole import or export operation. Everything here aborts
/// the operation; there is no partial commit.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("conversion failed: {0}")]
    ConversionFailed(String),

    #[error("external converter did not finish within {0} seconds")]
    Timeout(u64),

    #[error("converter executable not found: {}", .0.display())]
    ProcessNotFound(PathBuf),

    #[error(transparent)]
    HostApi(#[from] HostApiError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    pub fn precondition<T: ToString>(msg: T) -> Self {
        BridgeError::PreconditionFailed(msg.to_string())
    }

    pub fn conversion<T: ToString>(msg: T) -> Self {
        BridgeError::ConversionFailed(msg.to_string())
    }
}

/// Per-object failures reported by the host scene API.
///
/// `MissingObject` means the handle no longer resolves. Inside the filter
/// pipeline that is usually the desired end state (a previous step deleted
/// the object) and is tolerated per object; every other kind propagates.
#[derive(Error, Debug)]
pub enum HostApiError {
    #[error("object not found in scene: {0}")]
    MissingObject(String),

    #[error("scene operation `{op}` rejected: {message}")]
    Rejected { op: &'static str, message: String },
}

impl HostApiError {
    pub fn rejected<T: ToString>(op: &'static str, message: T) -> Self {
        HostApiError::Rejected {
            op,
            message: message.to_string(),
        }
    }

    pub fn is_missing_object(&self) -> bool {
        matches!(self, HostApiError::MissingObject(_))
    }
}
