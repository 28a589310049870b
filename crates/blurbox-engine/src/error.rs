use thiserror::Error;

use crate::shader::ShaderStage;

/// Errors raised while bringing up the render pipeline.
///
/// All of them are fatal for startup. Once a `BounceRenderer` exists, frames
/// have no error path beyond surface handling in the device layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Surface, adapter or device could not be acquired.
    #[error("GPU context unavailable: {reason}")]
    ContextUnavailable { reason: String },

    /// The shader front-end rejected a source. `log` holds the diagnostics.
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    /// Stage interfaces or uniform declarations do not agree.
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },

    #[error("invalid vertex data: {reason}")]
    Geometry { reason: String },

    #[error("invalid rectangle state: {reason}")]
    InvalidState { reason: String },
}

impl Error {
    pub(crate) fn context_unavailable(reason: impl Into<String>) -> Self {
        Error::ContextUnavailable {
            reason: reason.into(),
        }
    }

    pub(crate) fn link(log: impl Into<String>) -> Self {
        Error::Link { log: log.into() }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
