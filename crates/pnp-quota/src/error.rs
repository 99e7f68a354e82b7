use crate::{
    ThisError, access::AccessError, config::ConfigError, dto::error::ErrorCode,
    ops::send::SendError,
};

///
/// Error
///
/// Crate-level error. Nothing here reaches the transport directly: at the
/// endpoint boundary every failure is reported as a failure envelope carrying
/// [`Error::code`].
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Send(#[from] SendError),
}

impl Error {
    /// Wire code reported when this error ends a call.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Access(AccessError::Auth(_)) => ErrorCode::UnauthenticatedUser,
            Self::Access(AccessError::Validation(_)) => ErrorCode::InvalidInput,
            Self::Config(_) | Self::Send(_) => ErrorCode::Internal,
        }
    }
}
