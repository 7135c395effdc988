//! Error type shared by every read port.

use crate::domain::{FailureKind, SourceFailure, SourceKey};

use super::define_port_error;

define_port_error! {
    /// Errors raised by marketplace read adapters.
    pub enum SourceError {
        /// Network failure or server-side error.
        Unavailable { message: String } => "backend unavailable: {message}",
        /// Credentials are missing, expired, or insufficient.
        Unauthorized { message: String } => "request not authorised: {message}",
        /// The requested resource does not exist.
        NotFound { message: String } => "resource not found: {message}",
        /// The backend rejected the request.
        Rejected { message: String } => "request rejected: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "response could not be decoded: {message}",
        /// No response arrived in time.
        Timeout { message: String } => "request timed out: {message}",
    }
}

impl SourceError {
    /// Failure category for dashboard diagnostics.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unavailable { .. } => FailureKind::Unavailable,
            Self::Unauthorized { .. } => FailureKind::Unauthorized,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::Rejected { .. } => FailureKind::Rejected,
            Self::Decode { .. } => FailureKind::Decode,
            Self::Timeout { .. } => FailureKind::Timeout,
        }
    }

    /// Adapter-supplied detail.
    pub fn message(&self) -> &str {
        match self {
            Self::Unavailable { message }
            | Self::Unauthorized { message }
            | Self::NotFound { message }
            | Self::Rejected { message }
            | Self::Decode { message }
            | Self::Timeout { message } => message.as_str(),
        }
    }

    /// Record this error as the failure of `key`.
    pub fn into_failure(self, key: SourceKey) -> SourceFailure {
        let kind = self.kind();
        let message = match self {
            Self::Unavailable { message }
            | Self::Unauthorized { message }
            | Self::NotFound { message }
            | Self::Rejected { message }
            | Self::Decode { message }
            | Self::Timeout { message } => message,
        };
        SourceFailure::new(key, kind, message)
    }
}
