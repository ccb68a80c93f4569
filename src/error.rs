//! Error taxonomy.
//!
//! Every failure the tool can report falls into one of four kinds:
//! - invalid input: conflicting identifier filters, caught before any remote call
//! - remote: the describe call failed, carries the provider error code
//! - transform: a record came back in a shape we cannot normalize
//! - config: the config file could not be read or parsed

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Context attached to every remote failure.
pub const REMOTE_CONTEXT: &str = "failed to get snapshot information";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Remote,
    Transform,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Remote => "remote",
            ErrorKind::Transform => "transform",
            ErrorKind::Config => "config",
        }
    }
}

/// Classification of a failed describe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientErrorKind {
    AccessDenied,
    NotFound,
    Throttled,
    InvalidRequest,
    /// the client itself could not be started (binary missing, spawn failure)
    Unavailable,
    Other,
}

impl ClientErrorKind {
    /// Classify a provider error code such as `DBSnapshotNotFound` or `Throttling`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "AccessDenied" | "AccessDeniedException" | "UnauthorizedOperation"
            | "UnrecognizedClientException" | "InvalidClientTokenId" | "ExpiredToken"
            | "ExpiredTokenException" | "SignatureDoesNotMatch" | "AuthFailure" => {
                ClientErrorKind::AccessDenied
            }
            "Throttling" | "ThrottlingException" | "RequestLimitExceeded"
            | "TooManyRequestsException" | "RequestThrottled" => ClientErrorKind::Throttled,
            "InvalidParameterValue" | "InvalidParameterCombination" | "ValidationError"
            | "MissingParameter" | "InvalidParameter" => ClientErrorKind::InvalidRequest,
            c if c.ends_with("NotFound") || c.ends_with("NotFoundFault") => {
                ClientErrorKind::NotFound
            }
            _ => ClientErrorKind::Other,
        }
    }
}

/// A failure reported by an [`RdsClient`](crate::client::RdsClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub code: Option<String>,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        ClientError {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Build from a provider error code, classifying it on the way.
    pub fn from_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        ClientError {
            kind: ClientErrorKind::from_code(&code),
            code: Some(code),
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ClientError {}

#[derive(Debug, Error)]
pub enum Error {
    #[error("parameters are mutually exclusive: {}", .0.join("|"))]
    MutuallyExclusive(Vec<&'static str>),

    #[error("{context}: {source}")]
    Remote {
        context: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("malformed snapshot record: {0}")]
    Transform(String),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    pub fn remote(source: ClientError) -> Self {
        Error::Remote {
            context: REMOTE_CONTEXT,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MutuallyExclusive(_) => ErrorKind::InvalidInput,
            Error::Remote { .. } => ErrorKind::Remote,
            Error::Transform(_) => ErrorKind::Transform,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Provider error code, only present on remote failures that carried one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Remote { source, .. } => source.code.as_deref(),
            _ => None,
        }
    }

    /// Context message shown to the caller alongside the underlying detail.
    pub fn context(&self) -> String {
        match self {
            Error::Remote { context, .. } => (*context).to_string(),
            other => other.to_string(),
        }
    }
}
