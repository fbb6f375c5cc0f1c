// -*- indent-tabs-mode: nil; tab-width: 4; -*-
// vim: set ts=4 sw=4 et ai :

use std::error::Error;
use std::fmt;

use crate::request::PortOperation;

/// Failure reported by a `PortApi` implementation.
#[derive(Debug)]
pub enum ApiError {
    /// The agent could not be reached, or the request timed out.
    Transport(String),
    /// The agent answered with a non-success status.
    Rejected { status: u16, body: String },
    /// The request could not be built.
    Encode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "agent unreachable: {msg}"),
            ApiError::Rejected { status, body } if body.is_empty() => {
                write!(f, "agent rejected request with status {status}")
            }
            ApiError::Rejected { status, body } => {
                write!(f, "agent rejected request with status {status}: {body}")
            }
            ApiError::Encode(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_builder() {
            ApiError::Encode(value.to_string())
        } else {
            ApiError::Transport(value.to_string())
        }
    }
}

/// Errors a dispatch can end with.
#[derive(Debug)]
pub enum DispatchError {
    /// The operation token is neither `add` nor `delete`.
    InvalidOperation(String),
    /// Wrong number of positional fields for a recognized operation.
    ArgumentCountMismatch {
        operation: PortOperation,
        expected: usize,
        actual: usize,
    },
    AddOperationFailed(ApiError),
    /// Only returned by `Dispatcher::execute`; `dispatch` suppresses it.
    DeleteOperationFailed(ApiError),
    /// The host lock could not be taken; no external call was made.
    Lock(std::io::Error),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidOperation(op) if op.is_empty() => {
                write!(f, "missing operation, must be add or delete")
            }
            DispatchError::InvalidOperation(op) => {
                write!(f, "invalid operation {op:?}, must be add or delete")
            }
            DispatchError::ArgumentCountMismatch { operation, expected, actual } => write!(
                f,
                "{operation} takes {expected} arguments including the operation, got {actual}"
            ),
            DispatchError::AddOperationFailed(e) => write!(f, "add port failed: {e}"),
            DispatchError::DeleteOperationFailed(e) => write!(f, "delete port failed: {e}"),
            DispatchError::Lock(e) => write!(f, "failed to take host lock: {e}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::AddOperationFailed(e) | DispatchError::DeleteOperationFailed(e) => Some(e),
            DispatchError::Lock(e) => Some(e),
            _ => None,
        }
    }
}
