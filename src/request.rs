// -*- indent-tabs-mode: nil; tab-width: 4; -*-
// vim: set ts=4 sw=4 et ai :

//! Parsing of the hook's positional arguments.

use std::fmt;

use crate::api::{PortType, VmPort};
use crate::error::DispatchError;

/// Number of arguments an `add` takes, operation included.
pub const ADD_ARG_COUNT: usize = 8;

/// Number of arguments a `delete` takes, operation included.
pub const DELETE_ARG_COUNT: usize = 2;

/// What the dispatcher does when the external call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the failure to the caller.
    Propagate,
    /// Log the failure and report success.
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortOperation {
    Add,
    Delete,
}

impl PortOperation {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "add" => Some(PortOperation::Add),
            "delete" => Some(PortOperation::Delete),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PortOperation::Add => "add",
            PortOperation::Delete => "delete",
        }
    }

    /// Argument count including the operation token.
    pub const fn arg_count(self) -> usize {
        match self {
            PortOperation::Add => ADD_ARG_COUNT,
            PortOperation::Delete => DELETE_ARG_COUNT,
        }
    }

    /// A failed add is reported to the hook's caller; a failed delete never is.
    pub const fn failure_policy(self) -> FailurePolicy {
        match self {
            PortOperation::Add => FailurePolicy::Propagate,
            PortOperation::Delete => FailurePolicy::Suppress,
        }
    }
}

impl fmt::Display for PortOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request, one per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortOperationRequest {
    Add(VmPort),
    Delete { interface_id: String },
}

impl PortOperationRequest {
    /// Validate `args` (program name excluded) into a request.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, DispatchError> {
        let token = args.first().map(|s| s.as_ref()).unwrap_or("");
        let operation = PortOperation::from_token(token)
            .ok_or_else(|| DispatchError::InvalidOperation(token.to_string()))?;

        if args.len() != operation.arg_count() {
            return Err(DispatchError::ArgumentCountMismatch {
                operation,
                expected: operation.arg_count(),
                actual: args.len(),
            });
        }

        let field = |i: usize| args[i].as_ref().to_string();
        let request = match operation {
            PortOperation::Add => PortOperationRequest::Add(VmPort {
                vm_id: field(1),
                interface_id: field(2),
                interface_name: strip_quotes(args[3].as_ref()),
                mac_address: field(4),
                port_type: PortType::NovaVmPort,
                display_name: field(5),
                ip_address: field(6),
                network_id: field(7),
            }),
            PortOperation::Delete => PortOperationRequest::Delete { interface_id: field(1) },
        };
        Ok(request)
    }

    pub fn operation(&self) -> PortOperation {
        match self {
            PortOperationRequest::Add(_) => PortOperation::Add,
            PortOperationRequest::Delete { .. } => PortOperation::Delete,
        }
    }

    pub fn interface_id(&self) -> &str {
        match self {
            PortOperationRequest::Add(port) => &port.interface_id,
            PortOperationRequest::Delete { interface_id } => interface_id,
        }
    }
}

fn strip_quotes(s: &str) -> String {
    s.replace('"', "")
}
