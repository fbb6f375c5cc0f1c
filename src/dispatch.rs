// -*- indent-tabs-mode: nil; tab-width: 4; -*-
// vim: set ts=4 sw=4 et ai :

//! Single-shot dispatch of one hook invocation to the port API.

use std::path::PathBuf;

use crate::api::PortApi;
use crate::error::DispatchError;
use crate::lock::HostLock;
use crate::request::{FailurePolicy, PortOperationRequest};

/// How a successful dispatch ended.
#[derive(Debug)]
pub enum Outcome {
    Added,
    Deleted,
    /// The delete failed; the error is only reported through logs.
    DeleteSuppressed(DispatchError),
}

/// Dispatches requests to an injected `PortApi`.
#[derive(Debug)]
pub struct Dispatcher<A> {
    api: A,
    lock_path: Option<PathBuf>,
}

impl<A: PortApi> Dispatcher<A> {
    /// Dispatcher that does no locking of its own.
    pub fn new(api: A) -> Self {
        Self { api, lock_path: None }
    }

    /// Hold an exclusive lock on `path` around each external call.
    pub fn with_lock_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.lock_path = Some(path.into());
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Validate `args` (program name excluded), perform the requested
    /// operation and apply its failure policy.
    ///
    /// Validation errors are always returned. Lock and API failures go
    /// through `PortOperation::failure_policy`.
    pub async fn dispatch<S: AsRef<str>>(&self, args: &[S]) -> Result<Outcome, DispatchError> {
        let request = PortOperationRequest::parse(args)?;
        let operation = request.operation();

        let err = match self.execute(&request).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) => e,
        };

        match operation.failure_policy() {
            FailurePolicy::Suppress => {
                log::warn!(
                    "{} of interface {} failed, not reporting failure: {}",
                    operation,
                    request.interface_id(),
                    err
                );
                Ok(Outcome::DeleteSuppressed(err))
            }
            FailurePolicy::Propagate => {
                log::error!("{} of interface {} failed: {}", operation, request.interface_id(), err);
                Err(err)
            }
        }
    }

    /// Perform exactly one external call for `request`, without applying the
    /// failure policy. Waiting for the host lock happens off the runtime thread.
    pub async fn execute(&self, request: &PortOperationRequest) -> Result<Outcome, DispatchError> {
        let _guard = match &self.lock_path {
            Some(path) => Some(HostLock::acquire_async(path.clone()).await.map_err(DispatchError::Lock)?),
            None => None,
        };

        match request {
            PortOperationRequest::Add(port) => {
                log::info!(
                    "adding port {} ({}) for vm {} on network {}",
                    port.interface_id,
                    port.interface_name,
                    port.vm_id,
                    port.network_id
                );
                self.api.add_port(port).await.map_err(DispatchError::AddOperationFailed)?;
                Ok(Outcome::Added)
            }
            PortOperationRequest::Delete { interface_id } => {
                log::info!("deleting port {}", interface_id);
                self.api.delete_port(interface_id).await.map_err(DispatchError::DeleteOperationFailed)?;
                Ok(Outcome::Deleted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PortType, VmPort};
    use crate::error::ApiError;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Add(VmPort),
        Delete(String),
    }

    /// Records calls and fails them on request.
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<Call>>,
        fail_with: Option<u16>,
    }

    impl RecordingApi {
        fn failing(status: u16) -> Self {
            Self { fail_with: Some(status), ..Default::default() }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn result(&self) -> Result<(), ApiError> {
            match self.fail_with {
                Some(status) => Err(ApiError::Rejected { status, body: "no such port".to_string() }),
                None => Ok(()),
            }
        }
    }

    impl PortApi for RecordingApi {
        async fn add_port(&self, port: &VmPort) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(Call::Add(port.clone()));
            self.result()
        }

        async fn delete_port(&self, interface_id: &str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(Call::Delete(interface_id.to_string()));
            self.result()
        }
    }

    fn add_args(if_name: &str) -> Vec<String> {
        ["add", "vm-1", "vif-1", if_name, "aa:bb:cc:dd:ee:ff", "cid-1", "10.0.0.5", "vn-1"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn expected_port(if_name: &str) -> VmPort {
        VmPort {
            vm_id: "vm-1".to_string(),
            interface_id: "vif-1".to_string(),
            interface_name: if_name.to_string(),
            mac_address: "aa:bb:cc:dd:ee:ff".to_string(),
            port_type: PortType::NovaVmPort,
            display_name: "cid-1".to_string(),
            ip_address: "10.0.0.5".to_string(),
            network_id: "vn-1".to_string(),
        }
    }

    #[tokio::test]
    async fn add_calls_api_once_with_fields_in_order() {
        let dispatcher = Dispatcher::new(RecordingApi::default());
        let outcome = dispatcher.dispatch(&add_args("eth0")).await.unwrap();

        assert!(matches!(outcome, Outcome::Added));
        assert_eq!(dispatcher.api().calls(), vec![Call::Add(expected_port("eth0"))]);
    }

    #[tokio::test]
    async fn add_strips_quotes_before_calling_api() {
        let dispatcher = Dispatcher::new(RecordingApi::default());
        dispatcher.dispatch(&add_args("\"eth0\"")).await.unwrap();

        assert_eq!(dispatcher.api().calls(), vec![Call::Add(expected_port("eth0"))]);
    }

    #[tokio::test]
    async fn add_failure_propagates() {
        let dispatcher = Dispatcher::new(RecordingApi::failing(500));
        let err = dispatcher.dispatch(&add_args("eth0")).await.unwrap_err();

        assert!(matches!(err, DispatchError::AddOperationFailed(ApiError::Rejected { status: 500, .. })));
        assert_eq!(dispatcher.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn delete_calls_api_with_interface_id() {
        let dispatcher = Dispatcher::new(RecordingApi::default());
        let outcome = dispatcher.dispatch(&["delete", "vif-1"]).await.unwrap();

        assert!(matches!(outcome, Outcome::Deleted));
        assert_eq!(dispatcher.api().calls(), vec![Call::Delete("vif-1".to_string())]);
    }

    #[tokio::test]
    async fn delete_failure_is_suppressed() {
        let dispatcher = Dispatcher::new(RecordingApi::failing(404));
        let outcome = dispatcher.dispatch(&["delete", "vif-1"]).await.unwrap();

        assert!(matches!(
            outcome,
            Outcome::DeleteSuppressed(DispatchError::DeleteOperationFailed(ApiError::Rejected { status: 404, .. }))
        ));
        assert_eq!(dispatcher.api().calls(), vec![Call::Delete("vif-1".to_string())]);
    }

    #[tokio::test]
    async fn execute_reports_delete_failure() {
        let dispatcher = Dispatcher::new(RecordingApi::failing(404));
        let request = PortOperationRequest::Delete { interface_id: "vif-1".to_string() };

        let err = dispatcher.execute(&request).await.unwrap_err();
        assert!(matches!(err, DispatchError::DeleteOperationFailed(_)));
    }

    #[tokio::test]
    async fn invalid_operation_makes_no_call() {
        let dispatcher = Dispatcher::new(RecordingApi::default());
        let err = dispatcher.dispatch(&["restart", "vif-1"]).await.unwrap_err();

        assert!(matches!(err, DispatchError::InvalidOperation(op) if op == "restart"));
        assert!(dispatcher.api().calls().is_empty());
    }

    #[tokio::test]
    async fn argument_count_mismatch_makes_no_call() {
        let dispatcher = Dispatcher::new(RecordingApi::default());

        let err = dispatcher.dispatch(&["delete", "vif-1", "vm-1"]).await.unwrap_err();
        assert!(matches!(err, DispatchError::ArgumentCountMismatch { .. }));

        let mut args = add_args("eth0");
        args.pop();
        let err = dispatcher.dispatch(&args).await.unwrap_err();
        assert!(matches!(err, DispatchError::ArgumentCountMismatch { expected: 8, actual: 7, .. }));

        assert!(dispatcher.api().calls().is_empty());
    }

    #[tokio::test]
    async fn lock_is_released_after_each_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("port.lock");
        let dispatcher = Dispatcher::new(RecordingApi::failing(500)).with_lock_path(&path);

        dispatcher.dispatch(&add_args("eth0")).await.unwrap_err();
        HostLock::try_acquire(&path).unwrap();

        dispatcher.dispatch(&["delete", "vif-1"]).await.unwrap();
        HostLock::try_acquire(&path).unwrap();
        assert_eq!(dispatcher.api().calls().len(), 2);
    }

    #[tokio::test]
    async fn add_lock_failure_propagates_without_call() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain");
        std::fs::write(&plain, b"").unwrap();
        let dispatcher = Dispatcher::new(RecordingApi::default()).with_lock_path(plain.join("port.lock"));

        let err = dispatcher.dispatch(&add_args("eth0")).await.unwrap_err();
        assert!(matches!(err, DispatchError::Lock(_)));
        assert!(dispatcher.api().calls().is_empty());
    }

    #[tokio::test]
    async fn delete_lock_failure_is_suppressed_without_call() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain");
        std::fs::write(&plain, b"").unwrap();
        let dispatcher = Dispatcher::new(RecordingApi::default()).with_lock_path(plain.join("port.lock"));

        let outcome = dispatcher.dispatch(&["delete", "vif-1"]).await.unwrap();
        assert!(matches!(outcome, Outcome::DeleteSuppressed(DispatchError::Lock(_))));
        assert!(dispatcher.api().calls().is_empty());
    }
}
