// -*- indent-tabs-mode: nil; tab-width: 4; -*-
// vim: set ts=4 sw=4 et ai :

//! The port management API the dispatcher drives.

use crate::error::ApiError;

/// Class of virtual port registered with the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortType {
    /// Interface attached to a VM or container.
    NovaVmPort,
}

impl PortType {
    /// Numeric tag used on the agent's wire format.
    #[inline]
    pub const fn wire_value(self) -> u8 {
        match self {
            PortType::NovaVmPort => 0,
        }
    }
}

/// A port to be added to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmPort {
    pub vm_id: String,
    pub interface_id: String,
    pub interface_name: String,
    pub mac_address: String,
    pub port_type: PortType,
    pub display_name: String,
    pub ip_address: String,
    pub network_id: String,
}

/// External port management API.
///
/// Implementations own connection setup and wire format. Each method is
/// called at most once per invocation and must not retry on its own.
#[allow(async_fn_in_trait)]
pub trait PortApi {
    async fn add_port(&self, port: &VmPort) -> Result<(), ApiError>;
    async fn delete_port(&self, interface_id: &str) -> Result<(), ApiError>;
}
