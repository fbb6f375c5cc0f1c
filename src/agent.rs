// -*- indent-tabs-mode: nil; tab-width: 4; -*-
// vim: set ts=4 sw=4 et ai :

//! HTTP client for the vRouter agent's port API.

use std::time::Duration;

use reqwest::Url;
use serde::Serialize;

use crate::api::{PortApi, VmPort};
use crate::config::AgentConfig;
use crate::error::ApiError;

/// VLAN id meaning "untagged" to the agent.
pub const NO_VLAN: u16 = 0xffff;

/// Body of a port add request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct PortBody<'a> {
    id: &'a str,
    instance_id: &'a str,
    display_name: &'a str,
    ip_address: &'a str,
    ip6_address: &'a str,
    vn_id: &'a str,
    vm_project_id: &'a str,
    mac_address: &'a str,
    system_name: &'a str,
    #[serde(rename = "type")]
    port_type: u8,
    rx_vlan_id: u16,
    tx_vlan_id: u16,
}

impl<'a> From<&'a VmPort> for PortBody<'a> {
    fn from(port: &'a VmPort) -> Self {
        PortBody {
            id: &port.interface_id,
            instance_id: &port.vm_id,
            display_name: &port.display_name,
            ip_address: &port.ip_address,
            ip6_address: "",
            vn_id: &port.network_id,
            vm_project_id: "",
            mac_address: &port.mac_address,
            system_name: &port.interface_name,
            port_type: port.port_type.wire_value(),
            rx_vlan_id: NO_VLAN,
            tx_vlan_id: NO_VLAN,
        }
    }
}

/// Client for the agent listening on the local host.
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: reqwest::Client,
    port_url: Url,
}

impl AgentClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Encode(format!("failed to create HTTP client: {e}")))?;

        let mut port_url = Url::parse(base_url)
            .map_err(|e| ApiError::Encode(format!("invalid agent url {base_url:?}: {e}")))?;
        port_url
            .path_segments_mut()
            .map_err(|_| ApiError::Encode(format!("agent url {base_url:?} cannot take a path")))?
            .pop_if_empty()
            .push("port");

        Ok(Self { client, port_url })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, ApiError> {
        Self::new(&config.url, config.timeout())
    }

    /// URL of the port collection, `{base}/port`.
    pub fn port_url(&self) -> &Url {
        &self.port_url
    }

    /// URL of one port. The id is percent-encoded as a single path segment.
    pub fn interface_url(&self, interface_id: &str) -> Result<Url, ApiError> {
        // dot segments would be resolved away instead of encoded
        if interface_id.is_empty() || interface_id == "." || interface_id == ".." {
            return Err(ApiError::Encode(format!("invalid interface id {interface_id:?}")));
        }

        let mut url = self.port_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Encode(format!("agent url {} cannot take a path", self.port_url)))?
            .push(interface_id);
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Rejected {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

impl PortApi for AgentClient {
    async fn add_port(&self, port: &VmPort) -> Result<(), ApiError> {
        log::debug!("POST {} for interface {}", self.port_url, port.interface_id);

        let response = self
            .client
            .post(self.port_url.clone())
            .json(&PortBody::from(port))
            .send()
            .await?;
        Self::check(response).await
    }

    async fn delete_port(&self, interface_id: &str) -> Result<(), ApiError> {
        let url = self.interface_url(interface_id)?;
        log::debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        Self::check(response).await
    }
}
