//! Virtual bridge interface lookup
//!
//! Queries the host for the bridge's IPv4 address with `ip -4 addr`.

use crate::error::{Error, Result};
use crate::network::ip;
use ipnet::Ipv4Net;
use std::process::Command;

/// A libvirt virtual bridge (e.g., "virbr0")
#[derive(Debug, Clone)]
pub struct Bridge {
    name: String,
}

impl Bridge {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the macvlan docker network parented on this bridge
    pub fn docker_network(&self) -> String {
        docker_network_name(&self.name)
    }

    /// Resolve the subnet the bridge address lives in
    ///
    /// Fails with `SubnetNotFound` when `ip` exits non-zero or reports no
    /// IPv4 address for the interface.
    pub fn subnet(&self) -> Result<Ipv4Net> {
        let output = Command::new("ip")
            .args(["-4", "a", "show", "dev", &self.name])
            .output()
            .map_err(|e| Error::CommandFailed {
                command: "ip -4 a show".to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::SubnetNotFound(self.name.clone()));
        }

        ip::subnet_from_ip_output(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| Error::SubnetNotFound(self.name.clone()))
    }
}

/// `docker-<iface>`
pub fn docker_network_name(iface: &str) -> String {
    format!("docker-{}", iface)
}
