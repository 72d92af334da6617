//! Docker macvlan network scripts
//!
//! Writes a create/remove pair of shell scripts that the hypervisor hook
//! runs around the guest lifecycle.

use crate::error::Result;
use crate::network::Bridge;
use ipnet::Ipv4Net;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const SCRIPT_MODE: u32 = 0o775;

/// Paths of the emitted scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkScripts {
    pub create: PathBuf,
    pub remove: PathBuf,
}

impl NetworkScripts {
    /// Write both scripts into `dir`, creating it if needed
    ///
    /// Existing scripts are overwritten.
    pub fn emit(dir: &Path, bridge: &Bridge, subnet: &Ipv4Net) -> Result<Self> {
        fs::create_dir_all(dir)?;

        let create = dir.join(format!("create-{}.sh", bridge.docker_network()));
        write_script(&create, &create_script(bridge, subnet))?;

        let remove = dir.join(format!("remove-{}.sh", bridge.docker_network()));
        write_script(&remove, &remove_script(bridge))?;

        Ok(Self { create, remove })
    }
}

fn create_script(bridge: &Bridge, subnet: &Ipv4Net) -> String {
    format!(
        "#!/bin/bash\ndocker network create --driver=macvlan --subnet={} -o parent={} {}\n",
        subnet,
        bridge.name(),
        bridge.docker_network()
    )
}

fn remove_script(bridge: &Bridge) -> String {
    format!("#!/bin/bash\ndocker network rm {}\n", bridge.docker_network())
}

fn write_script(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    fs::set_permissions(path, fs::Permissions::from_mode(SCRIPT_MODE))?;
    Ok(())
}
