//! libvirt guest discovery and config naming

use crate::error::{Error, Result};
use std::process::Command;

/// List defined guests with `virsh list --all --name`
///
/// A query that exits non-zero yields an empty list and the caller falls
/// back to manual entry. Failing to run `virsh` at all is an error.
pub fn list_vms(verbose: bool) -> Result<Vec<String>> {
    list_vms_with("virsh", verbose)
}

fn list_vms_with(program: &str, verbose: bool) -> Result<Vec<String>> {
    let output = Command::new(program)
        .args(["list", "--all", "--name"])
        .output()
        .map_err(|e| Error::CommandFailed {
            command: format!("{} list --all --name", program),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        if verbose {
            eprintln!(
                "Warning: {} list failed: {}",
                program,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        return Ok(Vec::new());
    }

    Ok(parse_vm_list(&String::from_utf8_lossy(&output.stdout)))
}

/// One guest name per non-empty line
pub fn parse_vm_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Config names are limited to `[A-Za-z0-9_-]+`
///
/// The name ends up in container and directory names.
pub fn valid_config_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
