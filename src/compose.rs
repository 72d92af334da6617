//! Per-guest docker compose config generation
//!
//! Provides:
//! - Scanning of existing configs for assigned addresses
//! - Placeholder substitution in the compose template
//! - Writing `<configs_dir>/<name>/docker-compose.yml`

use crate::error::{Error, Result};
use crate::network::ip;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// File name of every generated config
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Collect the `ipv4_address` of every `<configs_dir>/*/*.yml`
///
/// A missing configs directory means no address is taken yet.
pub fn scan_used_ips(configs_dir: &Path, verbose: bool) -> Result<HashSet<Ipv4Addr>> {
    let mut used = HashSet::new();

    let entries = match fs::read_dir(configs_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(used),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }

        for file in fs::read_dir(&dir)? {
            let file = file?.path();
            if !file.is_file() || file.extension().is_none_or(|ext| ext != "yml") {
                continue;
            }

            if let Some(addr) = ip::parse_ipv4_address(&fs::read_to_string(&file)?) {
                if verbose {
                    println!("  {} uses {}", file.display(), addr);
                }
                used.insert(addr);
            }
        }
    }

    Ok(used)
}

/// Values substituted into the template
#[derive(Debug, Clone)]
pub struct ComposeVars {
    /// `{{config_name}}`
    pub config_name: String,
    /// `{{docker_iface}}`, the macvlan network name
    pub docker_iface: String,
    /// `{{config_ip}}`
    pub config_ip: String,
    /// `{{config_shared_dir}}`
    pub config_shared_dir: String,
}

/// Compose file template with `{{...}}` placeholders
#[derive(Debug, Clone)]
pub struct ComposeTemplate {
    content: String,
}

impl ComposeTemplate {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::TemplateRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(content))
    }

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Literal substitution of every placeholder occurrence
    pub fn render(&self, vars: &ComposeVars) -> String {
        self.content
            .replace("{{config_name}}", &vars.config_name)
            .replace("{{docker_iface}}", &vars.docker_iface)
            .replace("{{config_ip}}", &vars.config_ip)
            .replace("{{config_shared_dir}}", &vars.config_shared_dir)
    }
}

/// Write a rendered config under its own directory, returning the file path
pub fn write_config(configs_dir: &Path, config_name: &str, rendered: &str) -> Result<PathBuf> {
    let dir = configs_dir.join(config_name);
    fs::create_dir_all(&dir)?;

    let path = dir.join(COMPOSE_FILE);
    fs::write(&path, rendered)?;
    Ok(path)
}
