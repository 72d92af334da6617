//! Defaults file parsing for samba-share
//!
//! Parses the optional `samba-share.toml` using serde. Every value only
//! seeds the bracketed default of the matching interactive prompt.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Bridge interface suggested when nothing else is configured
pub const DEFAULT_INTERFACE: &str = "virbr0";

/// Hook config location suggested when it exists on disk
pub const DEFAULT_HOOK_CONFIG: &str = "../qemu-hook/config.json";

/// Shared directory suggested for the Samba volume
pub const DEFAULT_SHARED_DIR: &str = "./shared";

/// Directory holding the running executable
///
/// Used as `<base>` for the default scripts, configs and template paths
/// when `--base-dir` is not given.
pub fn default_base_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        Error::ConfigValidation(format!("{} has no parent directory", exe.display()))
    })
}

/// Load the defaults file, falling back to built-in defaults if it is absent
pub fn load_or_default(path: &Path) -> Result<SambaShareConfig> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SambaShareConfig::default()),
        Err(e) => {
            return Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let config: SambaShareConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Prompt defaults
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SambaShareConfig {
    /// Virtual bridge interface
    pub interface: Option<String>,

    /// Directory receiving the docker network scripts
    pub scripts_dir: Option<PathBuf>,

    /// Directory holding one sub-directory per generated config
    pub configs_dir: Option<PathBuf>,

    /// Compose template with `{{...}}` placeholders
    pub template: Option<PathBuf>,

    /// qemu-hook `config.json`
    pub hook_config: Option<PathBuf>,

    /// Host directory shared through Samba
    pub shared_dir: Option<String>,
}

impl SambaShareConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.interface.as_deref().is_some_and(|i| i.trim().is_empty()) {
            return Err(Error::ConfigValidation(
                "interface must not be empty".into(),
            ));
        }

        if self.shared_dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(Error::ConfigValidation(
                "shared_dir must not be empty".into(),
            ));
        }

        Ok(())
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or(DEFAULT_INTERFACE)
    }

    pub fn scripts_dir(&self, base: &Path) -> PathBuf {
        self.scripts_dir
            .clone()
            .unwrap_or_else(|| base.join("scripts"))
    }

    pub fn configs_dir(&self, base: &Path) -> PathBuf {
        self.configs_dir
            .clone()
            .unwrap_or_else(|| base.join("configs"))
    }

    pub fn template(&self, base: &Path) -> PathBuf {
        self.template
            .clone()
            .unwrap_or_else(|| base.join("template.yml"))
    }

    /// Suggested hook config path, only if it exists
    pub fn hook_config(&self) -> Option<PathBuf> {
        let path = self
            .hook_config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOOK_CONFIG));
        path.exists().then_some(path)
    }

    pub fn shared_dir(&self) -> &str {
        self.shared_dir.as_deref().unwrap_or(DEFAULT_SHARED_DIR)
    }
}
