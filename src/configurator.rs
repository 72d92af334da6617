//! Interactive configurator
//!
//! Runs the fixed sequence: resolve the bridge subnet, collect paths, emit
//! the docker network scripts, generate the guest's compose config and
//! merge the qemu-hook commands. Files written by earlier steps stay on
//! disk if a later step fails.

use crate::compose::{self, ComposeTemplate, ComposeVars};
use crate::console::Console;
use crate::error::Result;
use crate::hooks::{self, HookCommands, HookDocument};
use crate::manifest::SambaShareConfig;
use crate::network::{Bridge, IpPool, NetworkScripts, ip};
use crate::vm;
use ipnet::Ipv4Net;
use std::path::{Path, PathBuf};

const HOOK_PROJECT_URL: &str = "https://github.com/jfhack/qemu-hook";

/// Everything the run produced
#[derive(Debug, Clone)]
pub struct Session {
    pub hook_config: PathBuf,
    pub scripts: NetworkScripts,
    pub vm_name: String,
    pub config_name: String,
    pub compose_file: PathBuf,
}

/// Drives the prompts and file generation
pub struct Configurator<C> {
    prompter: C,
    defaults: SambaShareConfig,
    base_dir: PathBuf,
    verbose: bool,
}

impl<C: Console> Configurator<C> {
    pub fn new(prompter: C, defaults: SambaShareConfig, base_dir: PathBuf) -> Self {
        Self {
            prompter,
            defaults,
            base_dir,
            verbose: false,
        }
    }

    /// Enable verbose output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run against the live host
    pub fn run(&mut self) -> Result<Session> {
        self.prompter.say("QEMU Samba Shared Configurator")?;
        self.prompter.say("==============================\n")?;

        let iface = self
            .prompter
            .ask("Virtual Bridge interface", self.defaults.interface())?;
        let bridge = Bridge::new(iface);

        if self.verbose {
            println!("Running: ip -4 a show dev {}", bridge.name());
        }
        let subnet = bridge.subnet()?;

        let verbose = self.verbose;
        self.run_on(bridge, subnet, move || vm::list_vms(verbose))
    }

    /// Remaining steps once the subnet is known
    fn run_on(
        &mut self,
        bridge: Bridge,
        subnet: Ipv4Net,
        list_vms: impl FnOnce() -> Result<Vec<String>>,
    ) -> Result<Session> {
        let scripts_dir = PathBuf::from(self.prompter.ask(
            "Scripts dir absolute path",
            &self.defaults.scripts_dir(&self.base_dir).display().to_string(),
        )?);
        let configs_dir = PathBuf::from(self.prompter.ask(
            "Configs dir absolute path",
            &self.defaults.configs_dir(&self.base_dir).display().to_string(),
        )?);
        let hook_config = self.prompt_hook_config()?;

        self.prompter
            .say(&format!("\nSubnet                    : {}", subnet))?;
        self.prompter
            .say(&format!("Docker network name       : {}", bridge.docker_network()))?;

        let scripts = NetworkScripts::emit(&scripts_dir, &bridge, &subnet)?;
        if self.verbose {
            println!("Wrote {}", scripts.create.display());
            println!("Wrote {}", scripts.remove.display());
        }

        let vm_name = self.select_vm(list_vms()?)?;
        let (config_name, compose_file) =
            self.create_vm_config(&bridge, &subnet, &configs_dir, &vm_name)?;

        let commands = HookCommands::new(&scripts.create, &scripts.remove, &compose_file);
        self.merge_hook_config(&hook_config, &vm_name, &commands)?;

        Ok(Session {
            hook_config,
            scripts,
            vm_name,
            config_name,
            compose_file,
        })
    }

    /// Ask for an existing qemu-hook `config.json`
    fn prompt_hook_config(&mut self) -> Result<PathBuf> {
        self.prompter.say("\nQEMU hook configuration, required\n")?;
        self.prompter.say(&format!(" {}\n", HOOK_PROJECT_URL))?;

        let suggested = self
            .defaults
            .hook_config()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        loop {
            let answer = self.prompter.ask("QEMU hook config.json path", &suggested)?;
            if answer.is_empty() {
                continue;
            }

            let path = PathBuf::from(answer);
            if path.exists() {
                return Ok(path);
            }
            self.prompter.say("File not found")?;
        }
    }

    /// Pick a guest from the menu or type its name
    fn select_vm(&mut self, vms: Vec<String>) -> Result<String> {
        if vms.is_empty() {
            self.prompter.say("No VM found")?;
        } else {
            self.prompter
                .say("\nSelect VM to create a samba configuration:")?;
            self.prompter.say("0. Not listed VM (input VM name)")?;
            for (i, vm) in vms.iter().enumerate() {
                self.prompter.say(&format!("{}. {}", i + 1, vm))?;
            }

            let suggested = if vms.len() == 1 { "1" } else { "" };
            let index = loop {
                let answer = self.prompter.ask("VM index", suggested)?;
                match answer.trim().parse::<usize>() {
                    Ok(index) if index <= vms.len() => break index,
                    _ => self.prompter.say("Invalid VM index")?,
                }
            };

            if index > 0 {
                let vm_name = vms[index - 1].clone();
                self.prompter.say(&format!("\nSelected VM: {}", vm_name))?;
                return Ok(vm_name);
            }
        }

        loop {
            let vm_name = self.prompter.ask_plain("VM name")?;
            if !vm_name.is_empty() {
                return Ok(vm_name);
            }
        }
    }

    /// Render the template into `<configs_dir>/<config_name>/docker-compose.yml`
    fn create_vm_config(
        &mut self,
        bridge: &Bridge,
        subnet: &Ipv4Net,
        configs_dir: &Path,
        vm_name: &str,
    ) -> Result<(String, PathBuf)> {
        self.prompter.say("Creating VM config...\n")?;
        std::fs::create_dir_all(configs_dir)?;

        self.prompter
            .say("Input config name (alphanumeric, underscore and dash only)")?;
        self.prompter.say(
            "Used in docker-compose.yml, e.g. with fermi the container will be samba-fermi",
        )?;
        let suggested = if vm::valid_config_name(vm_name) {
            vm_name
        } else {
            ""
        };
        let mut config_name = self.prompter.ask("Config name", suggested)?;
        while !vm::valid_config_name(&config_name) {
            self.prompter.say("Invalid config name")?;
            config_name = self.prompter.ask_plain("Config name")?;
        }

        let template = ComposeTemplate::load(&self.defaults.template(&self.base_dir))?;

        let config_ip = self.prompt_ip(subnet, configs_dir)?;
        let shared_dir = self
            .prompter
            .ask("Shared directory path", self.defaults.shared_dir())?;

        let rendered = template.render(&ComposeVars {
            config_name: config_name.clone(),
            docker_iface: bridge.docker_network(),
            config_ip,
            config_shared_dir: shared_dir,
        });
        let compose_file = compose::write_config(configs_dir, &config_name, &rendered)?;

        self.prompter.say("\nConfig created successfully")?;
        self.prompter.say(&format!(
            "Config path: {}",
            compose_file.parent().unwrap_or(configs_dir).display()
        ))?;

        Ok((config_name, compose_file))
    }

    /// Suggest a free address and ask until the answer looks like one
    fn prompt_ip(&mut self, subnet: &Ipv4Net, configs_dir: &Path) -> Result<String> {
        let mut pool = IpPool::new(*subnet);
        pool.reserve(compose::scan_used_ips(configs_dir, self.verbose)?);
        let suggested = pool.suggest().map(|a| a.to_string()).unwrap_or_default();

        loop {
            let answer = self.prompter.ask("IP address", &suggested)?;
            if ip::is_dotted_quad(&answer) {
                return Ok(answer);
            }
            self.prompter.say("Invalid IP address")?;
        }
    }

    /// Merge the guest's commands into the hook document and rewrite it
    fn merge_hook_config(
        &mut self,
        path: &Path,
        vm_name: &str,
        commands: &HookCommands,
    ) -> Result<()> {
        let mut doc = HookDocument::load(path)?;

        let prompter = &mut self.prompter;
        doc.merge(vm_name, commands, |action, existing| {
            prompter.say(&format!(
                "\nQEMU hook already contains {} commands for this VM:",
                action
            ))?;
            for cmd in existing {
                prompter.say(&format!("  {}", hooks::display_command(cmd)))?;
            }
            prompter.say("")?;
            prompter.confirm("Overwrite?")
        })?;

        doc.save(path)?;
        if self.verbose {
            println!("Wrote {}", path.display());
        }
        self.prompter.say("\nQEMU hook configuration updated")?;
        Ok(())
    }
}
