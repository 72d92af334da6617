//! samba-share - Samba/Docker share configurator for libvirt guests
//!
//! Interactively generates a macvlan docker network, a per-guest Samba
//! compose config and the qemu-hook wiring that starts and stops it
//! together with the guest.

mod cli;
mod compose;
mod configurator;
mod console;
mod error;
mod hooks;
mod manifest;
mod network;
mod vm;

use cli::{Cli, Commands};
use configurator::Configurator;
use console::Terminal;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    if let Some(Commands::Completion { shell }) = cli.command {
        Cli::generate_completion(shell);
        return Ok(());
    }

    let defaults = manifest::load_or_default(&cli.config)?;
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => manifest::default_base_dir()?,
    };

    let session = Configurator::new(Terminal::new(), defaults, base_dir)
        .verbose(cli.verbose)
        .run()?;

    if cli.verbose {
        println!("\nGuest          : {}", session.vm_name);
        println!("Config         : {}", session.config_name);
        println!("Compose file   : {}", session.compose_file.display());
        println!("Create script  : {}", session.scripts.create.display());
        println!("Remove script  : {}", session.scripts.remove.display());
        println!("Hook config    : {}", session.hook_config.display());
    }

    Ok(())
}
