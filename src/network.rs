//! Host network handling for the Samba container
//!
//! Provides:
//! - Bridge interface subnet lookup
//! - IP address parsing and allocation
//! - Docker macvlan network scripts

pub mod bridge;
pub mod ip;
pub mod scripts;

pub use bridge::Bridge;
pub use ip::IpPool;
pub use scripts::NetworkScripts;
