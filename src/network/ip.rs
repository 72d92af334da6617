//! IP address handling for the bridge subnet
//!
//! Provides:
//! - Parsing of `ip -4 addr` output into the containing subnet
//! - Scraping of `ipv4_address:` fields from compose files
//! - Suggestion of a free address for a new config

use ipnet::{Ipv4AddrRange, Ipv4Net};
use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{char, digit1, u8 as dec_u8},
    combinator::{map_res, recognize},
    sequence::{preceded, separated_pair},
};
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// Four dot-separated digit groups, e.g. `192.168.122.5`
fn dotted_quad(input: &str) -> IResult<&str, &str> {
    recognize((
        digit1,
        char('.'),
        digit1,
        char('.'),
        digit1,
        char('.'),
        digit1,
    ))
    .parse(input)
}

fn ipv4(input: &str) -> IResult<&str, Ipv4Addr> {
    map_res(dotted_quad, |s: &str| s.parse::<Ipv4Addr>()).parse(input)
}

fn inet(input: &str) -> IResult<&str, Ipv4Net> {
    map_res(
        preceded(tag("inet "), separated_pair(ipv4, char('/'), dec_u8)),
        |(addr, prefix)| Ipv4Net::new(addr, prefix),
    )
    .parse(input)
}

/// `ipv4_address: <addr>` with exactly one space after the colon
fn ipv4_address_field(input: &str) -> IResult<&str, Ipv4Addr> {
    preceded(tag("ipv4_address: "), ipv4).parse(input)
}

/// Run `parser` at every occurrence of `marker` and keep the first success
fn find_first<'a, T>(
    haystack: &'a str,
    marker: &str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
) -> Option<T> {
    haystack
        .match_indices(marker)
        .find_map(|(idx, _)| parser(&haystack[idx..]).ok().map(|(_, v)| v))
}

/// Extract the first `inet <addr>/<prefix>` from `ip -4 addr show` output
pub fn parse_inet(output: &str) -> Option<Ipv4Net> {
    find_first(output, "inet ", inet)
}

/// Subnet containing the interface address, e.g. `192.168.122.5/24` -> `192.168.122.0/24`
pub fn subnet_from_ip_output(output: &str) -> Option<Ipv4Net> {
    parse_inet(output).map(|net| net.trunc())
}

/// Extract the first well-formed `ipv4_address: <addr>` from a compose file
///
/// An occurrence not followed by an address is skipped and the scan
/// continues with the next one.
pub fn parse_ipv4_address(content: &str) -> Option<Ipv4Addr> {
    find_first(content, "ipv4_address: ", ipv4_address_field)
}

/// Check that input looks like an IPv4 address (digits and dots only)
pub fn is_dotted_quad(input: &str) -> bool {
    matches!(dotted_quad(input), Ok(("", _)))
}

/// Address pool for the bridge subnet
#[derive(Debug, Clone)]
pub struct IpPool {
    /// Network subnet
    subnet: Ipv4Net,
    /// Addresses already taken by other configs
    allocated: HashSet<Ipv4Addr>,
}

impl IpPool {
    /// Create a pool with the network address reserved
    pub fn new(subnet: Ipv4Net) -> Self {
        let mut allocated = HashSet::new();
        allocated.insert(subnet.network());

        Self { subnet, allocated }
    }

    /// Mark addresses as taken
    pub fn reserve(&mut self, addrs: impl IntoIterator<Item = Ipv4Addr>) {
        self.allocated.extend(addrs);
    }

    /// Every address of the subnet, network and broadcast included
    fn addresses(&self) -> Ipv4AddrRange {
        Ipv4AddrRange::new(self.subnet.network(), self.subnet.broadcast())
    }

    /// Suggest an address for a new config
    ///
    /// The first free candidate is always passed over and the second one is
    /// returned. On a libvirt bridge the first free address is normally the
    /// host's own gateway address.
    pub fn suggest(&self) -> Option<Ipv4Addr> {
        self.addresses()
            .filter(|addr| !self.allocated.contains(addr))
            .nth(1)
    }
}
