// Address Space Expander: CIDR prefix -> ordered candidate list.

use crate::error::AgentError;
use std::net::Ipv4Addr;

/// Expands a prefix like "192.168.1.0/24" into every address of the block,
/// network address through broadcast inclusive, ascending. The address part
/// is masked first, so "192.168.1.100/24" expands the same as
/// "192.168.1.0/24". Pure function of its input.
pub fn expand_prefix(cidr: &str) -> Result<Vec<Ipv4Addr>, AgentError> {
    let invalid = |reason: &str| AgentError::InvalidPrefix {
        prefix: cidr.to_string(),
        reason: reason.to_string(),
    };

    let (addr_part, len_part) = cidr
        .split_once('/')
        .ok_or_else(|| invalid("missing '/' separator"))?;

    let addr: Ipv4Addr = addr_part
        .trim()
        .parse()
        .map_err(|_| invalid("bad address"))?;
    let prefix_len: u32 = len_part
        .trim()
        .parse()
        .map_err(|_| invalid("bad prefix length"))?;
    if prefix_len > 32 {
        return Err(invalid("prefix length > 32"));
    }

    let mask: u32 = if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - prefix_len)
    };
    let network = u32::from(addr) & mask;
    let broadcast = network | !mask;

    // u64 bounds so a /0 block does not overflow the loop counter.
    let mut ips = Vec::with_capacity((broadcast as u64 - network as u64 + 1) as usize);
    for value in network as u64..=broadcast as u64 {
        ips.push(Ipv4Addr::from(value as u32));
    }
    Ok(ips)
}
