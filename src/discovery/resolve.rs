// Identity Resolver: reverse name lookup via nslookup, run sequentially
// after the probe barrier. Failures resolve to an empty name.

use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::process::Command;

/// Resolves a short host name for one address; empty string when the
/// lookup fails or reports no name.
pub async fn resolve_name(ip: Ipv4Addr, timeout: Duration) -> String {
    let result = tokio::time::timeout(
        timeout,
        Command::new("nslookup").arg(ip.to_string()).output(),
    )
    .await;

    let output = match result {
        Ok(Ok(o)) => o,
        Ok(Err(e)) => {
            tracing::warn!(ip = %ip, error = %e, operation = "resolve_name", "nslookup spawn failed");
            return String::new();
        }
        Err(_) => {
            tracing::debug!(ip = %ip, operation = "resolve_name", "nslookup timed out");
            return String::new();
        }
    };

    if !output.status.success() {
        return String::new();
    }

    parse_lookup_name(&String::from_utf8_lossy(&output.stdout))
}

/// Extracts the first `name = ` value and trims it to the label before the
/// first dot. "107.18.168.192.in-addr.arpa  name = laptop.lan." -> "laptop".
pub fn parse_lookup_name(text: &str) -> String {
    if !text.contains("name = ") {
        return String::new();
    }
    let Some((_, after)) = text.split_once('=') else {
        return String::new();
    };
    let full = after.trim();
    match full.split('.').next() {
        Some(label) => label.trim().to_string(),
        None => String::new(),
    }
}
