// Neighbor Table Reader: ip -> mac from the OS arp cache.
// Fail-open: any command failure yields an empty map and a warning.

use std::collections::HashMap;
use std::time::Duration;
use tokio::process::Command;

/// Queries `arp -n` under a timeout and parses the ip->mac map.
pub async fn read_neighbor_table(timeout: Duration) -> HashMap<String, String> {
    let result = tokio::time::timeout(timeout, Command::new("arp").arg("-n").output()).await;

    let output = match result {
        Ok(Ok(o)) => o,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, operation = "read_neighbor_table", "arp spawn failed");
            return HashMap::new();
        }
        Err(_) => {
            tracing::warn!(
                operation = "read_neighbor_table",
                timeout_secs = timeout.as_secs(),
                "arp timed out"
            );
            return HashMap::new();
        }
    };

    if !output.status.success() {
        tracing::warn!(
            operation = "read_neighbor_table",
            status = %output.status,
            "arp exited non-zero"
        );
        return HashMap::new();
    }

    parse_neighbor_table(&String::from_utf8_lossy(&output.stdout))
}

/// Parses `arp -n` output. Keeps address rows with at least 5 whitespace
/// fields, skips incomplete entries and the header; fields[0] is the ip,
/// fields[2] the mac.
pub fn parse_neighbor_table(text: &str) -> HashMap<String, String> {
    let mut macs = HashMap::new();
    for line in text.lines() {
        if line.contains("incomplete") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() >= 5 && fields[0].parse::<std::net::Ipv4Addr>().is_ok() {
            macs.insert(fields[0].to_string(), fields[2].to_string());
        }
    }
    macs
}
