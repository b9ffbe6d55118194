// Liveness Prober: one ping per candidate, drained through a bounded
// worker pool. The stage is a barrier: every probe reaches a terminal
// state before the reachable set is returned.

use futures_util::StreamExt;
use futures_util::stream;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::process::Command;

/// Probes every candidate and returns the reachable subset, re-sorted
/// ascending (completion order is not input order).
pub async fn probe_all(
    candidates: &[Ipv4Addr],
    concurrency: usize,
    timeout: Duration,
) -> Vec<Ipv4Addr> {
    let results: Vec<Option<Ipv4Addr>> = stream::iter(candidates.iter().copied())
        .map(|ip| async move {
            if probe_one(ip, timeout).await {
                Some(ip)
            } else {
                None
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut reachable: Vec<Ipv4Addr> = results.into_iter().flatten().collect();
    reachable.sort_unstable();
    tracing::debug!(
        operation = "probe_all",
        candidates = candidates.len(),
        reachable = reachable.len(),
        "probe sweep finished"
    );
    reachable
}

/// One echo request with a 1s reply wait, the whole command bounded by
/// `timeout`. Success is exit code zero; spawn errors, non-zero exits and
/// timeouts all count as unreachable.
async fn probe_one(ip: Ipv4Addr, timeout: Duration) -> bool {
    let result = tokio::time::timeout(
        timeout,
        Command::new("ping")
            .args(["-W", "1", "-c", "1", &ip.to_string()])
            .output(),
    )
    .await;

    match result {
        Ok(Ok(output)) => output.status.success(),
        Ok(Err(e)) => {
            tracing::warn!(ip = %ip, error = %e, operation = "probe_one", "ping spawn failed");
            false
        }
        Err(_) => {
            tracing::debug!(ip = %ip, operation = "probe_one", "ping timed out");
            false
        }
    }
}
