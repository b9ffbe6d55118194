// Discovery pipeline: expand -> probe (barrier) -> neighbors + resolve ->
// snapshot batch. Only the probe stage fans out; everything else is
// sequential.

pub mod expand;
pub mod neighbors;
pub mod probe;
pub mod resolve;

use crate::config::DiscoveryConfig;
use crate::models::{DeviceSnapshot, current_heartbeat_time};
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::instrument;

/// Runs one discovery cycle over a pre-expanded candidate list and returns
/// the snapshot batch for the reachable subset, ascending by address.
#[instrument(skip(candidates, config), fields(operation = "run_cycle", candidates = candidates.len()))]
pub async fn run_cycle(candidates: &[Ipv4Addr], config: &DiscoveryConfig) -> Vec<DeviceSnapshot> {
    let command_timeout = Duration::from_secs(config.command_timeout_secs);

    let macs = neighbors::read_neighbor_table(command_timeout).await;
    tracing::debug!(entries = macs.len(), "neighbor table read");

    let reachable = probe::probe_all(candidates, config.probe_concurrency, command_timeout).await;

    let mut devices = Vec::with_capacity(reachable.len());
    for ip in reachable {
        let name = resolve::resolve_name(ip, command_timeout).await;
        let ip = ip.to_string();
        let mac = macs.get(&ip).cloned().unwrap_or_default();
        devices.push(DeviceSnapshot {
            ip,
            mac,
            name,
            heartbeat_time: current_heartbeat_time(),
        });
    }
    tracing::info!(devices = devices.len(), "discovery cycle complete");
    devices
}
