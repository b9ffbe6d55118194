// Agent cycle loop: strictly sequential, one cycle at a time, fixed sleep
// between cycles. A failed report is logged and the next cycle proceeds;
// only a bad prefix at startup is fatal.

use crate::config::AgentConfig;
use crate::discovery;
use crate::reporter::Reporter;

pub async fn run(config: AgentConfig) -> anyhow::Result<()> {
    let candidates = discovery::expand::expand_prefix(&config.network.cidr)?;
    tracing::info!(
        cidr = %config.network.cidr,
        candidates = candidates.len(),
        "address space expanded"
    );

    let reporter = Reporter::new(
        &config.collector.host,
        config.collector.port,
        &config.collector.token,
        config.agent.report_attempts,
    )?;

    let interval = config.cycle_interval();

    loop {
        let devices = discovery::run_cycle(&candidates, &config.discovery).await;

        if devices.is_empty() {
            // The collector rejects empty batches; nothing to say this cycle.
            tracing::info!(operation = "report", "no reachable devices, skipping report");
        } else if let Err(e) = reporter.send_report(&devices).await {
            tracing::warn!(error = %e, operation = "report", "report failed, will retry next cycle");
        }

        tokio::time::sleep(interval).await;
    }
}
