//! Prometheus metrics for watching the balancer converge.
//!
//! Metrics are exposed in Prometheus text format for scraping by monitoring
//! systems when a scrape address is configured.
//!
//! # Metrics Categories
//!
//! - **Drain Metrics**: resets applied, aborted, dropped and deferred
//! - **Scan Metrics**: bots per bracket, desired counts, newly queued bots
//! - **Tracker Metrics**: pending resets, protected guilds, friend-listed bots

use bot_brackets::TickReport;
use bot_brackets::scheduler::{FactionSnapshot, SchedulerStatus};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// Update Metrics
// ============================================================================

/// Record counters for one balancer update.
pub fn record_tick(report: &TickReport) {
    if let Some(drain) = &report.drain {
        metrics::counter!("bot_brackets_resets_total", "outcome" => "applied")
            .increment(u64::from(drain.applied));
        metrics::counter!("bot_brackets_resets_total", "outcome" => "aborted")
            .increment(u64::from(drain.aborted));
        metrics::counter!("bot_brackets_resets_total", "outcome" => "dropped")
            .increment(u64::from(drain.dropped));
        metrics::counter!("bot_brackets_deferrals_total").increment(u64::from(drain.deferred));
        metrics::gauge!("bot_brackets_pending_resets").set(drain.remaining as f64);
    }

    if let Some(guilds) = &report.guilds_marked {
        metrics::counter!("bot_brackets_guild_syncs_total").increment(1);
        metrics::gauge!("bot_brackets_guilds_marked_last_sync").set(guilds.len() as f64);
    }

    if let Some(scan) = &report.scan {
        metrics::counter!("bot_brackets_scans_total").increment(1);
        metrics::counter!("bot_brackets_flagged_total")
            .increment(u64::from(scan.redistribution.enqueued + scan.redistribution.fallback_enqueued));
        metrics::gauge!("bot_brackets_excluded_bots").set(f64::from(scan.population.excluded));
    }
}

// ============================================================================
// Status Metrics
// ============================================================================

/// Set gauges from a status snapshot.
pub fn record_status(status: &SchedulerStatus) {
    metrics::gauge!("bot_brackets_enabled").set(if status.enabled { 1.0 } else { 0.0 });
    metrics::gauge!("bot_brackets_pending_resets").set(status.pending_resets as f64);
    metrics::gauge!("bot_brackets_persistent_guilds").set(status.persistent_guilds as f64);
    metrics::gauge!("bot_brackets_live_guilds").set(status.live_guilds as f64);
    metrics::gauge!("bot_brackets_friend_listed").set(status.friend_listed as f64);

    if let Some(scan) = &status.last_scan {
        record_faction(&scan.alliance);
        record_faction(&scan.horde);
    }
}

fn record_faction(snapshot: &FactionSnapshot) {
    let faction = snapshot.faction.to_string();

    metrics::gauge!("bot_brackets_faction_bots", "faction" => faction.clone())
        .set(f64::from(snapshot.total));

    for (i, (actual, desired)) in snapshot.actual.iter().zip(&snapshot.desired).enumerate() {
        let bracket = (i + 1).to_string();
        metrics::gauge!("bot_brackets_bracket_bots",
            "faction" => faction.clone(),
            "bracket" => bracket.clone()
        )
        .set(f64::from(*actual));
        metrics::gauge!("bot_brackets_bracket_desired",
            "faction" => faction.clone(),
            "bracket" => bracket
        )
        .set(f64::from(*desired));
    }
}
