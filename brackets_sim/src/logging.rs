//! Structured logging configuration.
//!
//! The balancer library logs through the `log` facade; those records are
//! bridged into the tracing subscriber set up here.

use bot_brackets::scheduler::{FactionSnapshot, SchedulerStatus};
use bot_brackets::TickReport;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// logging::init();
/// tracing::info!("Simulator starting");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,bot_brackets=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log what one balancer update did
pub fn log_tick(report: &TickReport) {
    if let Some(drain) = &report.drain
        && drain.applied + drain.aborted + drain.dropped > 0
    {
        tracing::debug!(
            applied = drain.applied,
            aborted = drain.aborted,
            dropped = drain.dropped,
            deferred = drain.deferred,
            remaining = drain.remaining,
            "Drain pass"
        );
    }

    if let Some(guilds) = &report.guilds_marked {
        tracing::debug!(guilds = guilds.len(), "Guild tracker synced");
    }

    if let Some(scan) = &report.scan {
        tracing::debug!(
            alliance = scan.population.alliance.total,
            horde = scan.population.horde.total,
            excluded = scan.population.excluded,
            enqueued = scan.redistribution.enqueued,
            fallback = scan.redistribution.fallback_enqueued,
            "Scan complete"
        );
    }
}

/// Log the balancer status, one line per faction
pub fn log_status(status: &SchedulerStatus) {
    tracing::info!(
        enabled = status.enabled,
        pending = status.pending_resets,
        persistent_guilds = status.persistent_guilds,
        live_guilds = status.live_guilds,
        friend_listed = status.friend_listed,
        "Balancer status"
    );

    if let Some(scan) = &status.last_scan {
        for snapshot in [&scan.alliance, &scan.horde] {
            log_faction(snapshot);
        }
    }
}

fn log_faction(snapshot: &FactionSnapshot) {
    tracing::info!(
        faction = %snapshot.faction,
        total = snapshot.total,
        desired = ?snapshot.desired,
        actual = ?snapshot.actual,
        deviation = deviation(snapshot),
        "Bracket occupancy"
    );
}

/// Bots sitting in the wrong bracket: half the sum of absolute differences
/// between actual and desired counts
pub fn deviation(snapshot: &FactionSnapshot) -> u32 {
    let total: u32 = snapshot
        .actual
        .iter()
        .zip(&snapshot.desired)
        .map(|(actual, desired)| actual.abs_diff(*desired))
        .sum();
    total / 2
}
