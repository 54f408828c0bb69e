//! Bot level bracket simulator.
//!
//! Runs the balancer actor against a simulated population, with either the
//! PostgreSQL stores (when `DATABASE_URL` is set) or in-memory ones.

mod config;
mod logging;
mod metrics;
mod sim_world;

use std::sync::Arc;

use anyhow::Error;
use bot_brackets::{
    BracketActor, BracketScheduler,
    db::{
        Database, GuildTrackerRepository, InMemoryGuildTrackerRepository,
        InMemorySocialRepository, SocialRepository,
    },
    host::InMemoryWorld,
};
use config::{SimConfig, SimOverrides};
use pico_args::Arguments;
use sim_world::Simulation;
use tokio::sync::{Mutex, Notify, mpsc};
use tokio::time::{Instant, interval};
use tracing::info;

const HELP: &str = "\
Simulate a random bot population under the level bracket balancer

USAGE:
  brackets_sim [OPTIONS]

OPTIONS:
  --config     FILE        JSON balancer config    [default: BOT_BRACKETS_* env vars]
  --bots       N           Random bots per faction [default: env SIM_BOTS_PER_FACTION or 500]
  --players    N           Real players per faction [default: env SIM_PLAYERS_PER_FACTION or 20]
  --seed       N           Population seed         [default: random]
  --tick-ms    MS          Balancer update interval [default: env SIM_TICK_MS or 1000]
  --duration   SECS        Stop after SECS seconds [default: run until Ctrl+C]
  --metrics    IP:PORT     Prometheus scrape address [default: env SIM_METRICS_BIND]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  DATABASE_URL             PostgreSQL connection string; in-memory stores when unset
  RUST_LOG                 Log filter
  (See BracketsConfig::from_env for all balancer options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = SimOverrides {
        config_file: pargs.opt_value_from_str("--config")?,
        bots: pargs.opt_value_from_str("--bots")?,
        players: pargs.opt_value_from_str("--players")?,
        seed: pargs.opt_value_from_str("--seed")?,
        tick_ms: pargs.opt_value_from_str("--tick-ms")?,
        duration_secs: pargs.opt_value_from_str("--duration")?,
        metrics_addr: pargs.opt_value_from_str("--metrics")?,
    };

    logging::init();

    let config = SimConfig::from_env(overrides)?;
    config.validate()?;

    // Catching signals for exit.
    let stop = Arc::new(Notify::new());
    let signal = stop.clone();
    ctrlc::set_handler(move || signal.notify_one())?;

    if let Some(addr) = config.metrics_addr {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics at http://{}/metrics", addr);
    }

    let mut world = InMemoryWorld::new();
    let mut simulation = Simulation::new(
        config.population.clone(),
        config.brackets.random_bot_min_level,
        config.brackets.random_bot_max_level,
    );
    let friend_pairs = simulation.populate(&mut world);

    let (guild_store, social_store, database) = match &config.database {
        Some(db_config) => {
            info!("Connecting to database: {}", db_config.database_url);
            let db = Database::new(db_config)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

            let guilds = db.guild_tracker();
            guilds.ensure_schema().await?;
            info!("Database connected successfully");

            let guilds: Arc<dyn GuildTrackerRepository> = Arc::new(guilds);
            let social: Arc<dyn SocialRepository> = Arc::new(db.social());
            (guilds, social, Some(db))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory stores");
            let social = InMemorySocialRepository::new();
            for (owner, friend) in friend_pairs {
                social.add_friend(owner, friend).await;
            }
            let guilds: Arc<dyn GuildTrackerRepository> = Arc::new(InMemoryGuildTrackerRepository::new());
            let social: Arc<dyn SocialRepository> = Arc::new(social);
            (guilds, social, None)
        }
    };

    let scheduler = BracketScheduler::new(config.brackets.clone())?;
    let world = Arc::new(Mutex::new(world));
    let (actor, handle) = BracketActor::new(
        scheduler,
        world.clone(),
        guild_store,
        social_store,
        config.tick,
    );
    let actor_task = tokio::spawn(actor.run());

    let (report_sender, mut reports) = mpsc::channel(64);
    handle.subscribe(report_sender).await?;

    info!(
        "Simulation running with {} bots and {} real players per faction. Press Ctrl+C to stop.",
        config.population.bots_per_faction, config.population.players_per_faction
    );

    let started = Instant::now();
    let mut churn = interval(config.churn_period);
    let mut status_interval = interval(config.report_period);

    loop {
        tokio::select! {
            _ = stop.notified() => {
                info!("Received Ctrl+C");
                break;
            }

            _ = churn.tick() => {
                if config.duration.is_some_and(|limit| started.elapsed() >= limit) {
                    info!("Simulation duration reached");
                    break;
                }

                let churned = {
                    let mut world = world.lock().await;
                    simulation.churn(&mut world)
                };
                for character_id in churned.logged_out {
                    handle.player_logout(character_id).await?;
                }
            }

            Some(report) = reports.recv() => {
                logging::log_tick(&report);
                metrics::record_tick(&report);
            }

            _ = status_interval.tick() => {
                let status = handle.status().await?;
                logging::log_status(&status);
                metrics::record_status(&status);
            }
        }
    }

    let removed = handle.cleanup_guild_tracker().await?;
    info!("Guild tracker cleanup removed {} guild(s)", removed.len());

    let status = handle.status().await?;
    logging::log_status(&status);

    handle.shutdown().await?;
    actor_task.await?;

    if let Some(db) = database {
        db.close().await;
    }

    info!("Shutting down simulator...");
    Ok(())
}
