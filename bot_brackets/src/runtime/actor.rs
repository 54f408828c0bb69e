//! Balancer actor: drives the scheduler from a tokio task.

use super::{
    errors::{RuntimeError, RuntimeResult},
    messages::BracketMessage,
};
use crate::{
    brackets::BracketsConfig,
    db::{GuildTrackerRepository, SocialRepository},
    host::{CharacterId, GuildId, World},
    scheduler::{BracketScheduler, DueCycles, SchedulerStatus, TickReport},
    tracker::FriendSet,
};
use std::sync::Arc;
use tokio::{
    sync::{Mutex, mpsc, oneshot},
    time::{Duration, Instant, interval},
};

/// Handle for talking to a running `BracketActor`
#[derive(Clone)]
pub struct BracketHandle {
    sender: mpsc::Sender<BracketMessage>,
}

impl BracketHandle {
    pub fn new(sender: mpsc::Sender<BracketMessage>) -> Self {
        Self { sender }
    }

    /// Send a raw message to the actor
    pub async fn send(&self, message: BracketMessage) -> RuntimeResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RuntimeError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> BracketMessage,
    ) -> RuntimeResult<T> {
        let (response, receiver) = oneshot::channel();
        self.send(build(response)).await?;
        receiver.await.map_err(|_| RuntimeError::NoResponse)
    }

    /// Reload configuration
    ///
    /// # Errors
    ///
    /// `RuntimeError::Config` when the new configuration is rejected; the
    /// balancer keeps running on the old one
    pub async fn reload(&self, config: BracketsConfig) -> RuntimeResult<()> {
        let config = Box::new(config);
        self.request(|response| BracketMessage::Reload { config, response })
            .await??;
        Ok(())
    }

    pub async fn player_logout(&self, character_id: CharacterId) -> RuntimeResult<()> {
        self.send(BracketMessage::PlayerLogout { character_id }).await
    }

    pub async fn cleanup_guild_tracker(&self) -> RuntimeResult<Vec<GuildId>> {
        self.request(|response| BracketMessage::CleanupGuildTracker { response })
            .await
    }

    pub async fn run_now(&self, cycles: DueCycles) -> RuntimeResult<TickReport> {
        self.request(|response| BracketMessage::RunNow { cycles, response })
            .await
    }

    pub async fn status(&self) -> RuntimeResult<SchedulerStatus> {
        self.request(|response| BracketMessage::GetStatus { response })
            .await
    }

    pub async fn subscribe(&self, sender: mpsc::Sender<TickReport>) -> RuntimeResult<()> {
        self.send(BracketMessage::Subscribe { sender }).await
    }

    pub async fn shutdown(&self) -> RuntimeResult<()> {
        self.send(BracketMessage::Shutdown).await
    }
}

/// Actor owning the scheduler.
///
/// The world is shared with the host behind a mutex and locked only for the
/// duration of a sub-cycle. Store I/O happens outside that lock: the friend
/// list is reloaded before every scan, and guilds are written back after a
/// guild sync or cleanup. Store failures are logged and the in-memory state
/// carries on.
pub struct BracketActor<W> {
    scheduler: BracketScheduler,

    /// Host world
    world: Arc<Mutex<W>>,

    guild_store: Arc<dyn GuildTrackerRepository>,
    social_store: Arc<dyn SocialRepository>,

    /// Message inbox
    inbox: mpsc::Receiver<BracketMessage>,

    /// How often the timers are advanced
    tick_period: Duration,

    /// Last time the timers were advanced
    last_tick: Instant,

    subscribers: Vec<mpsc::Sender<TickReport>>,

    is_closed: bool,
}

impl<W: World + Send + 'static> BracketActor<W> {
    /// Create a new balancer actor
    ///
    /// # Arguments
    ///
    /// * `scheduler` - Scheduler built from validated configuration
    /// * `world` - Host world
    /// * `guild_store` - Persistent guild tracker
    /// * `social_store` - Friend list source
    /// * `tick_period` - Update interval; sub-cycle periods are counted in
    ///   elapsed time, so this only bounds their precision
    ///
    /// # Returns
    ///
    /// * `(BracketActor, BracketHandle)` - Actor and handle for sending messages
    pub fn new(
        scheduler: BracketScheduler,
        world: Arc<Mutex<W>>,
        guild_store: Arc<dyn GuildTrackerRepository>,
        social_store: Arc<dyn SocialRepository>,
        tick_period: Duration,
    ) -> (Self, BracketHandle) {
        let (sender, inbox) = mpsc::channel(100);

        let actor = Self {
            scheduler,
            world,
            guild_store,
            social_store,
            inbox,
            tick_period,
            last_tick: Instant::now(),
            subscribers: Vec::new(),
            is_closed: false,
        };

        (actor, BracketHandle::new(sender))
    }

    /// Load the persistent guild tier and the friend list
    pub async fn initialize(&mut self) {
        match self.guild_store.load_real_player_guilds().await {
            Ok(guilds) => self.scheduler.load_persistent_guilds(guilds),
            Err(e) => log::error!("Failed to load persistent guild tracker: {}", e),
        }
        self.reload_friends().await;
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        log::info!("Bot level brackets balancer starting");
        self.initialize().await;

        let mut tick_interval = interval(self.tick_period);
        self.last_tick = Instant::now();

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    match message {
                        Some(message) => self.handle_message(message).await,
                        None => break,
                    }
                    if self.is_closed {
                        break;
                    }
                }

                _ = tick_interval.tick() => {
                    self.tick().await;
                }
            }
        }

        log::info!("Bot level brackets balancer stopped");
    }

    async fn handle_message(&mut self, message: BracketMessage) {
        match message {
            BracketMessage::Reload { config, response } => {
                let result = self.scheduler.reload(*config);
                if let Err(e) = &result {
                    log::error!("Rejected configuration reload: {}", e);
                }
                let _ = response.send(result);
            }

            BracketMessage::PlayerLogout { character_id } => {
                self.scheduler.on_logout(character_id);
            }

            BracketMessage::CleanupGuildTracker { response } => {
                let removed = self.cleanup_guild_tracker().await;
                let _ = response.send(removed);
            }

            BracketMessage::RunNow { cycles, response } => {
                let report = self.run_cycles(cycles).await;
                let _ = response.send(report);
            }

            BracketMessage::GetStatus { response } => {
                let _ = response.send(self.scheduler.status());
            }

            BracketMessage::Subscribe { sender } => {
                self.subscribers.push(sender);
            }

            BracketMessage::Shutdown => {
                self.is_closed = true;
            }
        }
    }

    /// Advance the timers by the real elapsed time and run what is due
    async fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;

        let diff_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
        let due = self.scheduler.advance_timers(diff_ms);
        if due.any() {
            self.run_cycles(due).await;
        }
    }

    async fn run_cycles(&mut self, due: DueCycles) -> TickReport {
        if due.scan {
            self.reload_friends().await;
        }

        let report = {
            let mut world = self.world.lock().await;
            self.scheduler.run_due(&mut *world, due)
        };

        if let Some(guilds) = &report.guilds_marked
            && let Err(e) = self.guild_store.mark_real_player_guilds(guilds).await
        {
            log::error!("Failed to persist guild tracker update: {}", e);
        }

        self.notify_subscribers(&report);
        report
    }

    async fn cleanup_guild_tracker(&mut self) -> Vec<GuildId> {
        let removed = {
            let world = self.world.lock().await;
            self.scheduler.cleanup_guild_tracker(&*world)
        };

        if let Err(e) = self.guild_store.clear_guilds(&removed).await {
            log::error!("Failed to clear guilds in tracker store: {}", e);
        }
        removed
    }

    async fn reload_friends(&mut self) {
        match self.social_store.load_friend_pairs().await {
            Ok(pairs) => self.scheduler.set_friends(FriendSet::from_pairs(pairs)),
            Err(e) => log::error!("Failed to load friend list, keeping previous snapshot: {}", e),
        }
    }

    /// Send the report to every subscriber
    fn notify_subscribers(&mut self, report: &TickReport) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|sender| match sender.try_send(report.clone()) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("Balancer subscriber channel full, dropping report");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}
