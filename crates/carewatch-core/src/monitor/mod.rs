// ── Alarm notification monitor ──
//
// A cancellable polling loop that keeps at most one audible-alert
// stream reflecting the most urgent unresolved alarm across all cards
// visible to the session. The monitor is an owned handle -- no ambient
// singletons; whoever owns the session owns the monitor.
//
// Failure posture: nothing in this loop throws past its boundary.
// Fetch errors are retried on the next tick, playback errors leave the
// internal state silent and are retried while the alarm persists, and
// role exclusion turns `start` into a no-op.

pub mod snapshot;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Card, CardKey, Role};
use crate::store::CardStore;

pub use snapshot::MonitorSnapshot;

/// Supplier of the current card list (the card-fetch collaborator).
pub trait CardSource: Send + Sync {
    fn fetch_cards(&self) -> BoxFuture<'_, Result<Vec<Card>, CoreError>>;
}

/// Audible-alert playback collaborator.
///
/// Implementations are best-effort: a failed `play_*` must simply
/// return the error (the monitor logs it and stays silent for the
/// cycle), and `halt` must always leave the output device quiet.
pub trait AlarmSounder: Send + Sync {
    /// Start the tier-0 (emergency) alert stream.
    fn play_l1(&self) -> BoxFuture<'_, Result<(), CoreError>>;
    /// Start the tier-1 alert stream.
    fn play_l2(&self) -> BoxFuture<'_, Result<(), CoreError>>;
    /// Fully stop any playing stream (pause + reset position).
    fn halt(&self) -> BoxFuture<'_, ()>;
}

/// Audible output state. At most one stream plays at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundState {
    Silent,
    PlayingL1,
    PlayingL2,
}

struct MonitorTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owned handle over the polling loop.
///
/// `start`/`stop` are its only mutators and both are idempotent. The
/// audible output device is mutated exclusively through the transition
/// rule inside the loop -- no other component may drive playback while
/// the monitor runs.
pub struct AlarmMonitor {
    source: Arc<dyn CardSource>,
    sounder: Arc<dyn AlarmSounder>,
    store: Option<Arc<CardStore>>,
    interval: Duration,
    running: Mutex<Option<MonitorTask>>,
}

impl AlarmMonitor {
    pub fn new(source: Arc<dyn CardSource>, sounder: Arc<dyn AlarmSounder>) -> Self {
        Self {
            source,
            sounder,
            store: None,
            interval: Duration::from_secs(10),
            running: Mutex::new(None),
        }
    }

    /// Also refresh this store with every fetched snapshot, so policy
    /// lookups and dashboards see the same data the monitor does.
    pub fn with_store(mut self, store: Arc<CardStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the poll cadence (default 10 s).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Begin polling for the given session role.
    ///
    /// Returns `false` without scheduling anything when the role has no
    /// monitoring surface (platform-operations roles) or when the
    /// monitor is already running; both are no-ops, not errors. On
    /// `true`, the first fetch-and-evaluate cycle runs immediately
    /// inside the spawned task and repeats at the configured interval.
    pub async fn start(&self, role: Role) -> bool {
        if role.is_platform_operations() {
            info!(%role, "role has no monitoring surface; alarm monitor not started");
            return false;
        }

        let mut running = self.running.lock().await;
        if running.is_some() {
            debug!("alarm monitor already running");
            return false;
        }

        info!(%role, interval_secs = self.interval.as_secs(), "starting alarm monitor");

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.source),
            Arc::clone(&self.sounder),
            self.store.clone(),
            self.interval,
            cancel.clone(),
        ));

        *running = Some(MonitorTask { cancel, handle });
        true
    }

    /// Cancel polling, halt playback, and clear alarm-tracking state.
    ///
    /// Safe to call at any point, including mid-fetch: the in-flight
    /// cycle is abandoned and its result discarded, and the loop's last
    /// act is to silence the output device. No-op if not running.
    pub async fn stop(&self) {
        let task = self.running.lock().await.take();
        let Some(MonitorTask { cancel, handle }) = task else {
            debug!("alarm monitor not running; stop is a no-op");
            return;
        };

        info!("stopping alarm monitor");
        cancel.cancel();
        if handle.await.is_err() {
            // The task only ends by cancellation or panic; a panic has
            // already been logged by the runtime.
            warn!("alarm monitor task ended abnormally");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }
}

// ── Polling loop ─────────────────────────────────────────────────────

/// Per-loop mutable state: what is currently audible and which cards
/// were alarming on the previous tick (for new-alarm logging only --
/// each snapshot fully replaces the last).
struct PollState {
    sound: SoundState,
    tracked: HashSet<CardKey>,
}

async fn poll_loop(
    source: Arc<dyn CardSource>,
    sounder: Arc<dyn AlarmSounder>,
    store: Option<Arc<CardStore>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    // Cycles run strictly one at a time; if a fetch ever outlasts the
    // interval the missed ticks collapse into one delayed tick instead
    // of bursting.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut state = PollState {
        sound: SoundState::Silent,
        tracked: HashSet::new(),
    };

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                tokio::select! {
                    biased;
                    // Cancellation mid-cycle abandons the in-flight
                    // fetch; its result must not take effect.
                    () = cancel.cancelled() => break,
                    () = run_cycle(&*source, &*sounder, store.as_deref(), &mut state) => {}
                }
            }
        }
    }

    // Whatever happened above, leave the output device quiet.
    sounder.halt().await;
    debug!("alarm monitor loop ended");
}

/// One fetch-and-evaluate cycle: fetch -> store refresh -> reduce ->
/// log new alarms -> sound transition.
async fn run_cycle(
    source: &dyn CardSource,
    sounder: &dyn AlarmSounder,
    store: Option<&CardStore>,
    state: &mut PollState,
) {
    let cards = match source.fetch_cards().await {
        Ok(cards) => cards,
        Err(e) => {
            // Transient by assumption: keep the previous audible state
            // and tracking untouched, retry on the next tick.
            warn!(error = %e, "card fetch failed; keeping previous alarm state");
            return;
        }
    };

    if let Some(store) = store {
        store.apply_snapshot(cards.clone());
    }

    let snapshot = MonitorSnapshot::reduce(&cards);

    for key in snapshot.alarming.difference(&state.tracked) {
        info!(card = %key, tier = %snapshot.top_tier, "new alarm detected");
    }
    state.tracked.clone_from(&snapshot.alarming);

    apply_sound_transition(sounder, state, &snapshot).await;
}

/// Drive the audible output toward what the snapshot calls for.
///
/// Staying in the same tier never restarts the stream; any switch fully
/// halts the previous stream before the next one starts. A playback
/// failure is logged and leaves the state silent -- the next cycle
/// retries while the alarm condition persists.
async fn apply_sound_transition(
    sounder: &dyn AlarmSounder,
    state: &mut PollState,
    snapshot: &MonitorSnapshot,
) {
    let target = snapshot.target_sound();
    if target == state.sound {
        return;
    }

    sounder.halt().await;
    state.sound = SoundState::Silent;

    let result = match target {
        SoundState::Silent => {
            debug!("no audible alarms; alert sound stopped");
            return;
        }
        SoundState::PlayingL1 => sounder.play_l1().await,
        SoundState::PlayingL2 => sounder.play_l2().await,
    };

    match result {
        Ok(()) => state.sound = target,
        Err(e) => {
            warn!(error = %e, "alert playback failed; staying silent until next cycle");
        }
    }
}
