use crate::state::ScoreSession;
use crate::storage::Slot;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

pub const TICK: Duration = Duration::from_secs(1);

/// Handle to the task that runs the game clock down.
///
/// Every start and cancel bumps `epoch`. A tick that was already waiting on the
/// session lock when the clock was cancelled sees a different epoch and exits
/// without touching the state.
#[derive(Debug, Default)]
pub struct Countdown {
    epoch: u64,
    handle: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn is_ticking(&self) -> bool {
        self.handle.is_some()
    }

    pub fn cancel(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(epoch = self.epoch, "countdown cancelled");
        }
    }

    /// Spawns the ticking task. Must be called with the session lock held.
    pub fn start(&mut self, shared: Arc<Mutex<ScoreSession>>, slot: Slot) {
        self.cancel();
        let epoch = self.epoch;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut session = shared.lock().await;
                if session.countdown.epoch != epoch {
                    break;
                }
                let running = session.card.game.tick();
                slot.save(&session.card);
                if !running {
                    session.countdown.handle = None;
                    debug!("countdown expired");
                    break;
                }
            }
        });

        self.handle = Some(handle);
        debug!(epoch, "countdown started");
    }
}
