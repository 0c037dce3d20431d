use std::{sync::Weak, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::{CabinetController, TickOutcome};

/// Drives the unlock countdown for one unlock epoch. The task stops by
/// itself once the controller reports anything other than a running
/// countdown for its epoch.
pub(crate) struct LockSessionTimer {
    epoch: u64,
    task: JoinHandle<()>,
}

impl LockSessionTimer {
    pub(crate) fn start(controller: Weak<CabinetController>, epoch: u64, tick: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + tick, tick);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                match controller.advance_countdown(Some(epoch)).await {
                    TickOutcome::Running { .. } => continue,
                    outcome => {
                        debug!(epoch, ?outcome, "timer: countdown task finished");
                        break;
                    }
                }
            }
        });
        Self { epoch, task }
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Stops the countdown; used when the session ends some other way.
    pub(crate) fn cancel(self) {
        self.task.abort();
    }
}
