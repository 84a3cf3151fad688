//! Transient messages such as "New post added!".
//!
//! Each message is retracted by its own timer task after the configured delay.
//! Nothing else in the crate reads these, so a lost or reordered notification
//! never affects the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
}

#[derive(Debug, Default)]
struct Shown {
    next_id: u64,
    active: Vec<Notification>,
}

type SharedShown = Arc<Mutex<Shown>>;

fn lock(shown: &SharedShown) -> MutexGuard<'_, Shown> {
    shown.lock().unwrap_or_else(PoisonError::into_inner)
}

fn retract(shown: &SharedShown, id: u64) -> bool {
    let mut shown = lock(shown);
    let before = shown.active.len();
    shown.active.retain(|notification| notification.id != id);
    before != shown.active.len()
}

#[derive(Clone, Debug)]
pub struct Notifications {
    delay: Duration,
    shown: SharedShown,
}

impl Notifications {
    pub fn new(delay: Duration) -> Self {
        Notifications {
            delay,
            shown: SharedShown::default(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Shows `message` until the delay runs out or the handle is cancelled.
    /// Dropping the handle leaves the timer running.
    ///
    /// Outside a tokio runtime there is nothing to run the timer on, so the
    /// message is not shown at all and the handle starts out retracted.
    pub fn show(&self, message: impl Into<String>) -> NotificationHandle {
        let runtime = Handle::try_current();
        let notification = {
            let mut shown = lock(&self.shown);
            shown.next_id += 1;
            let notification = Notification {
                id: shown.next_id,
                message: message.into(),
            };
            if runtime.is_ok() {
                shown.active.push(notification.clone());
            }
            notification
        };

        let id = notification.id;
        let timer = match runtime {
            Ok(runtime) => {
                debug!("showing notification {}: {}", id, notification.message);
                let delay = self.delay;
                let shown = Arc::clone(&self.shown);
                Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if retract(&shown, id) {
                        debug!("notification {} expired", id);
                    }
                }))
            }
            Err(err) => {
                warn!("not showing notification {:?}: {}", notification.message, err);
                None
            }
        };

        NotificationHandle {
            id,
            timer,
            shown: Arc::clone(&self.shown),
        }
    }

    /// Messages currently on display, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        lock(&self.shown).active.clone()
    }
}

/// Owns the timer that retracts one notification.
#[derive(Debug)]
pub struct NotificationHandle {
    id: u64,
    timer: Option<JoinHandle<()>>,
    shown: SharedShown,
}

impl NotificationHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True once the message has expired on its own or been cancelled.
    pub fn is_retracted(&self) -> bool {
        !lock(&self.shown).active.iter().any(|n| n.id == self.id)
    }

    /// Retracts the message now. Returns false if it was already gone.
    pub fn cancel(self) -> bool {
        if let Some(timer) = self.timer {
            timer.abort();
        }
        retract(&self.shown, self.id)
    }
}
