/// Post-reminder scheduling
///
/// One best-effort reminder is scheduled a short, fixed interval after
/// login and cancelled on logout. Delivery goes through the [`Notifier`]
/// trait so the embedding shell can bridge to the platform's local
/// notification facility; delivery failures are logged, never surfaced.
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
}

fn post_reminder() -> Reminder {
    Reminder {
        title: "Time to share".to_string(),
        body: "Post a photo so today makes it into your feed.".to_string(),
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, reminder: Reminder) -> anyhow::Result<()>;
}

pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, delay: Duration) -> Self {
        Self {
            notifier,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule the reminder, replacing any still-pending one.
    pub fn schedule(&self) {
        let notifier = Arc::clone(&self.notifier);
        let delay = self.delay;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = notifier.deliver(post_reminder()).await {
                tracing::warn!("post reminder delivery failed: {err}");
            }
        });

        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.replace(task) {
                previous.abort();
            }
        }
    }

    /// Cancel a pending reminder, if any. Called on logout.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(task) = pending.take() {
                task.abort();
                tracing::debug!("post reminder cancelled");
            }
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
