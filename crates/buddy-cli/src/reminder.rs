//! Cancellable recurring tasks and the hydration reminder built on them

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Messages the hydration reminder cycles through
pub const HYDRATION_MESSAGES: &[&str] = &[
    "Time for a sip of water!",
    "Stay hydrated - your buddy is thirsty too.",
    "Water break! Your brain will thank you.",
    "Grab a glass of water and stretch for a moment.",
];

/// Runs an action every `period` on the tokio runtime until cancelled.
///
/// The first run happens one full period after spawning. Dropping the task
/// cancels it.
#[derive(Debug)]
pub struct RecurringTask {
    handle: Option<JoinHandle<()>>,
}

impl RecurringTask {
    /// Spawn the task. Must be called from within a tokio runtime.
    pub fn spawn<F>(period: Duration, mut action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                action();
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Stop the task. Returns `false` if it was already stopped.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RecurringTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A display-layer notice produced outside the analysis path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub at: DateTime<Local>,
}

/// Periodic "drink some water" nudges, delivered over a channel
#[derive(Debug)]
pub struct HydrationReminder {
    interval: Duration,
    sender: UnboundedSender<Notification>,
    task: Option<RecurringTask>,
}

impl HydrationReminder {
    pub fn new(interval: Duration, sender: UnboundedSender<Notification>) -> Self {
        Self {
            interval,
            sender,
            task: None,
        }
    }

    /// Begin reminding. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let sender = self.sender.clone();
        let mut next = 0usize;
        self.task = Some(RecurringTask::spawn(self.interval, move || {
            let message = HYDRATION_MESSAGES[next % HYDRATION_MESSAGES.len()];
            next += 1;
            let notification = Notification {
                message: message.to_string(),
                at: Local::now(),
            };
            if sender.send(notification).is_err() {
                debug!("reminder receiver dropped");
            }
        }));

        info!(interval_secs = self.interval.as_secs(), "hydration reminder started");
        true
    }

    /// Stop reminding. Safe to call any number of times.
    pub fn stop(&mut self) -> bool {
        let stopped = self.task.take().is_some_and(|mut task| task.cancel());
        if stopped {
            info!("hydration reminder stopped");
        }
        stopped
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(RecurringTask::is_running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test(start_paused = true)]
    async fn test_recurring_task_runs_each_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let mut task = RecurringTask::spawn(Duration::from_secs(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(21)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        assert!(task.cancel());
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let mut task = RecurringTask::spawn(Duration::from_secs(1), || {});
        assert!(task.is_running());
        assert!(task.cancel());
        assert!(!task.cancel());
        assert!(!task.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_delivers_rotating_messages() {
        let (tx, mut rx) = unbounded_channel();
        let mut reminder = HydrationReminder::new(Duration::from_secs(60), tx);

        assert!(reminder.start());
        assert!(!reminder.start());

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.message, HYDRATION_MESSAGES[0]);
        assert_eq!(second.message, HYDRATION_MESSAGES[1]);

        assert!(reminder.stop());
        assert!(!reminder.stop());
        assert!(!reminder.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_reminder_stays_quiet() {
        let (tx, mut rx) = unbounded_channel();
        let mut reminder = HydrationReminder::new(Duration::from_secs(60), tx);

        reminder.start();
        reminder.stop();
        tokio::time::sleep(Duration::from_secs(600)).await;

        assert!(rx.try_recv().is_err());
    }
}
