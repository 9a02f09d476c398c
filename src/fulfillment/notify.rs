//! Outbound messages to buyers and admins.
//!
//! The chat transport lives outside this crate; it plugs in through [`Notifier`]. Sending
//! never fails the caller: the outcome is returned and logged.

use crate::model::UserId;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    /// Extra payload for the transport, e.g. the UPI link a QR image is rendered from.
    pub attachment: Option<String>,
}

impl Notice {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered,
    Failed(String),
}

impl NotifyOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotifyOutcome::Delivered)
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user: UserId, notice: &Notice) -> NotifyOutcome;
}

/// Writes every notice to the log. Useful when no transport is attached.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user: UserId, notice: &Notice) -> NotifyOutcome {
        info!(%user, text = %notice.text, attachment = ?notice.attachment, "Notify");
        NotifyOutcome::Delivered
    }
}

/// Records notices in memory; can be switched into a failing mode.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    sent: Arc<Mutex<Vec<(UserId, Notice)>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every delivered notice, oldest first.
    pub fn sent(&self) -> Vec<(UserId, Notice)> {
        self.lock().clone()
    }

    pub fn sent_to(&self, user: UserId) -> Vec<Notice> {
        self.lock()
            .iter()
            .filter(|(to, _)| *to == user)
            .map(|(_, notice)| notice.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(UserId, Notice)>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, user: UserId, notice: &Notice) -> NotifyOutcome {
        if self.failing.load(Ordering::SeqCst) {
            return NotifyOutcome::Failed(format!("chat {user} unreachable"));
        }
        self.lock().push((user, notice.clone()));
        NotifyOutcome::Delivered
    }
}

/// Sends `notice` up to `attempts` times (at least once) and returns the last outcome.
pub async fn notify_with_retry(
    notifier: &dyn Notifier,
    user: UserId,
    notice: &Notice,
    attempts: u32,
) -> NotifyOutcome {
    let attempts = attempts.max(1);
    let mut outcome = NotifyOutcome::Failed("not attempted".into());
    for attempt in 1..=attempts {
        outcome = notifier.notify(user, notice).await;
        match &outcome {
            NotifyOutcome::Delivered => break,
            NotifyOutcome::Failed(reason) => {
                warn!(%user, attempt, attempts, %reason, "Notification failed");
            }
        }
    }
    outcome
}
