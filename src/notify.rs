use std::time::{Duration, Instant};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

macro_rules! notification_fn {
    ($(($name:ident, $ty:expr)),* $(,)?) => {
        $(pub fn $name(message: impl ToString) -> Self {
            Self::new($ty, message)
        })*
    };
}

impl Notification {
    pub fn new(severity: Severity, message: impl ToString) -> Self {
        Self {
            severity,
            message: message.to_string(),
        }
    }

    notification_fn!(
        (success, Severity::Success),
        (info, Severity::Info),
        (warning, Severity::Warning),
        (error, Severity::Error),
    );
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: u64,
    pub posted: Instant,
    pub notification: Notification,
}

/// Transient messages shown to the user; each one hides itself after `ttl`.
#[derive(Debug)]
pub struct Notifications {
    entries: Vec<Entry>,
    ttl: Duration,
    next: u64,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Self::TTL)
    }
}

impl Notifications {
    pub const TTL: Duration = Duration::from_secs(4);

    pub const fn new(ttl: Duration) -> Self {
        Self {
            entries: Vec::new(),
            ttl,
            next: 0,
        }
    }

    pub fn push_at(&mut self, notification: Notification, now: Instant) -> u64 {
        let Notification { severity, message } = &notification;
        match severity {
            Severity::Error => error!(%message),
            Severity::Warning => warn!(%message),
            Severity::Success | Severity::Info => info!(%message),
        }

        let id = self.next;
        self.next += 1;
        self.entries.push(Entry {
            id,
            posted: now,
            notification,
        });
        id
    }

    pub fn push(&mut self, notification: Notification) -> u64 {
        self.push_at(notification, Instant::now())
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Drops everything older than `ttl`. Returns whether something was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|entry| now.saturating_duration_since(entry.posted) < ttl);
        before != self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().rev()
    }
}
