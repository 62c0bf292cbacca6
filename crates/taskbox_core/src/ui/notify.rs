//! Transient confirmation messages.

use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub shown_at: Instant,
}

/// Set of notifications that expire on their own.
#[derive(Debug, Clone)]
pub struct Notifier {
    ttl: Duration,
    active: Vec<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::with_ttl(NOTIFICATION_TTL)
    }
}

impl Notifier {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            active: Vec::new(),
        }
    }

    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.active.push(Notification {
            message: message.into(),
            shown_at: now,
        });
    }

    /// Notifications still visible at `now`, oldest first.
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        let ttl = self.ttl;
        self.active
            .iter()
            .filter(move |item| now.saturating_duration_since(item.shown_at) < ttl)
    }

    /// Drops expired notifications and returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        let ttl = self.ttl;
        self.active
            .retain(|item| now.saturating_duration_since(item.shown_at) < ttl);
        before - self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Notifier, NOTIFICATION_TTL};
    use std::time::{Duration, Instant};

    #[test]
    fn notification_expires_after_ttl() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.show("The task was copied", start);

        assert_eq!(notifier.visible(start).count(), 1);
        let later = start + NOTIFICATION_TTL + Duration::from_millis(1);
        assert_eq!(notifier.visible(later).count(), 0);
        assert_eq!(notifier.prune(later), 1);
        assert_eq!(notifier.prune(later), 0);
    }
}
