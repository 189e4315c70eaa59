use std::time::{Duration, Instant};

use crate::state::Player;

/// Case-insensitive substring match on name or team, in catalog order.
pub fn filter_players(catalog: &[Player], query: &str) -> Vec<Player> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return catalog.to_vec();
    }
    catalog
        .iter()
        .filter(|player| {
            player.name.to_lowercase().contains(&query)
                || player.team.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Trailing-edge debounce: a single-shot deadline that every new input
/// cancels and re-arms.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    due_at: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            due_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    pub fn restart(&mut self, now: Instant) {
        self.due_at = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due_at = None;
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.due_at.map(|due| due.saturating_duration_since(now))
    }
}
