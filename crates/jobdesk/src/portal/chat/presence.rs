use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::profiles::{UserId, UserKind};

/// Entries older than this are considered offline and pruned on read.
pub const DEFAULT_PRESENCE_TTL: Duration = Duration::minutes(5);

/// One user's live-presence record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub user_id: UserId,
    pub username: String,
    pub user_type: UserKind,
    pub last_seen: DateTime<Utc>,
}

/// Who is currently active in the chat room.
///
/// Each session join or heartbeat upserts the user's entry; reads prune
/// anything past the staleness TTL. Keyed by user id, so a user reconnecting
/// replaces their old entry instead of growing an unbounded append-only list.
#[derive(Debug, Clone)]
pub struct PresenceRoster {
    ttl: Duration,
    entries: HashMap<UserId, PresenceEntry>,
}

impl Default for PresenceRoster {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_PRESENCE_TTL)
    }
}

impl PresenceRoster {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Record that a user is active now.
    pub fn heartbeat(
        &mut self,
        user_id: UserId,
        username: String,
        user_type: UserKind,
        now: DateTime<Utc>,
    ) {
        self.entries.insert(
            user_id.clone(),
            PresenceEntry {
                user_id,
                username,
                user_type,
                last_seen: now,
            },
        );
    }

    pub fn leave(&mut self, user_id: &UserId) {
        self.entries.remove(user_id);
    }

    /// Entries with a heartbeat inside the TTL, sorted by username for a
    /// stable sidebar. Stale entries are dropped from the roster as a side
    /// effect.
    pub fn active(&mut self, now: DateTime<Utc>) -> Vec<PresenceEntry> {
        let cutoff = now - self.ttl;
        self.entries.retain(|_, entry| entry.last_seen >= cutoff);

        let mut active: Vec<PresenceEntry> = self.entries.values().cloned().collect();
        active.sort_by(|a, b| a.username.cmp(&b.username));
        active
    }

    pub fn active_count(&mut self, now: DateTime<Utc>) -> usize {
        self.active(now).len()
    }
}
