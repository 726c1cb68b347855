//! Per-session pending state between the water computation and the sewage
//! follow-up. The store is bounded: entries expire after a TTL and the map
//! enforces a capacity cap with oldest-first eviction, so stale
//! awaiting-surcharge sessions cannot grow the process without limit.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::domain::WaterCharge;

/// Opaque conversation key: the client-supplied session token, or the peer
/// IP when no token was sent (weaker isolation, documented fallback).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn from_peer(peer: SocketAddr) -> Self {
        Self(peer.ip().to_string())
    }
}

impl From<String> for SessionKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage abstraction so the dialogue router can be exercised in isolation.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &SessionKey) -> Option<WaterCharge>;
    fn put(&self, key: SessionKey, charge: WaterCharge);
    /// Atomic get-and-clear. The follow-up path depends on this being one
    /// operation: two concurrent follow-ups must not both consume the same
    /// pending charge.
    fn take(&self, key: &SessionKey) -> Option<WaterCharge>;
    fn clear(&self, key: &SessionKey);
}

struct PendingEntry {
    charge: WaterCharge,
    stored_at: Instant,
}

pub struct InMemorySessionStore {
    entries: Mutex<HashMap<SessionKey, PendingEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn is_expired(&self, entry: &PendingEntry, now: Instant) -> bool {
        now.duration_since(entry.stored_at) >= self.ttl
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(1_800), 4_096)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &SessionKey) -> Option<WaterCharge> {
        let guard = self.entries.lock().expect("session mutex poisoned");
        let now = Instant::now();
        guard
            .get(key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.charge.clone())
    }

    fn put(&self, key: SessionKey, charge: WaterCharge) {
        let mut guard = self.entries.lock().expect("session mutex poisoned");
        let now = Instant::now();
        guard.retain(|_, entry| !self.is_expired(entry, now));

        if guard.len() >= self.capacity && !guard.contains_key(&key) {
            let oldest = guard
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                guard.remove(&oldest);
            }
        }

        guard.insert(
            key,
            PendingEntry {
                charge,
                stored_at: now,
            },
        );
    }

    fn take(&self, key: &SessionKey) -> Option<WaterCharge> {
        let mut guard = self.entries.lock().expect("session mutex poisoned");
        let now = Instant::now();
        guard
            .remove(key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.charge)
    }

    fn clear(&self, key: &SessionKey) {
        let mut guard = self.entries.lock().expect("session mutex poisoned");
        guard.remove(key);
    }
}
