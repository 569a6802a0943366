use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::StoreError;
use crate::repository::ReservationRepository;

/// Default lifetime of a cached availability answer.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// Time-boxed memo of "is room R free for [start, end)" answers.
///
/// Values are deterministic functions of persisted state, so last-write-wins
/// on a key is fine under concurrent requests. Expired entries are swept
/// opportunistically on insert; an expired entry and a missing one look
/// identical to callers.
pub struct AvailabilityCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    available: bool,
    inserted_at: Instant,
}

impl AvailabilityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn key(room_number: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!("{}_{}_{}", room_number, start.to_rfc3339(), end.to_rfc3339())
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.available)
    }

    pub fn set(&self, key: String, available: bool) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let ttl = self.ttl;
        entries.retain(|_, e| e.inserted_at.elapsed() < ttl);
        entries.insert(
            key,
            CacheEntry {
                available,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}

impl Default for AvailabilityCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// Computes room availability against persisted reservations, consulting
/// the cache first. A cold cache must answer exactly like a warm one, so
/// the store query is the single source of truth.
pub struct AvailabilityChecker {
    reservations: Arc<dyn ReservationRepository>,
    cache: AvailabilityCache,
}

impl AvailabilityChecker {
    pub fn new(reservations: Arc<dyn ReservationRepository>, cache: AvailabilityCache) -> Self {
        Self {
            reservations,
            cache,
        }
    }

    /// True iff no existing reservation for the room overlaps `[start, end)`.
    pub async fn is_available(
        &self,
        room_number: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let key = AvailabilityCache::key(room_number, start, end);
        if let Some(cached) = self.cache.get(&key) {
            debug!(room = room_number, available = cached, "availability cache hit");
            return Ok(cached);
        }

        let available = !self.reservations.has_overlap(room_number, start, end).await?;
        self.cache.set(key, available);
        Ok(available)
    }

    /// Drops the cached answer for one exact range. Called after a booking
    /// commits so an identical re-request cannot ride a stale "available".
    pub fn invalidate(&self, room_number: &str, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.cache
            .invalidate(&AvailabilityCache::key(room_number, start, end));
    }
}
