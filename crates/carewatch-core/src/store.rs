// ── Reactive card store ──
//
// Thread-safe, lock-free cache of the most recent card snapshot.
// Each poll fully replaces the contents (no incremental merge); the
// device index makes device-id -> card resolution O(1) for the
// alarm-handling policy. Replacements are broadcast to subscribers
// via a `watch` channel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::Card;
use crate::stream::CardStream;

/// Central reactive cache for the current card snapshot.
///
/// All reads are wait-free; writes use fine-grained per-shard locks
/// within `DashMap`. The monitor refreshes it on every poll tick; the
/// policy evaluator and CLI read from it.
pub struct CardStore {
    /// Primary storage: card id -> card.
    cards: DashMap<String, Arc<Card>>,

    /// Secondary index: device id -> owning card id. A device belongs
    /// to exactly one card.
    device_index: DashMap<String, String>,

    /// Full snapshot, rebuilt on replacement for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<Card>>>>,

    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl CardStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (last_refresh, _) = watch::channel(None);

        Self {
            cards: DashMap::new(),
            device_index: DashMap::new(),
            snapshot,
            last_refresh,
        }
    }

    /// Apply a full card refresh.
    ///
    /// Clears the cache and repopulates from the provided cards. The
    /// previous snapshot is discarded whole -- the backend serves the
    /// complete visible set every time.
    pub fn apply_snapshot(&self, cards: Vec<Card>) {
        self.cards.clear();
        self.device_index.clear();

        for card in cards {
            for device in &card.devices {
                self.device_index
                    .insert(device.id.clone(), card.id.clone());
            }
            self.cards.insert(card.id.clone(), Arc::new(card));
        }

        self.rebuild_snapshot();
        let _ = self.last_refresh.send(Some(Utc::now()));
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn card_by_id(&self, id: &str) -> Option<Arc<Card>> {
        self.cards.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Resolve the card owning a device, if it is cached.
    ///
    /// `None` here is not an error: the alarm-handling policy treats an
    /// unresolvable device as its optimistic default-allow case.
    pub fn card_by_device(&self, device_id: &str) -> Option<Arc<Card>> {
        let card_id = self.device_index.get(device_id)?;
        self.cards
            .get(card_id.value().as_str())
            .map(|r| Arc::clone(r.value()))
    }

    /// Find an alarm event across all cached cards by its event id.
    pub fn find_alarm_event(&self, event_id: &str) -> Option<crate::model::AlarmEvent> {
        self.cards.iter().find_map(|entry| {
            entry
                .value()
                .alarms
                .iter()
                .find(|e| e.id == event_id)
                .cloned()
        })
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub fn cards_snapshot(&self) -> Arc<Vec<Arc<Card>>> {
        self.snapshot.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> CardStream {
        CardStream::new(self.snapshot.subscribe())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last refresh occurred, or `None` if never refreshed.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<Card>> = self.cards.iter().map(|r| Arc::clone(r.value())).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

impl Default for CardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::{Card, CardDevice, CardKind, UnitClass};

    fn card(id: &str, device_ids: &[&str]) -> Card {
        Card {
            id: id.into(),
            kind: CardKind::ActiveBed,
            unit: UnitClass::Facility,
            name: format!("card {id}"),
            address: String::new(),
            devices: device_ids
                .iter()
                .map(|d| CardDevice {
                    id: (*d).to_owned(),
                    name: None,
                    device_type: None,
                    binding_type: None,
                })
                .collect(),
            alarms: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_fully_replaces_previous_contents() {
        let store = CardStore::new();
        store.apply_snapshot(vec![card("a", &["d1"]), card("b", &["d2"])]);
        assert_eq!(store.len(), 2);

        store.apply_snapshot(vec![card("c", &["d3"])]);
        assert_eq!(store.len(), 1);
        assert!(store.card_by_id("a").is_none());
        assert!(store.card_by_device("d1").is_none());
        assert_eq!(store.card_by_device("d3").unwrap().id, "c");
    }

    #[test]
    fn device_index_follows_reassignment() {
        let store = CardStore::new();
        store.apply_snapshot(vec![card("a", &["d1"])]);
        assert_eq!(store.card_by_device("d1").unwrap().id, "a");

        // Device moved to another card between polls.
        store.apply_snapshot(vec![card("b", &["d1"])]);
        assert_eq!(store.card_by_device("d1").unwrap().id, "b");
    }

    #[test]
    fn unknown_device_resolves_to_none() {
        let store = CardStore::new();
        store.apply_snapshot(vec![card("a", &["d1"])]);
        assert!(store.card_by_device("ghost").is_none());
    }

    #[test]
    fn last_refresh_set_on_apply() {
        let store = CardStore::new();
        assert!(store.last_refresh().is_none());
        store.apply_snapshot(Vec::new());
        assert!(store.last_refresh().is_some());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn subscription_sees_replacements() {
        let store = CardStore::new();
        let mut sub = store.subscribe();
        assert!(sub.current().is_empty());

        store.apply_snapshot(vec![card("a", &[])]);
        let snap = sub.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
    }
}
