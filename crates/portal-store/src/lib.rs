//! Entity tracking store for the Sales Portal harness.
//!
//! Keeps an in-memory registry of the order, customer, and product ids a
//! test created, so teardown can delete them in dependency order. Tracking
//! is idempotent and order-independent; blank ids are ignored. Each test
//! lifecycle owns its own store instance — the store has no cross-test
//! locking and must never be shared as a singleton.

use portal_types::EntityKind;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// In-memory registry of entity ids created during a test run.
#[derive(Debug, Default)]
pub struct EntityStore {
	/// Deduplicated id sets per entity kind.
	entities: RwLock<HashMap<EntityKind, HashSet<String>>>,
}

impl EntityStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Tracks a single id. Blank ids are ignored; tracking the same id
	/// twice has no additional effect.
	pub async fn track(&self, kind: EntityKind, id: impl Into<String>) {
		let id = id.into();
		if id.trim().is_empty() {
			return;
		}
		let mut entities = self.entities.write().await;
		let inserted = entities.entry(kind).or_default().insert(id.clone());
		if inserted {
			tracing::debug!(%kind, %id, "tracked entity for teardown");
		}
	}

	/// Tracks a collection of ids, skipping blank entries.
	pub async fn track_all<I, S>(&self, kind: EntityKind, ids: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for id in ids {
			self.track(kind, id).await;
		}
	}

	/// Snapshot of the tracked ids for one kind. No ordering guarantee.
	pub async fn ids(&self, kind: EntityKind) -> Vec<String> {
		let entities = self.entities.read().await;
		entities
			.get(&kind)
			.map(|set| set.iter().cloned().collect())
			.unwrap_or_default()
	}

	/// Removes a single id from a kind's set, if present.
	pub async fn untrack(&self, kind: EntityKind, id: &str) {
		let mut entities = self.entities.write().await;
		if let Some(set) = entities.get_mut(&kind) {
			set.remove(id);
		}
	}

	/// Number of tracked ids per kind.
	pub async fn counts(&self) -> HashMap<EntityKind, usize> {
		let entities = self.entities.read().await;
		EntityKind::ALL
			.iter()
			.map(|kind| (*kind, entities.get(kind).map_or(0, HashSet::len)))
			.collect()
	}

	/// Empties all three sets.
	pub async fn clear(&self) {
		let mut entities = self.entities.write().await;
		entities.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_tracking_is_idempotent() {
		let store = EntityStore::new();
		store.track(EntityKind::Order, "o1").await;
		store.track(EntityKind::Order, "o1").await;
		store.track(EntityKind::Order, "o2").await;

		let mut ids = store.ids(EntityKind::Order).await;
		ids.sort();
		assert_eq!(ids, vec!["o1", "o2"]);
	}

	#[tokio::test]
	async fn test_blank_ids_are_ignored() {
		let store = EntityStore::new();
		store.track(EntityKind::Customer, "").await;
		store.track(EntityKind::Customer, "   ").await;
		store
			.track_all(EntityKind::Product, ["p1", "", "p2"])
			.await;

		assert!(store.ids(EntityKind::Customer).await.is_empty());
		assert_eq!(store.ids(EntityKind::Product).await.len(), 2);
	}

	#[tokio::test]
	async fn test_kinds_are_independent() {
		let store = EntityStore::new();
		store.track(EntityKind::Order, "x").await;
		store.track(EntityKind::Customer, "x").await;

		assert_eq!(store.ids(EntityKind::Order).await, vec!["x"]);
		assert_eq!(store.ids(EntityKind::Customer).await, vec!["x"]);
		assert!(store.ids(EntityKind::Product).await.is_empty());
	}

	#[tokio::test]
	async fn test_untrack_removes_single_id() {
		let store = EntityStore::new();
		store.track_all(EntityKind::Order, ["o1", "o2"]).await;
		store.untrack(EntityKind::Order, "o1").await;

		assert_eq!(store.ids(EntityKind::Order).await, vec!["o2"]);
	}

	#[tokio::test]
	async fn test_clear_empties_all_kinds() {
		let store = EntityStore::new();
		store.track(EntityKind::Order, "o1").await;
		store.track(EntityKind::Customer, "c1").await;
		store.track(EntityKind::Product, "p1").await;

		store.clear().await;

		for kind in EntityKind::ALL {
			assert!(store.ids(kind).await.is_empty(), "{kind} not cleared");
		}
	}
}
