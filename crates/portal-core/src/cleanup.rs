//! Teardown coordinator.
//!
//! Drains the tracking store in dependency order: every order delete is
//! launched concurrently and awaited before any customer or product delete
//! starts, since the backend rejects deleting an entity a live order still
//! references. Individual failures are collected, never fail-fast, so one
//! missing entity cannot leave the rest behind.

use futures::future::join_all;
use portal_client::PortalClient;
use portal_store::EntityStore;
use portal_types::{api::status_codes, EntityKind};
use std::sync::Arc;
use thiserror::Error;

/// Errors from a teardown run.
#[derive(Debug, Error)]
pub enum CleanupError {
	/// Teardown finished, but some deletes failed.
	#[error("Cleanup finished with failed deletes: {0:?}")]
	Failures(Vec<String>),
}

/// Deletes every tracked entity at test teardown.
pub struct CleanupCoordinator {
	client: Arc<dyn PortalClient>,
	store: Arc<EntityStore>,
}

impl CleanupCoordinator {
	pub fn new(client: Arc<dyn PortalClient>, store: Arc<EntityStore>) -> Self {
		Self { client, store }
	}

	/// Deletes all tracked orders, then customers, then products, and
	/// clears the store.
	///
	/// Deletes within a batch run concurrently; the next batch starts only
	/// after the previous one fully settles. Failures are collected and
	/// reported together once the whole teardown finishes.
	pub async fn full_delete(&self, token: &str) -> Result<(), CleanupError> {
		let mut failures = Vec::new();
		for kind in EntityKind::ALL {
			let ids = self.store.ids(kind).await;
			if ids.is_empty() {
				continue;
			}
			tracing::info!(%kind, count = ids.len(), "deleting tracked entities");

			let deletes = ids.iter().map(|id| self.delete_one(token, kind, id));
			for result in join_all(deletes).await {
				if let Err(failure) = result {
					tracing::warn!(%kind, failure, "delete failed during cleanup");
					failures.push(failure);
				}
			}
		}
		self.store.clear().await;

		if failures.is_empty() {
			Ok(())
		} else {
			Err(CleanupError::Failures(failures))
		}
	}

	async fn delete_one(&self, token: &str, kind: EntityKind, id: &str) -> Result<(), String> {
		let response = match kind {
			EntityKind::Order => self.client.delete_order(token, id).await,
			EntityKind::Customer => self.client.delete_customer(token, id).await,
			EntityKind::Product => self.client.delete_product(token, id).await,
		}
		.map_err(|e| format!("{kind} {id}: {e}"))?;

		if response.status != status_codes::DELETED {
			let message = response.body.error_message.unwrap_or_default();
			return Err(format!("{kind} {id}: status {}: {message}", response.status));
		}
		Ok(())
	}
}
