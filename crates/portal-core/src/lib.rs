//! Core orchestration for the Sales Portal test harness.
//!
//! Ties the order status state machine, the orchestration service, and the
//! teardown coordinator together. A test asks for "an order in status X";
//! the planner picks the shortest legal route from Draft, the orchestrator
//! issues one validated remote call per step, and every created entity id
//! is tracked for [`cleanup::CleanupCoordinator::full_delete`] at teardown.

/// Teardown coordination over the tracking store.
pub mod cleanup;
/// Order building and validated single-call operations.
pub mod orchestrator;
/// Status graph, guards, and route planning.
pub mod state;

pub use cleanup::{CleanupCoordinator, CleanupError};
pub use orchestrator::{OrderOrchestrator, OrderSpec, OrchestratorError};
pub use state::{
	derive_status_after_receive, expected_rejection, guard, is_legal, plan_route, Guard, PlanStep,
	RouteOptions,
};

use portal_client::HttpPortalClient;
use portal_config::HarnessConfig;
use portal_store::EntityStore;
use std::sync::Arc;
use std::time::Duration;

/// An orchestrator and cleanup coordinator sharing one client and store.
pub struct Harness {
	pub orchestrator: OrderOrchestrator,
	pub cleanup: CleanupCoordinator,
}

/// Builds a harness against a live portal from a loaded configuration.
///
/// The store is created fresh here; call once per test lifecycle.
pub fn connect(config: &HarnessConfig) -> Result<Harness, OrchestratorError> {
	let client = Arc::new(HttpPortalClient::new(
		config.base_url.clone(),
		Duration::from_secs(config.http.timeout_seconds),
	)?);
	let store = Arc::new(EntityStore::new());

	Ok(Harness {
		orchestrator: OrderOrchestrator::new(
			client.clone(),
			store.clone(),
			config.manager_ids.clone(),
		),
		cleanup: CleanupCoordinator::new(client, store),
	})
}
