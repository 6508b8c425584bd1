//! Order orchestration service.
//!
//! Builds orders already in an arbitrary target status by composing remote
//! calls along the planned route, validating every hop's response before
//! taking the next step. Every entity id created along the way is tracked
//! immediately, so teardown can still clean up after a failed build.

use portal_client::{ClientError, PortalClient};
use portal_store::EntityStore;
use portal_types::{
	api::status_codes, generators, ApiResponse, CreateOrderBody, EntityKind, Order, OrderStatus,
	UpdateOrderBody,
};
use std::sync::Arc;
use thiserror::Error;

use crate::state::{plan_route, PlanStep, RouteOptions};

/// Errors from driving the portal through an orchestrated sequence.
#[derive(Debug, Error)]
pub enum OrchestratorError {
	/// Transport-level failure of a remote call.
	#[error("Transport failure: {0}")]
	Client(#[from] ClientError),
	/// The requested build is not expressible.
	#[error("Invalid order spec: {0}")]
	InvalidSpec(String),
	/// The portal rejected a step; carries the backend's message verbatim.
	#[error("{operation} rejected (status {status}): {message}")]
	Rejected {
		operation: &'static str,
		status: u16,
		message: String,
	},
	/// A successful response arrived without its payload.
	#[error("Response for {0} carried no payload")]
	MissingPayload(&'static str),
}

/// What to build: product count, target status, and receive/manager
/// options.
#[derive(Debug, Clone)]
pub struct OrderSpec {
	/// Number of products on the order, 1 to 5.
	pub products: usize,
	/// Status the order must end up in.
	pub target: OrderStatus,
	/// Manager to assign; falls back to the first configured manager,
	/// skipped when neither exists.
	pub manager: Option<String>,
	/// Products to receive when the target is PartiallyReceived
	/// (default 1).
	pub receive: Option<usize>,
}

impl OrderSpec {
	/// A spec with defaults for the given target.
	pub fn new(target: OrderStatus, products: usize) -> Self {
		Self {
			products,
			target,
			manager: None,
			receive: None,
		}
	}

	fn validate(&self) -> Result<(), OrchestratorError> {
		if self.products == 0 || self.products > 5 {
			return Err(OrchestratorError::InvalidSpec(format!(
				"product count must be 1 to 5, got {}",
				self.products
			)));
		}
		if self.target == OrderStatus::PartiallyReceived {
			if self.products < 2 {
				return Err(OrchestratorError::InvalidSpec(
					"a partially received order needs at least 2 products".into(),
				));
			}
			let receive = self.receive.unwrap_or(1);
			if receive == 0 || receive >= self.products {
				return Err(OrchestratorError::InvalidSpec(format!(
					"receive count must be 1 to {}, got {receive}",
					self.products - 1
				)));
			}
		}
		Ok(())
	}
}

/// Drives the Sales Portal to produce orders in a requested status.
pub struct OrderOrchestrator {
	client: Arc<dyn PortalClient>,
	store: Arc<EntityStore>,
	managers: Vec<String>,
}

/// Unwraps a validated response payload or converts the rejection.
fn accept<T>(
	operation: &'static str,
	expected_status: u16,
	response: ApiResponse<T>,
) -> Result<T, OrchestratorError> {
	if response.status != expected_status || !response.body.is_success {
		return Err(OrchestratorError::Rejected {
			operation,
			status: response.status,
			message: response.body.error_message.unwrap_or_default(),
		});
	}
	response
		.body
		.payload
		.ok_or(OrchestratorError::MissingPayload(operation))
}

/// Validates a payload-less response (deletes).
fn accept_empty<T>(
	operation: &'static str,
	expected_status: u16,
	response: ApiResponse<T>,
) -> Result<(), OrchestratorError> {
	if response.status != expected_status || !response.body.is_success {
		return Err(OrchestratorError::Rejected {
			operation,
			status: response.status,
			message: response.body.error_message.unwrap_or_default(),
		});
	}
	Ok(())
}

impl OrderOrchestrator {
	/// Creates an orchestrator over a client and a tracking store, with the
	/// manager ids available for default assignment.
	pub fn new(
		client: Arc<dyn PortalClient>,
		store: Arc<EntityStore>,
		managers: Vec<String>,
	) -> Self {
		Self {
			client,
			store,
			managers,
		}
	}

	/// The tracking store this orchestrator registers created ids with.
	pub fn store(&self) -> &Arc<EntityStore> {
		&self.store
	}

	/// Builds an order matching `spec` and returns it as last observed.
	///
	/// Customer, products, and the draft order are created sequentially and
	/// tracked as they appear. Non-draft targets get a delivery and a
	/// manager up front, then follow the planned route one validated hop at
	/// a time. The first rejected hop aborts the build; everything created
	/// so far stays tracked.
	pub async fn build_order(
		&self,
		token: &str,
		spec: &OrderSpec,
	) -> Result<Order, OrchestratorError> {
		spec.validate()?;
		tracing::info!(target_status = %spec.target, products = spec.products, "building order");

		let customer = accept(
			"create_customer",
			status_codes::CREATED,
			self.client
				.create_customer(token, &generators::customer_body())
				.await?,
		)?
		.customer;
		self.store.track(EntityKind::Customer, &customer.id).await;

		let mut product_ids = Vec::with_capacity(spec.products);
		for _ in 0..spec.products {
			let product = accept(
				"create_product",
				status_codes::CREATED,
				self.client
					.create_product(token, &generators::product_body())
					.await?,
			)?
			.product;
			self.store.track(EntityKind::Product, &product.id).await;
			product_ids.push(product.id);
		}

		let mut order = accept(
			"create_order",
			status_codes::CREATED,
			self.client
				.create_order(
					token,
					&CreateOrderBody {
						customer: customer.id,
						products: product_ids,
					},
				)
				.await?,
		)?
		.order;
		self.store.track(EntityKind::Order, &order.id).await;
		tracing::debug!(order_id = %order.id, "draft order created");

		if spec.target == OrderStatus::Draft {
			return Ok(order);
		}

		order = self.schedule_delivery(token, &order.id).await?;
		if let Some(manager_id) = spec.manager.as_deref().or(self.managers.first().map(String::as_str)) {
			order = self.assign_manager(token, &order.id, manager_id).await?;
		} else {
			tracing::debug!(order_id = %order.id, "no manager configured, skipping assignment");
		}

		let route = plan_route(
			spec.target,
			RouteOptions {
				delivery_scheduled: true,
				receive_count: spec.receive.unwrap_or(1),
			},
		);
		for step in route {
			tracing::debug!(order_id = %order.id, ?step, "executing route step");
			order = match step {
				PlanStep::ScheduleDelivery => self.schedule_delivery(token, &order.id).await?,
				PlanStep::SetStatus(status) => self.update_status(token, &order.id, status).await?,
				PlanStep::ReceiveSubset(count) => {
					let ids: Vec<String> =
						order.unreceived_product_ids().into_iter().take(count).collect();
					self.receive(token, &order.id, &ids).await?
				}
				PlanStep::ReceiveRemaining => {
					let ids = order.unreceived_product_ids();
					self.receive(token, &order.id, &ids).await?
				}
			};
		}

		tracing::info!(order_id = %order.id, status = %order.status, "order built");
		Ok(order)
	}

	/// A draft order with the given product count, no delivery scheduled.
	pub async fn create_draft_order(
		&self,
		token: &str,
		products: usize,
	) -> Result<Order, OrchestratorError> {
		self.build_order(token, &OrderSpec::new(OrderStatus::Draft, products))
			.await
	}

	/// A draft order that already has a delivery scheduled.
	pub async fn create_order_with_delivery(
		&self,
		token: &str,
		products: usize,
	) -> Result<Order, OrchestratorError> {
		let order = self.create_draft_order(token, products).await?;
		self.schedule_delivery(token, &order.id).await
	}

	/// An order in In Process status.
	pub async fn create_order_in_process(
		&self,
		token: &str,
		products: usize,
	) -> Result<Order, OrchestratorError> {
		self.build_order(token, &OrderSpec::new(OrderStatus::InProcess, products))
			.await
	}

	/// A canceled order.
	pub async fn create_canceled_order(
		&self,
		token: &str,
		products: usize,
	) -> Result<Order, OrchestratorError> {
		self.build_order(token, &OrderSpec::new(OrderStatus::Canceled, products))
			.await
	}

	/// A partially received order: `receive_count` of `products` received.
	pub async fn create_partially_received_order(
		&self,
		token: &str,
		products: usize,
		receive_count: usize,
	) -> Result<Order, OrchestratorError> {
		let mut spec = OrderSpec::new(OrderStatus::PartiallyReceived, products);
		spec.receive = Some(receive_count);
		self.build_order(token, &spec).await
	}

	/// A fully received order.
	pub async fn create_received_order(
		&self,
		token: &str,
		products: usize,
	) -> Result<Order, OrchestratorError> {
		self.build_order(token, &OrderSpec::new(OrderStatus::Received, products))
			.await
	}

	/// Fetches an order by id.
	pub async fn get_order(&self, token: &str, order_id: &str) -> Result<Order, OrchestratorError> {
		Ok(accept(
			"get_order",
			status_codes::OK,
			self.client.get_order(token, order_id).await?,
		)?
		.order)
	}

	/// Replaces the order's customer and/or product set.
	pub async fn update_order(
		&self,
		token: &str,
		order_id: &str,
		body: &UpdateOrderBody,
	) -> Result<Order, OrchestratorError> {
		Ok(accept(
			"update_order",
			status_codes::OK,
			self.client.update_order(token, order_id, body).await?,
		)?
		.order)
	}

	/// Requests a direct status transition.
	pub async fn update_status(
		&self,
		token: &str,
		order_id: &str,
		status: OrderStatus,
	) -> Result<Order, OrchestratorError> {
		Ok(accept(
			"update_order_status",
			status_codes::OK,
			self.client.update_order_status(token, order_id, status).await?,
		)?
		.order)
	}

	/// Receives the given products.
	pub async fn receive(
		&self,
		token: &str,
		order_id: &str,
		product_ids: &[String],
	) -> Result<Order, OrchestratorError> {
		Ok(accept(
			"receive_products",
			status_codes::OK,
			self.client.receive_products(token, order_id, product_ids).await?,
		)?
		.order)
	}

	/// Schedules (or reschedules) a generated delivery for the order.
	pub async fn schedule_delivery(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<Order, OrchestratorError> {
		Ok(accept(
			"schedule_delivery",
			status_codes::OK,
			self.client
				.schedule_delivery(token, order_id, &generators::delivery_data())
				.await?,
		)?
		.order)
	}

	/// Assigns a manager to the order.
	pub async fn assign_manager(
		&self,
		token: &str,
		order_id: &str,
		manager_id: &str,
	) -> Result<Order, OrchestratorError> {
		Ok(accept(
			"assign_manager",
			status_codes::OK,
			self.client.assign_manager(token, order_id, manager_id).await?,
		)?
		.order)
	}

	/// Removes the order's assigned manager.
	pub async fn unassign_manager(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<Order, OrchestratorError> {
		Ok(accept(
			"unassign_manager",
			status_codes::OK,
			self.client.unassign_manager(token, order_id).await?,
		)?
		.order)
	}

	/// Adds a comment; generates a valid text when none is given.
	pub async fn add_comment(
		&self,
		token: &str,
		order_id: &str,
		text: Option<&str>,
	) -> Result<Order, OrchestratorError> {
		let generated;
		let text = match text {
			Some(text) => text,
			None => {
				generated = generators::comment_text();
				&generated
			}
		};
		Ok(accept(
			"add_comment",
			status_codes::OK,
			self.client.add_comment(token, order_id, text).await?,
		)?
		.order)
	}

	/// Deletes a comment from the order.
	pub async fn delete_comment(
		&self,
		token: &str,
		order_id: &str,
		comment_id: &str,
	) -> Result<(), OrchestratorError> {
		accept_empty(
			"delete_comment",
			status_codes::DELETED,
			self.client.delete_comment(token, order_id, comment_id).await?,
		)
	}

	/// Deletes an order and removes it from the tracking store.
	pub async fn delete_order(&self, token: &str, order_id: &str) -> Result<(), OrchestratorError> {
		accept_empty(
			"delete_order",
			status_codes::DELETED,
			self.client.delete_order(token, order_id).await?,
		)?;
		self.store.untrack(EntityKind::Order, order_id).await;
		Ok(())
	}

	/// Deletes an order together with its customer and products.
	///
	/// The order goes first so the referential constraints release, then
	/// the customer and each product. Every deleted id is untracked, so a
	/// later full teardown never re-attempts them.
	pub async fn delete_order_cascade(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<(), OrchestratorError> {
		let order = self.get_order(token, order_id).await?;
		self.delete_order(token, order_id).await?;

		accept_empty(
			"delete_customer",
			status_codes::DELETED,
			self.client.delete_customer(token, &order.customer.id).await?,
		)?;
		self.store
			.untrack(EntityKind::Customer, &order.customer.id)
			.await;

		for product_id in order.product_ids() {
			accept_empty(
				"delete_product",
				status_codes::DELETED,
				self.client.delete_product(token, &product_id).await?,
			)?;
			self.store
				.untrack(EntityKind::Product, &product_id)
				.await;
		}
		tracing::info!(order_id, "order deleted with its customer and products");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::state::expected_rejection;
	use portal_client::MockPortal;
	use portal_types::EntityKind;

	const TOKEN: &str = "test-token";
	const MANAGER: &str = "manager-1";

	fn orchestrator() -> (Arc<MockPortal>, OrderOrchestrator) {
		let portal = Arc::new(MockPortal::with_managers([MANAGER]));
		let store = Arc::new(EntityStore::new());
		let orchestrator =
			OrderOrchestrator::new(portal.clone(), store, vec![MANAGER.to_string()]);
		(portal, orchestrator)
	}

	#[tokio::test]
	async fn test_draft_build_tracks_everything() {
		let (_, orchestrator) = orchestrator();
		let order = orchestrator.create_draft_order(TOKEN, 2).await.unwrap();

		assert_eq!(order.status, OrderStatus::Draft);
		assert!(order.delivery.is_none());
		assert_eq!(order.products.len(), 2);

		let store = orchestrator.store();
		assert_eq!(store.ids(EntityKind::Order).await, vec![order.id.clone()]);
		assert_eq!(store.ids(EntityKind::Customer).await.len(), 1);
		assert_eq!(store.ids(EntityKind::Product).await.len(), 2);
	}

	#[tokio::test]
	async fn test_in_process_build() {
		let (_, orchestrator) = orchestrator();
		let order = orchestrator.create_order_in_process(TOKEN, 1).await.unwrap();

		assert_eq!(order.status, OrderStatus::InProcess);
		assert!(order.delivery.is_some());
		assert_eq!(
			order.assigned_manager.as_ref().map(|m| m.id.as_str()),
			Some(MANAGER)
		);
	}

	#[tokio::test]
	async fn test_canceled_build() {
		let (_, orchestrator) = orchestrator();
		let order = orchestrator.create_canceled_order(TOKEN, 1).await.unwrap();
		assert_eq!(order.status, OrderStatus::Canceled);
	}

	#[tokio::test]
	async fn test_partially_received_five_products_receive_three() {
		let (_, orchestrator) = orchestrator();
		let order = orchestrator
			.create_partially_received_order(TOKEN, 5, 3)
			.await
			.unwrap();

		assert_eq!(order.status, OrderStatus::PartiallyReceived);
		assert_eq!(order.received_count(), 3);
		assert_eq!(order.unreceived_product_ids().len(), 2);
	}

	#[tokio::test]
	async fn test_received_build() {
		let (_, orchestrator) = orchestrator();
		let order = orchestrator.create_received_order(TOKEN, 3).await.unwrap();
		assert_eq!(order.status, OrderStatus::Received);
		assert!(order.is_fully_received());
	}

	#[tokio::test]
	async fn test_received_flags_stay_monotonic() {
		let (_, orchestrator) = orchestrator();
		let order = orchestrator
			.create_partially_received_order(TOKEN, 3, 1)
			.await
			.unwrap();
		let received_first = order
			.products
			.iter()
			.find(|p| p.received)
			.unwrap()
			.id
			.clone();

		let rest = order.unreceived_product_ids();
		let finished = orchestrator.receive(TOKEN, &order.id, &rest).await.unwrap();
		assert!(finished
			.products
			.iter()
			.find(|p| p.id == received_first)
			.unwrap()
			.received);
		assert!(finished.is_fully_received());
	}

	#[tokio::test]
	async fn test_partial_target_needs_two_products() {
		let (_, orchestrator) = orchestrator();
		let err = orchestrator
			.create_partially_received_order(TOKEN, 1, 1)
			.await
			.unwrap_err();
		assert!(matches!(err, OrchestratorError::InvalidSpec(_)));

		let err = orchestrator
			.create_partially_received_order(TOKEN, 3, 3)
			.await
			.unwrap_err();
		assert!(matches!(err, OrchestratorError::InvalidSpec(_)));
	}

	#[tokio::test]
	async fn test_illegal_transition_surfaces_backend_message() {
		let (_, orchestrator) = orchestrator();
		let order = orchestrator.create_received_order(TOKEN, 1).await.unwrap();

		let err = orchestrator
			.update_status(TOKEN, &order.id, OrderStatus::Draft)
			.await
			.unwrap_err();
		match err {
			OrchestratorError::Rejected { status, message, .. } => {
				assert_eq!(status, status_codes::BAD_REQUEST);
				assert_eq!(
					Some(message.as_str()),
					expected_rejection(OrderStatus::Received, OrderStatus::Draft)
				);
			}
			other => panic!("expected rejection, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_failed_build_keeps_created_ids_tracked() {
		let (_, orchestrator) = orchestrator();
		let mut spec = OrderSpec::new(OrderStatus::InProcess, 1);
		spec.manager = Some("no-such-manager".to_string());

		let err = orchestrator.build_order(TOKEN, &spec).await.unwrap_err();
		assert!(matches!(err, OrchestratorError::Rejected { .. }));

		let counts = orchestrator.store().counts().await;
		assert_eq!(counts[&EntityKind::Order], 1);
		assert_eq!(counts[&EntityKind::Customer], 1);
		assert_eq!(counts[&EntityKind::Product], 1);
	}

	#[tokio::test]
	async fn test_manager_lifecycle_and_comments() {
		let (_, orchestrator) = orchestrator();
		let order = orchestrator.create_draft_order(TOKEN, 1).await.unwrap();

		let assigned = orchestrator
			.assign_manager(TOKEN, &order.id, MANAGER)
			.await
			.unwrap();
		assert!(assigned.assigned_manager.is_some());
		let unassigned = orchestrator.unassign_manager(TOKEN, &order.id).await.unwrap();
		assert!(unassigned.assigned_manager.is_none());

		let commented = orchestrator.add_comment(TOKEN, &order.id, None).await.unwrap();
		assert_eq!(commented.comments.len(), 1);
		orchestrator
			.delete_comment(TOKEN, &order.id, &commented.comments[0].id)
			.await
			.unwrap();
		let fetched = orchestrator.get_order(TOKEN, &order.id).await.unwrap();
		assert!(fetched.comments.is_empty());
	}

	#[tokio::test]
	async fn test_cascade_delete_untracks_everything() {
		let (portal, orchestrator) = orchestrator();
		let order = orchestrator.create_draft_order(TOKEN, 2).await.unwrap();

		orchestrator
			.delete_order_cascade(TOKEN, &order.id)
			.await
			.unwrap();

		let counts = orchestrator.store().counts().await;
		assert!(counts.values().all(|&count| count == 0));
		assert_eq!(portal.order_count().await, 0);
		assert_eq!(portal.customer_and_product_count().await, (0, 0));
	}
}
