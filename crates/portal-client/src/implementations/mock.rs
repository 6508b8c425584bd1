//! In-memory mock of the Sales Portal backend.
//!
//! Implements the portal's actual rules — status transition guards,
//! derived receive statuses, history appending, total recalculation, and
//! referential delete constraints — with the exact rejection strings the
//! live backend returns, so orchestration and cleanup logic can be tested
//! without a running portal.
//!
//! The mock also records every mutating call, letting tests assert on
//! teardown ordering.

use async_trait::async_trait;
use chrono::Utc;
use portal_types::{
	messages, ApiResponse, Comment, CreateOrderBody, Customer, CustomerBody, CustomerPayload,
	DeliveryData, EmptyPayload, HistoryAction, HistoryEntry, Manager, Order, OrderPayload,
	OrderProduct, OrderStatus, Product, ProductBody, ProductPayload, ResponseBody,
	UpdateOrderBody,
};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{ClientError, PortalClient};

use portal_types::api::status_codes::{BAD_REQUEST, CREATED, DELETED, NOT_FOUND, OK};

const UNAUTHORIZED: u16 = 401;

/// One recorded mutating call, for ordering assertions in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
	/// Operation name, e.g. `delete_order`.
	pub op: &'static str,
	/// Primary entity id the call targeted.
	pub id: String,
}

#[derive(Default)]
struct PortalState {
	orders: HashMap<String, Order>,
	customers: HashMap<String, Customer>,
	products: HashMap<String, Product>,
	managers: HashMap<String, Manager>,
	calls: Vec<RecordedCall>,
}

/// In-memory Sales Portal test double.
#[derive(Default)]
pub struct MockPortal {
	state: Mutex<PortalState>,
}

fn new_id() -> String {
	Uuid::new_v4().simple().to_string()
}

fn now() -> String {
	Utc::now().format("%Y/%m/%d %H:%M:%S").to_string()
}

fn ok_order(order: Order) -> ApiResponse<OrderPayload> {
	ApiResponse {
		status: OK,
		body: ResponseBody::success(OrderPayload { order }),
	}
}

fn reject<T>(status: u16, message: impl Into<String>) -> ApiResponse<T> {
	ApiResponse {
		status,
		body: ResponseBody::rejection(message),
	}
}

fn deleted() -> ApiResponse<EmptyPayload> {
	ApiResponse {
		status: DELETED,
		body: ResponseBody {
			is_success: true,
			error_message: None,
			payload: None,
		},
	}
}

/// Appends a history snapshot of the order's current state.
fn push_history(order: &mut Order, action: HistoryAction) {
	order.history.push(HistoryEntry {
		status: order.status,
		action,
		customer: order.customer.id.clone(),
		products: order.products.clone(),
		total_price: order.total_price,
		delivery: order.delivery.clone(),
		assigned_manager: order.assigned_manager.clone(),
		changed_on: now(),
	});
}

impl MockPortal {
	pub fn new() -> Self {
		Self::default()
	}

	/// A mock seeded with the given manager ids available for assignment.
	pub fn with_managers<I, S>(manager_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut state = PortalState::default();
		for id in manager_ids {
			let id = id.into();
			state.managers.insert(
				id.clone(),
				Manager {
					id: id.clone(),
					username: format!("manager.{id}"),
					first_name: "Test".into(),
					last_name: "Manager".into(),
					roles: vec!["USER".into()],
				},
			);
		}
		Self {
			state: Mutex::new(state),
		}
	}

	/// Snapshot of the recorded mutating calls, in invocation order.
	pub async fn call_log(&self) -> Vec<RecordedCall> {
		self.state.lock().await.calls.clone()
	}

	/// Remaining live orders, for teardown assertions.
	pub async fn order_count(&self) -> usize {
		self.state.lock().await.orders.len()
	}

	/// Remaining live customers plus products, for teardown assertions.
	pub async fn customer_and_product_count(&self) -> (usize, usize) {
		let state = self.state.lock().await;
		(state.customers.len(), state.products.len())
	}

	fn authorized(token: &str) -> bool {
		!token.trim().is_empty()
	}

	fn record(state: &mut PortalState, op: &'static str, id: &str) {
		state.calls.push(RecordedCall {
			op,
			id: id.to_string(),
		});
	}
}

#[async_trait]
impl PortalClient for MockPortal {
	async fn create_order(
		&self,
		token: &str,
		body: &CreateOrderBody,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		if body.products.is_empty() || body.products.len() > 5 {
			return Ok(reject(BAD_REQUEST, messages::BAD_REQUEST_BODY));
		}
		let Some(customer) = state.customers.get(&body.customer).cloned() else {
			return Ok(reject(
				BAD_REQUEST,
				messages::customer_not_found(&body.customer),
			));
		};
		let mut products = Vec::with_capacity(body.products.len());
		for product_id in &body.products {
			let Some(product) = state.products.get(product_id) else {
				return Ok(reject(BAD_REQUEST, messages::product_not_found(product_id)));
			};
			products.push(OrderProduct {
				id: product.id.clone(),
				name: product.name.clone(),
				amount: product.amount,
				price: product.price,
				manufacturer: product.manufacturer.clone(),
				notes: product.notes.clone(),
				received: false,
			});
		}

		let total_price = products.iter().map(|p| p.price as f64).sum();
		let mut order = Order {
			id: new_id(),
			status: OrderStatus::Draft,
			customer,
			products,
			delivery: None,
			total_price,
			created_on: now(),
			comments: Vec::new(),
			history: Vec::new(),
			assigned_manager: None,
		};
		push_history(&mut order, HistoryAction::Created);

		Self::record(&mut state, "create_order", &order.id);
		state.orders.insert(order.id.clone(), order.clone());
		Ok(ApiResponse {
			status: CREATED,
			body: ResponseBody::success(OrderPayload { order }),
		})
	}

	async fn get_order(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let state = self.state.lock().await;
		match state.orders.get(order_id) {
			Some(order) => Ok(ok_order(order.clone())),
			None => Ok(reject(NOT_FOUND, messages::order_not_found(order_id))),
		}
	}

	async fn update_order(
		&self,
		token: &str,
		order_id: &str,
		body: &UpdateOrderBody,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		let Some(mut order) = state.orders.get(order_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::order_not_found(order_id)));
		};

		if let Some(customer_id) = &body.customer {
			let Some(customer) = state.customers.get(customer_id).cloned() else {
				return Ok(reject(
					BAD_REQUEST,
					messages::customer_not_found(customer_id),
				));
			};
			if customer.id != order.customer.id {
				order.customer = customer;
				push_history(&mut order, HistoryAction::CustomerChanged);
			}
		}

		if let Some(product_ids) = &body.products {
			if product_ids.is_empty() || product_ids.len() > 5 {
				return Ok(reject(BAD_REQUEST, messages::BAD_REQUEST_BODY));
			}
			let mut requested: Vec<String> = product_ids.clone();
			requested.sort();
			let mut current: Vec<String> = order.products.iter().map(|p| p.id.clone()).collect();
			current.sort();

			// History and totals only move when the set actually changes.
			if requested != current {
				let mut products = Vec::with_capacity(product_ids.len());
				for product_id in product_ids {
					let Some(product) = state.products.get(product_id) else {
						return Ok(reject(
							BAD_REQUEST,
							messages::product_not_found(product_id),
						));
					};
					products.push(OrderProduct {
						id: product.id.clone(),
						name: product.name.clone(),
						amount: product.amount,
						price: product.price,
						manufacturer: product.manufacturer.clone(),
						notes: product.notes.clone(),
						received: false,
					});
				}
				order.products = products;
				order.total_price = order.products.iter().map(|p| p.price as f64).sum();
				push_history(&mut order, HistoryAction::RequiredProductsChanged);
			}
		}

		Self::record(&mut state, "update_order", order_id);
		state.orders.insert(order.id.clone(), order.clone());
		Ok(ok_order(order))
	}

	async fn delete_order(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;
		Self::record(&mut state, "delete_order", order_id);
		match state.orders.remove(order_id) {
			Some(_) => Ok(deleted()),
			None => Ok(reject(NOT_FOUND, messages::order_not_found(order_id))),
		}
	}

	async fn update_order_status(
		&self,
		token: &str,
		order_id: &str,
		status: OrderStatus,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		let Some(mut order) = state.orders.get(order_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::order_not_found(order_id)));
		};

		let action = match status {
			// Setting Draft is only meaningful as a reopen of a canceled
			// order.
			OrderStatus::Draft => {
				if order.status != OrderStatus::Canceled {
					return Ok(reject(BAD_REQUEST, messages::CANT_REOPEN));
				}
				HistoryAction::Reopened
			}
			OrderStatus::InProcess => {
				if order.status != OrderStatus::Draft {
					return Ok(reject(BAD_REQUEST, messages::INVALID_ORDER_STATUS));
				}
				if order.delivery.is_none() {
					return Ok(reject(BAD_REQUEST, messages::CANT_PROCESS));
				}
				HistoryAction::Processed
			}
			OrderStatus::Canceled => {
				if !matches!(order.status, OrderStatus::Draft | OrderStatus::InProcess) {
					return Ok(reject(BAD_REQUEST, messages::INVALID_ORDER_STATUS));
				}
				HistoryAction::Canceled
			}
			// Receive statuses are derived by the receive operation, never
			// set directly.
			OrderStatus::PartiallyReceived | OrderStatus::Received => {
				return Ok(reject(BAD_REQUEST, messages::INVALID_ORDER_STATUS));
			}
		};

		order.status = status;
		push_history(&mut order, action);
		Self::record(&mut state, "update_order_status", order_id);
		state.orders.insert(order.id.clone(), order.clone());
		Ok(ok_order(order))
	}

	async fn receive_products(
		&self,
		token: &str,
		order_id: &str,
		product_ids: &[String],
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		let Some(mut order) = state.orders.get(order_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::order_not_found(order_id)));
		};
		if !matches!(
			order.status,
			OrderStatus::InProcess | OrderStatus::PartiallyReceived
		) {
			return Ok(reject(BAD_REQUEST, messages::INVALID_ORDER_STATUS));
		}
		if product_ids.is_empty() || product_ids.len() > 5 {
			return Ok(reject(BAD_REQUEST, messages::BAD_REQUEST_BODY));
		}
		for product_id in product_ids {
			let requested = order
				.products
				.iter()
				.any(|p| &p.id == product_id && !p.received);
			if !requested {
				return Ok(reject(
					BAD_REQUEST,
					messages::product_not_requested(product_id),
				));
			}
		}

		for product in &mut order.products {
			if product_ids.contains(&product.id) {
				product.received = true;
			}
		}
		let all_received = order.products.iter().all(|p| p.received);
		order.status = if all_received {
			OrderStatus::Received
		} else {
			OrderStatus::PartiallyReceived
		};
		let action = if all_received {
			HistoryAction::ReceivedAll
		} else {
			HistoryAction::Received
		};
		push_history(&mut order, action);

		Self::record(&mut state, "receive_products", order_id);
		state.orders.insert(order.id.clone(), order.clone());
		Ok(ok_order(order))
	}

	async fn schedule_delivery(
		&self,
		token: &str,
		order_id: &str,
		delivery: &DeliveryData,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		let Some(mut order) = state.orders.get(order_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::order_not_found(order_id)));
		};
		let action = if order.delivery.is_some() {
			HistoryAction::DeliveryEdited
		} else {
			HistoryAction::DeliveryScheduled
		};
		order.delivery = Some(delivery.clone());
		push_history(&mut order, action);

		Self::record(&mut state, "schedule_delivery", order_id);
		state.orders.insert(order.id.clone(), order.clone());
		Ok(ok_order(order))
	}

	async fn assign_manager(
		&self,
		token: &str,
		order_id: &str,
		manager_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		let Some(manager) = state.managers.get(manager_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::manager_not_found(manager_id)));
		};
		let Some(mut order) = state.orders.get(order_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::order_not_found(order_id)));
		};
		order.assigned_manager = Some(manager);
		push_history(&mut order, HistoryAction::ManagerAssigned);

		Self::record(&mut state, "assign_manager", order_id);
		state.orders.insert(order.id.clone(), order.clone());
		Ok(ok_order(order))
	}

	async fn unassign_manager(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		let Some(mut order) = state.orders.get(order_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::order_not_found(order_id)));
		};
		order.assigned_manager = None;
		push_history(&mut order, HistoryAction::ManagerUnassigned);

		Self::record(&mut state, "unassign_manager", order_id);
		state.orders.insert(order.id.clone(), order.clone());
		Ok(ok_order(order))
	}

	async fn add_comment(
		&self,
		token: &str,
		order_id: &str,
		text: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		if text.is_empty() || text.len() > 250 || text.contains('<') || text.contains('>') {
			return Ok(reject(BAD_REQUEST, messages::BAD_REQUEST_BODY));
		}
		let Some(mut order) = state.orders.get(order_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::order_not_found(order_id)));
		};
		order.comments.push(Comment {
			id: new_id(),
			text: text.to_string(),
			created_on: now(),
		});

		Self::record(&mut state, "add_comment", order_id);
		state.orders.insert(order.id.clone(), order.clone());
		Ok(ok_order(order))
	}

	async fn delete_comment(
		&self,
		token: &str,
		order_id: &str,
		comment_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		let Some(mut order) = state.orders.get(order_id).cloned() else {
			return Ok(reject(NOT_FOUND, messages::order_not_found(order_id)));
		};
		let before = order.comments.len();
		order.comments.retain(|c| c.id != comment_id);
		if order.comments.len() == before {
			return Ok(reject(BAD_REQUEST, messages::COMMENT_NOT_FOUND));
		}

		Self::record(&mut state, "delete_comment", order_id);
		state.orders.insert(order.id.clone(), order);
		Ok(deleted())
	}

	async fn create_customer(
		&self,
		token: &str,
		body: &CustomerBody,
	) -> Result<ApiResponse<CustomerPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		let customer = Customer {
			id: new_id(),
			email: body.email.clone(),
			name: body.name.clone(),
			country: body.country.clone(),
			city: body.city.clone(),
			street: body.street.clone(),
			house: body.house,
			flat: body.flat,
			phone: body.phone.clone(),
			created_on: now(),
			notes: body.notes.clone().unwrap_or_default(),
		};
		Self::record(&mut state, "create_customer", &customer.id);
		state.customers.insert(customer.id.clone(), customer.clone());
		Ok(ApiResponse {
			status: CREATED,
			body: ResponseBody::success(CustomerPayload { customer }),
		})
	}

	async fn delete_customer(
		&self,
		token: &str,
		customer_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;
		Self::record(&mut state, "delete_customer", customer_id);

		let referenced = state
			.orders
			.values()
			.any(|order| order.customer.id == customer_id);
		if referenced {
			return Ok(reject(
				BAD_REQUEST,
				format!("Customer with id '{customer_id}' is used in an order"),
			));
		}
		match state.customers.remove(customer_id) {
			Some(_) => Ok(deleted()),
			None => Ok(reject(NOT_FOUND, messages::customer_not_found(customer_id))),
		}
	}

	async fn create_product(
		&self,
		token: &str,
		body: &ProductBody,
	) -> Result<ApiResponse<ProductPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;

		if state.products.values().any(|p| p.name == body.name) {
			return Ok(reject(
				BAD_REQUEST,
				format!("Product with name '{}' already exists", body.name),
			));
		}
		let product = Product {
			id: new_id(),
			name: body.name.clone(),
			amount: body.amount,
			price: body.price,
			manufacturer: body.manufacturer.clone(),
			created_on: now(),
			notes: body.notes.clone().unwrap_or_default(),
		};
		Self::record(&mut state, "create_product", &product.id);
		state.products.insert(product.id.clone(), product.clone());
		Ok(ApiResponse {
			status: CREATED,
			body: ResponseBody::success(ProductPayload { product }),
		})
	}

	async fn delete_product(
		&self,
		token: &str,
		product_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError> {
		if !Self::authorized(token) {
			return Ok(reject(UNAUTHORIZED, messages::NOT_AUTHORIZED));
		}
		let mut state = self.state.lock().await;
		Self::record(&mut state, "delete_product", product_id);

		let referenced = state
			.orders
			.values()
			.any(|order| order.products.iter().any(|p| p.id == product_id));
		if referenced {
			return Ok(reject(
				BAD_REQUEST,
				format!("Product with id '{product_id}' is used in an order"),
			));
		}
		match state.products.remove(product_id) {
			Some(_) => Ok(deleted()),
			None => Ok(reject(NOT_FOUND, messages::product_not_found(product_id))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use portal_types::generators;

	const TOKEN: &str = "test-token";

	async fn order_with_products(portal: &MockPortal, count: usize) -> Order {
		let customer = portal
			.create_customer(TOKEN, &generators::customer_body())
			.await
			.unwrap()
			.body
			.payload
			.unwrap()
			.customer;
		let mut product_ids = Vec::new();
		for _ in 0..count {
			let product = portal
				.create_product(TOKEN, &generators::product_body())
				.await
				.unwrap()
				.body
				.payload
				.unwrap()
				.product;
			product_ids.push(product.id);
		}
		portal
			.create_order(
				TOKEN,
				&CreateOrderBody {
					customer: customer.id,
					products: product_ids,
				},
			)
			.await
			.unwrap()
			.body
			.payload
			.unwrap()
			.order
	}

	#[tokio::test]
	async fn test_draft_to_in_process_requires_delivery() {
		let portal = MockPortal::new();
		let order = order_with_products(&portal, 1).await;

		let rejected = portal
			.update_order_status(TOKEN, &order.id, OrderStatus::InProcess)
			.await
			.unwrap();
		assert_eq!(rejected.status, BAD_REQUEST);
		assert_eq!(
			rejected.body.error_message.as_deref(),
			Some(messages::CANT_PROCESS)
		);

		portal
			.schedule_delivery(TOKEN, &order.id, &generators::delivery_data())
			.await
			.unwrap();
		let accepted = portal
			.update_order_status(TOKEN, &order.id, OrderStatus::InProcess)
			.await
			.unwrap();
		assert_eq!(accepted.status, OK);
		assert_eq!(
			accepted.body.payload.unwrap().order.status,
			OrderStatus::InProcess
		);
	}

	#[tokio::test]
	async fn test_draft_cancel_needs_no_delivery() {
		let portal = MockPortal::new();
		let order = order_with_products(&portal, 1).await;

		let canceled = portal
			.update_order_status(TOKEN, &order.id, OrderStatus::Canceled)
			.await
			.unwrap();
		assert_eq!(canceled.status, OK);
		assert_eq!(
			canceled.body.payload.unwrap().order.status,
			OrderStatus::Canceled
		);
	}

	#[tokio::test]
	async fn test_reopen_only_from_canceled() {
		let portal = MockPortal::new();
		let order = order_with_products(&portal, 1).await;

		let rejected = portal
			.update_order_status(TOKEN, &order.id, OrderStatus::Draft)
			.await
			.unwrap();
		assert_eq!(
			rejected.body.error_message.as_deref(),
			Some(messages::CANT_REOPEN)
		);

		portal
			.update_order_status(TOKEN, &order.id, OrderStatus::Canceled)
			.await
			.unwrap();
		let reopened = portal
			.update_order_status(TOKEN, &order.id, OrderStatus::Draft)
			.await
			.unwrap();
		assert_eq!(
			reopened.body.payload.unwrap().order.status,
			OrderStatus::Draft
		);
	}

	#[tokio::test]
	async fn test_receive_derives_status() {
		let portal = MockPortal::new();
		let order = order_with_products(&portal, 3).await;
		portal
			.schedule_delivery(TOKEN, &order.id, &generators::delivery_data())
			.await
			.unwrap();
		portal
			.update_order_status(TOKEN, &order.id, OrderStatus::InProcess)
			.await
			.unwrap();

		let ids = order.product_ids();
		let partial = portal
			.receive_products(TOKEN, &order.id, &ids[..1])
			.await
			.unwrap()
			.body
			.payload
			.unwrap()
			.order;
		assert_eq!(partial.status, OrderStatus::PartiallyReceived);
		assert_eq!(partial.received_count(), 1);

		let full = portal
			.receive_products(TOKEN, &order.id, &ids[1..])
			.await
			.unwrap()
			.body
			.payload
			.unwrap()
			.order;
		assert_eq!(full.status, OrderStatus::Received);
		assert!(full.is_fully_received());
	}

	#[tokio::test]
	async fn test_receive_rejects_already_received_product() {
		let portal = MockPortal::new();
		let order = order_with_products(&portal, 2).await;
		portal
			.schedule_delivery(TOKEN, &order.id, &generators::delivery_data())
			.await
			.unwrap();
		portal
			.update_order_status(TOKEN, &order.id, OrderStatus::InProcess)
			.await
			.unwrap();

		let ids = order.product_ids();
		portal
			.receive_products(TOKEN, &order.id, &ids[..1])
			.await
			.unwrap();
		let rejected = portal
			.receive_products(TOKEN, &order.id, &ids[..1])
			.await
			.unwrap();
		assert_eq!(rejected.status, BAD_REQUEST);
		assert_eq!(
			rejected.body.error_message,
			Some(messages::product_not_requested(&ids[0]))
		);
	}

	#[tokio::test]
	async fn test_delete_customer_blocked_while_order_exists() {
		let portal = MockPortal::new();
		let order = order_with_products(&portal, 1).await;

		let blocked = portal
			.delete_customer(TOKEN, &order.customer.id)
			.await
			.unwrap();
		assert_eq!(blocked.status, BAD_REQUEST);

		portal.delete_order(TOKEN, &order.id).await.unwrap();
		let allowed = portal
			.delete_customer(TOKEN, &order.customer.id)
			.await
			.unwrap();
		assert_eq!(allowed.status, DELETED);
	}

	#[tokio::test]
	async fn test_update_order_history_only_on_product_change() {
		let portal = MockPortal::new();
		let order = order_with_products(&portal, 2).await;
		let history_len = order.history.len();

		// Same product set, no change recorded.
		let same = portal
			.update_order(
				TOKEN,
				&order.id,
				&UpdateOrderBody {
					customer: None,
					products: Some(order.product_ids()),
				},
			)
			.await
			.unwrap()
			.body
			.payload
			.unwrap()
			.order;
		assert_eq!(same.history.len(), history_len);

		let replacement = portal
			.create_product(TOKEN, &generators::product_body())
			.await
			.unwrap()
			.body
			.payload
			.unwrap()
			.product;
		let changed = portal
			.update_order(
				TOKEN,
				&order.id,
				&UpdateOrderBody {
					customer: None,
					products: Some(vec![replacement.id.clone()]),
				},
			)
			.await
			.unwrap()
			.body
			.payload
			.unwrap()
			.order;
		assert_eq!(changed.history.len(), history_len + 1);
		assert_eq!(changed.total_price, replacement.price as f64);
	}

	#[tokio::test]
	async fn test_comment_validation() {
		let portal = MockPortal::new();
		let order = order_with_products(&portal, 1).await;

		let rejected = portal
			.add_comment(TOKEN, &order.id, "contains <angle> brackets")
			.await
			.unwrap();
		assert_eq!(rejected.status, BAD_REQUEST);

		let accepted = portal
			.add_comment(TOKEN, &order.id, "a plain note")
			.await
			.unwrap()
			.body
			.payload
			.unwrap()
			.order;
		assert_eq!(accepted.comments.len(), 1);

		let comment_id = accepted.comments[0].id.clone();
		let removed = portal
			.delete_comment(TOKEN, &order.id, &comment_id)
			.await
			.unwrap();
		assert_eq!(removed.status, DELETED);
	}

	#[tokio::test]
	async fn test_blank_token_is_unauthorized() {
		let portal = MockPortal::new();
		let response = portal.get_order("", "whatever").await.unwrap();
		assert_eq!(response.status, UNAUTHORIZED);
		assert_eq!(
			response.body.error_message.as_deref(),
			Some(messages::NOT_AUTHORIZED)
		);
	}
}
