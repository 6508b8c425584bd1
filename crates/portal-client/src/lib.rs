//! Remote client module for the Sales Portal harness.
//!
//! This module defines the abstract Sales Portal API surface the
//! orchestration and cleanup layers drive. It provides an HTTP
//! implementation for a live portal and an in-memory mock implementation
//! that enforces the backend's rules, used as the test double.
//!
//! Backend rejections are not transport errors: every call returns the
//! response envelope with the HTTP status, success flag, and error message,
//! so callers can assert on the exact rejection text. [`ClientError`] is
//! reserved for transport-level failures.

use async_trait::async_trait;
use portal_types::{
	ApiResponse, CreateOrderBody, CustomerBody, CustomerPayload, DeliveryData, EmptyPayload,
	OrderPayload, OrderStatus, ProductBody, ProductPayload, UpdateOrderBody,
};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
	pub mod mock;
}

pub use implementations::http::HttpPortalClient;
pub use implementations::mock::MockPortal;

/// Errors that can occur at the transport level of a remote call.
#[derive(Debug, Error)]
pub enum ClientError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a response body cannot be decoded.
	#[error("Decode error: {0}")]
	Decode(String),
	/// Error that occurs when signing in fails.
	#[error("Authentication error: {0}")]
	Auth(String),
}

/// Trait defining the remote Sales Portal API surface.
///
/// One method per backend operation the harness drives. Implementations
/// must not interpret backend rejections as errors; the envelope carries
/// them to the caller.
#[async_trait]
pub trait PortalClient: Send + Sync {
	// Orders

	/// Creates a draft order for a customer over a set of product ids.
	async fn create_order(
		&self,
		token: &str,
		body: &CreateOrderBody,
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Fetches an order by id.
	async fn get_order(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Replaces an order's customer and/or product set.
	async fn update_order(
		&self,
		token: &str,
		order_id: &str,
		body: &UpdateOrderBody,
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Deletes an order.
	async fn delete_order(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError>;

	/// Requests a direct status transition.
	async fn update_order_status(
		&self,
		token: &str,
		order_id: &str,
		status: OrderStatus,
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Marks the given requested products as received. The resulting order
	/// status is derived by the backend.
	async fn receive_products(
		&self,
		token: &str,
		order_id: &str,
		product_ids: &[String],
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Schedules (or edits) the order's delivery.
	async fn schedule_delivery(
		&self,
		token: &str,
		order_id: &str,
		delivery: &DeliveryData,
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Assigns a manager to the order.
	async fn assign_manager(
		&self,
		token: &str,
		order_id: &str,
		manager_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Removes the order's assigned manager.
	async fn unassign_manager(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Appends a comment to the order.
	async fn add_comment(
		&self,
		token: &str,
		order_id: &str,
		text: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError>;

	/// Deletes a comment from the order.
	async fn delete_comment(
		&self,
		token: &str,
		order_id: &str,
		comment_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError>;

	// Customers

	/// Creates a customer.
	async fn create_customer(
		&self,
		token: &str,
		body: &CustomerBody,
	) -> Result<ApiResponse<CustomerPayload>, ClientError>;

	/// Deletes a customer. Rejected while any order still references it.
	async fn delete_customer(
		&self,
		token: &str,
		customer_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError>;

	// Products

	/// Creates a product.
	async fn create_product(
		&self,
		token: &str,
		body: &ProductBody,
	) -> Result<ApiResponse<ProductPayload>, ClientError>;

	/// Deletes a product. Rejected while any order still references it.
	async fn delete_product(
		&self,
		token: &str,
		product_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError>;
}
