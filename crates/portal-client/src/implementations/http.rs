//! HTTP implementation of the Sales Portal client.
//!
//! Thin reqwest-based transport: bearer auth, JSON bodies, and envelope
//! decoding. Backend rejections come back as data; only network and decode
//! failures surface as [`ClientError`].

use async_trait::async_trait;
use portal_types::{
	ApiResponse, CreateOrderBody, CustomerBody, CustomerPayload, DeliveryData, EmptyPayload,
	OrderPayload, OrderStatus, ProductBody, ProductPayload, ResponseBody, UpdateOrderBody,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

use crate::{ClientError, PortalClient};

/// Reqwest-backed Sales Portal client.
pub struct HttpPortalClient {
	http: reqwest::Client,
	base_url: String,
}

impl HttpPortalClient {
	/// Creates a client for the given portal base URL with a per-request
	/// timeout.
	pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
		let http = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| ClientError::Network(e.to_string()))?;
		let base_url = base_url.into().trim_end_matches('/').to_string();
		Ok(Self { http, base_url })
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	/// Signs in and returns the bearer token the backend hands back in the
	/// `Authorization` response header.
	pub async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
		let response = self
			.http
			.post(self.url("/api/login"))
			.json(&json!({ "username": username, "password": password }))
			.send()
			.await
			.map_err(|e| ClientError::Network(e.to_string()))?;

		let status = response.status().as_u16();
		if !(200..300).contains(&status) {
			return Err(ClientError::Auth(format!("login failed with status {status}")));
		}
		response
			.headers()
			.get("authorization")
			.and_then(|value| value.to_str().ok())
			.map(|value| value.trim_start_matches("Bearer ").to_string())
			.ok_or_else(|| {
				ClientError::Auth("login response carried no Authorization header".into())
			})
	}

	/// Sends one request and decodes the response envelope.
	///
	/// A 204 (or otherwise empty) body is mapped onto a success envelope
	/// with no payload, matching how the backend answers deletes.
	async fn send<T, B>(
		&self,
		method: Method,
		path: &str,
		token: &str,
		body: Option<&B>,
	) -> Result<ApiResponse<T>, ClientError>
	where
		T: DeserializeOwned,
		B: Serialize + ?Sized,
	{
		tracing::debug!(%method, path, "sending portal request");

		let mut request = self
			.http
			.request(method.clone(), self.url(path))
			.bearer_auth(token)
			.header("content-type", "application/json");
		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request
			.send()
			.await
			.map_err(|e| ClientError::Network(e.to_string()))?;
		let status = response.status().as_u16();
		let text = response
			.text()
			.await
			.map_err(|e| ClientError::Network(e.to_string()))?;

		tracing::debug!(%method, path, status, "portal response received");

		let body = if text.trim().is_empty() {
			ResponseBody {
				is_success: (200..300).contains(&status),
				error_message: None,
				payload: None,
			}
		} else {
			serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))?
		};

		Ok(ApiResponse { status, body })
	}
}

#[async_trait]
impl PortalClient for HttpPortalClient {
	async fn create_order(
		&self,
		token: &str,
		body: &CreateOrderBody,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send(Method::POST, "/api/orders", token, Some(body))
			.await
	}

	async fn get_order(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send::<_, ()>(Method::GET, &format!("/api/orders/{order_id}"), token, None)
			.await
	}

	async fn update_order(
		&self,
		token: &str,
		order_id: &str,
		body: &UpdateOrderBody,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send(
			Method::PUT,
			&format!("/api/orders/{order_id}"),
			token,
			Some(body),
		)
		.await
	}

	async fn delete_order(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError> {
		self.send::<_, ()>(
			Method::DELETE,
			&format!("/api/orders/{order_id}"),
			token,
			None,
		)
		.await
	}

	async fn update_order_status(
		&self,
		token: &str,
		order_id: &str,
		status: OrderStatus,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send(
			Method::PUT,
			&format!("/api/orders/{order_id}/status"),
			token,
			Some(&json!({ "status": status })),
		)
		.await
	}

	async fn receive_products(
		&self,
		token: &str,
		order_id: &str,
		product_ids: &[String],
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send(
			Method::POST,
			&format!("/api/orders/{order_id}/receive"),
			token,
			Some(&json!({ "products": product_ids })),
		)
		.await
	}

	async fn schedule_delivery(
		&self,
		token: &str,
		order_id: &str,
		delivery: &DeliveryData,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send(
			Method::POST,
			&format!("/api/orders/{order_id}/delivery"),
			token,
			Some(delivery),
		)
		.await
	}

	async fn assign_manager(
		&self,
		token: &str,
		order_id: &str,
		manager_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send::<_, ()>(
			Method::PUT,
			&format!("/api/orders/{order_id}/assign-manager/{manager_id}"),
			token,
			None,
		)
		.await
	}

	async fn unassign_manager(
		&self,
		token: &str,
		order_id: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send::<_, ()>(
			Method::PUT,
			&format!("/api/orders/{order_id}/unassign-manager"),
			token,
			None,
		)
		.await
	}

	async fn add_comment(
		&self,
		token: &str,
		order_id: &str,
		text: &str,
	) -> Result<ApiResponse<OrderPayload>, ClientError> {
		self.send(
			Method::POST,
			&format!("/api/orders/{order_id}/comments"),
			token,
			Some(&json!({ "comment": text })),
		)
		.await
	}

	async fn delete_comment(
		&self,
		token: &str,
		order_id: &str,
		comment_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError> {
		self.send::<_, ()>(
			Method::DELETE,
			&format!("/api/orders/{order_id}/comments/{comment_id}"),
			token,
			None,
		)
		.await
	}

	async fn create_customer(
		&self,
		token: &str,
		body: &CustomerBody,
	) -> Result<ApiResponse<CustomerPayload>, ClientError> {
		self.send(Method::POST, "/api/customers", token, Some(body))
			.await
	}

	async fn delete_customer(
		&self,
		token: &str,
		customer_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError> {
		self.send::<_, ()>(
			Method::DELETE,
			&format!("/api/customers/{customer_id}"),
			token,
			None,
		)
		.await
	}

	async fn create_product(
		&self,
		token: &str,
		body: &ProductBody,
	) -> Result<ApiResponse<ProductPayload>, ClientError> {
		self.send(Method::POST, "/api/products", token, Some(body))
			.await
	}

	async fn delete_product(
		&self,
		token: &str,
		product_id: &str,
	) -> Result<ApiResponse<EmptyPayload>, ClientError> {
		self.send::<_, ()>(
			Method::DELETE,
			&format!("/api/products/{product_id}"),
			token,
			None,
		)
		.await
	}
}
