//! Response envelope types shared by every remote call.
//!
//! The backend wraps every payload in a `{ IsSuccess, ErrorMessage, ... }`
//! body; the harness carries that envelope together with the HTTP status so
//! orchestration steps can validate each hop before proceeding.

use serde::{Deserialize, Serialize};

use crate::{Customer, Order, Product};

/// HTTP status codes the backend uses for the operations the harness
/// drives.
pub mod status_codes {
	pub const OK: u16 = 200;
	pub const CREATED: u16 = 201;
	pub const DELETED: u16 = 204;
	pub const BAD_REQUEST: u16 = 400;
	pub const NOT_FOUND: u16 = 404;
}

/// A remote response: transport status plus the parsed body envelope.
///
/// Backend rejections (4xx) are still values, not errors — the envelope
/// carries the human-readable message tests assert against.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
	/// HTTP status code of the response.
	pub status: u16,
	/// Parsed response body.
	pub body: ResponseBody<T>,
}

impl<T> ApiResponse<T> {
	/// True when the transport status and the body's success flag agree
	/// that the call succeeded.
	pub fn is_ok(&self) -> bool {
		(200..300).contains(&self.status) && self.body.is_success
	}
}

/// The backend's common body envelope around a payload.
///
/// The payload is absent on rejections (the backend only returns
/// `IsSuccess`/`ErrorMessage`) and on 204 deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseBody<T> {
	#[serde(rename = "IsSuccess")]
	pub is_success: bool,
	#[serde(rename = "ErrorMessage")]
	pub error_message: Option<String>,
	#[serde(flatten)]
	pub payload: Option<T>,
}

impl<T> ResponseBody<T> {
	/// A successful envelope around a payload.
	pub fn success(payload: T) -> Self {
		Self {
			is_success: true,
			error_message: None,
			payload: Some(payload),
		}
	}

	/// A rejection envelope carrying the backend's message.
	pub fn rejection(message: impl Into<String>) -> Self {
		Self {
			is_success: false,
			error_message: Some(message.into()),
			payload: None,
		}
	}
}

/// Body payload carrying a single order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
	#[serde(rename = "Order")]
	pub order: Order,
}

/// Body payload carrying a single customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPayload {
	#[serde(rename = "Customer")]
	pub customer: Customer,
}

/// Body payload carrying a single product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPayload {
	#[serde(rename = "Product")]
	pub product: Product,
}

/// Empty payload for delete responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyPayload {}
