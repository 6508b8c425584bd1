//! Product entity and creation payload.

use serde::{Deserialize, Serialize};

/// A product as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
	#[serde(rename = "_id")]
	pub id: String,
	pub name: String,
	pub amount: i64,
	pub price: i64,
	pub manufacturer: String,
	#[serde(rename = "createdOn")]
	pub created_on: String,
	#[serde(default)]
	pub notes: String,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBody {
	pub name: String,
	pub amount: i64,
	pub price: i64,
	pub manufacturer: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}
