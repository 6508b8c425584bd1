//! Customer entity and creation payload.

use serde::{Deserialize, Serialize};

/// A customer as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
	#[serde(rename = "_id")]
	pub id: String,
	pub email: String,
	pub name: String,
	pub country: String,
	pub city: String,
	pub street: String,
	pub house: i64,
	pub flat: i64,
	pub phone: String,
	#[serde(rename = "createdOn")]
	pub created_on: String,
	#[serde(default)]
	pub notes: String,
}

/// Payload for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerBody {
	pub email: String,
	pub name: String,
	pub country: String,
	pub city: String,
	pub street: String,
	pub house: i64,
	pub flat: i64,
	pub phone: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}
