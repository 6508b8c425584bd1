//! Order types for the Sales Portal harness.
//!
//! This module defines the order entity as returned by the backend, its
//! status lifecycle, history records, and the payloads used to create and
//! update orders.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Customer, Delivery};

/// A full order as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Backend identifier for this order.
	#[serde(rename = "_id")]
	pub id: String,
	/// Current status of the order.
	pub status: OrderStatus,
	/// Snapshot of the customer the order belongs to.
	pub customer: Customer,
	/// Requested products, each carrying its receive flag.
	pub products: Vec<OrderProduct>,
	/// Scheduled delivery, if any. Presence gates the Draft -> In Process
	/// transition.
	pub delivery: Option<Delivery>,
	/// Server-computed total price over the requested products.
	pub total_price: f64,
	#[serde(rename = "createdOn")]
	pub created_on: String,
	/// Append-only comment list.
	#[serde(default)]
	pub comments: Vec<Comment>,
	/// Append-only transition history.
	#[serde(default)]
	pub history: Vec<HistoryEntry>,
	/// Manager currently assigned to the order, if any.
	#[serde(rename = "assignedManager")]
	pub assigned_manager: Option<Manager>,
}

impl Order {
	/// Ids of all requested products.
	pub fn product_ids(&self) -> Vec<String> {
		self.products.iter().map(|p| p.id.clone()).collect()
	}

	/// Ids of products not yet received.
	pub fn unreceived_product_ids(&self) -> Vec<String> {
		self.products
			.iter()
			.filter(|p| !p.received)
			.map(|p| p.id.clone())
			.collect()
	}

	/// Number of products already received.
	pub fn received_count(&self) -> usize {
		self.products.iter().filter(|p| p.received).count()
	}

	/// True when every requested product has been received.
	pub fn is_fully_received(&self) -> bool {
		!self.products.is_empty() && self.products.iter().all(|p| p.received)
	}
}

/// A product snapshot embedded in an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProduct {
	#[serde(rename = "_id")]
	pub id: String,
	pub name: String,
	pub amount: i64,
	pub price: i64,
	pub manufacturer: String,
	#[serde(default)]
	pub notes: String,
	/// Toggles monotonically from false to true via the receive operation;
	/// never reverts within the order's lifetime.
	pub received: bool,
}

/// An order comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
	#[serde(rename = "_id")]
	pub id: String,
	pub text: String,
	#[serde(rename = "createdOn")]
	pub created_on: String,
}

/// The manager an order can be assigned to (a portal user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manager {
	#[serde(rename = "_id")]
	pub id: String,
	pub username: String,
	#[serde(rename = "firstName")]
	pub first_name: String,
	#[serde(rename = "lastName")]
	pub last_name: String,
	#[serde(default)]
	pub roles: Vec<String>,
}

/// A single entry in an order's transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
	pub status: OrderStatus,
	pub action: HistoryAction,
	/// Customer id at the time of the change.
	pub customer: String,
	pub products: Vec<OrderProduct>,
	pub total_price: f64,
	pub delivery: Option<Delivery>,
	#[serde(rename = "assignedManager")]
	pub assigned_manager: Option<Manager>,
	#[serde(rename = "changedOn")]
	pub changed_on: String,
}

/// Order status lifecycle. Wire strings mirror the backend ORDER_STATUSES
/// enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
	Draft,
	#[serde(rename = "In Process")]
	InProcess,
	#[serde(rename = "Partially Received")]
	PartiallyReceived,
	Received,
	Canceled,
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Draft => write!(f, "Draft"),
			OrderStatus::InProcess => write!(f, "In Process"),
			OrderStatus::PartiallyReceived => write!(f, "Partially Received"),
			OrderStatus::Received => write!(f, "Received"),
			OrderStatus::Canceled => write!(f, "Canceled"),
		}
	}
}

/// History actions recorded by the backend on every order mutation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HistoryAction {
	#[serde(rename = "Order created")]
	Created,
	#[serde(rename = "Customer changed")]
	CustomerChanged,
	#[serde(rename = "Requested products changed")]
	RequiredProductsChanged,
	#[serde(rename = "Order processing started")]
	Processed,
	#[serde(rename = "Delivery Scheduled")]
	DeliveryScheduled,
	#[serde(rename = "Delivery Edited")]
	DeliveryEdited,
	#[serde(rename = "Received")]
	Received,
	#[serde(rename = "All products received")]
	ReceivedAll,
	#[serde(rename = "Order canceled")]
	Canceled,
	#[serde(rename = "Manager Assigned")]
	ManagerAssigned,
	#[serde(rename = "Manager Unassigned")]
	ManagerUnassigned,
	#[serde(rename = "Order reopened")]
	Reopened,
}

/// Payload for creating an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderBody {
	/// Customer id the order is created for.
	pub customer: String,
	/// Product ids requested in the order (1-5).
	pub products: Vec<String>,
}

/// Payload for replacing an order's customer and/or product set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderBody {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub products: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_wire_strings() {
		let json = serde_json::to_string(&OrderStatus::PartiallyReceived).unwrap();
		assert_eq!(json, "\"Partially Received\"");
		let back: OrderStatus = serde_json::from_str("\"In Process\"").unwrap();
		assert_eq!(back, OrderStatus::InProcess);
	}

	#[test]
	fn test_update_body_skips_absent_fields() {
		let body = UpdateOrderBody {
			customer: Some("c1".into()),
			products: None,
		};
		let json = serde_json::to_string(&body).unwrap();
		assert_eq!(json, "{\"customer\":\"c1\"}");
	}
}
