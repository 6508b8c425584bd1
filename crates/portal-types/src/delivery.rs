//! Delivery scheduling types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery information attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
	pub address: DeliveryAddress,
	pub condition: DeliveryCondition,
	#[serde(rename = "finalDate")]
	pub final_date: String,
}

/// Delivery address sub-object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryAddress {
	pub country: String,
	pub city: String,
	pub street: String,
	pub house: i64,
	pub flat: i64,
}

/// Fulfillment condition. Wire strings mirror the backend DELIVERY enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryCondition {
	Delivery,
	Pickup,
}

impl fmt::Display for DeliveryCondition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DeliveryCondition::Delivery => write!(f, "Delivery"),
			DeliveryCondition::Pickup => write!(f, "Pickup"),
		}
	}
}

/// Payload for scheduling or editing a delivery. Same wire shape as
/// [`Delivery`], kept separate so request and response types can evolve
/// independently.
pub type DeliveryData = Delivery;
