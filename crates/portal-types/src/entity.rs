//! Entity kinds tracked during a test run.

use std::fmt;

/// The kinds of backend entities a test creates and must tear down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
	Order,
	Customer,
	Product,
}

impl EntityKind {
	/// All kinds, in teardown dependency order: orders must go before the
	/// customers and products they reference.
	pub const ALL: [EntityKind; 3] = [EntityKind::Order, EntityKind::Customer, EntityKind::Product];
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EntityKind::Order => write!(f, "order"),
			EntityKind::Customer => write!(f, "customer"),
			EntityKind::Product => write!(f, "product"),
		}
	}
}
