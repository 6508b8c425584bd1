//! Order status state machine.
//!
//! Pure data: the legal transitions with their guards, the rejection text
//! the backend answers illegal requests with, and a shortest-path planner
//! that turns a target status into the remote-call sequence reaching it
//! from Draft. Adding a reachable status is a table edit, not new code.

use once_cell::sync::Lazy;
use portal_types::{messages, OrderStatus};
use std::collections::{HashMap, VecDeque};

/// Precondition the backend checks before accepting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
	None,
	/// The order must have a scheduled delivery.
	DeliveryScheduled,
}

impl Guard {
	/// The backend's rejection text when this guard is unmet.
	pub fn rejection(&self) -> Option<&'static str> {
		match self {
			Guard::None => None,
			Guard::DeliveryScheduled => Some(messages::CANT_PROCESS),
		}
	}
}

/// How a transition is performed remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
	/// A direct status update call.
	SetStatus,
	/// Receiving a proper subset of the order's products.
	ReceiveSubset,
	/// Receiving every still-unreceived product.
	ReceiveRemaining,
}

/// One edge of the status graph.
#[derive(Debug, Clone, Copy)]
struct Transition {
	from: OrderStatus,
	to: OrderStatus,
	guard: Guard,
	action: Action,
}

static TRANSITIONS: Lazy<Vec<Transition>> = Lazy::new(|| {
	use Action::*;
	use OrderStatus::*;
	vec![
		Transition {
			from: Draft,
			to: InProcess,
			guard: Guard::DeliveryScheduled,
			action: SetStatus,
		},
		Transition {
			from: Draft,
			to: Canceled,
			guard: Guard::None,
			action: SetStatus,
		},
		Transition {
			from: InProcess,
			to: Canceled,
			guard: Guard::None,
			action: SetStatus,
		},
		// Reopen.
		Transition {
			from: Canceled,
			to: Draft,
			guard: Guard::None,
			action: SetStatus,
		},
		Transition {
			from: InProcess,
			to: PartiallyReceived,
			guard: Guard::None,
			action: ReceiveSubset,
		},
		Transition {
			from: InProcess,
			to: Received,
			guard: Guard::None,
			action: ReceiveRemaining,
		},
		Transition {
			from: PartiallyReceived,
			to: Received,
			guard: Guard::None,
			action: ReceiveRemaining,
		},
	]
});

/// True when the backend accepts a `from` → `to` move (guard permitting).
pub fn is_legal(from: OrderStatus, to: OrderStatus) -> bool {
	TRANSITIONS.iter().any(|t| t.from == from && t.to == to)
}

/// The guard on a legal transition.
pub fn guard(from: OrderStatus, to: OrderStatus) -> Option<Guard> {
	TRANSITIONS
		.iter()
		.find(|t| t.from == from && t.to == to)
		.map(|t| t.guard)
}

/// The rejection text the backend answers an illegal `from` → `to`
/// request with.
///
/// Requesting Draft is always read as a reopen, which is only legal from
/// Canceled; every other illegal pair gets the generic status rejection.
pub fn expected_rejection(from: OrderStatus, to: OrderStatus) -> Option<&'static str> {
	if is_legal(from, to) {
		return None;
	}
	Some(if to == OrderStatus::Draft {
		messages::CANT_REOPEN
	} else {
		messages::INVALID_ORDER_STATUS
	})
}

/// Status the backend derives after receiving `now` more of `total`
/// products, `already` of which were received before.
pub fn derive_status_after_receive(total: usize, already: usize, now: usize) -> OrderStatus {
	if already + now >= total {
		OrderStatus::Received
	} else {
		OrderStatus::PartiallyReceived
	}
}

/// One step of a planned route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStep {
	/// Schedule a delivery to satisfy a guard ahead.
	ScheduleDelivery,
	/// Request a direct status update.
	SetStatus(OrderStatus),
	/// Receive this many products (a proper subset).
	ReceiveSubset(usize),
	/// Receive every still-unreceived product.
	ReceiveRemaining,
}

/// Route planning inputs.
#[derive(Debug, Clone, Copy)]
pub struct RouteOptions {
	/// Whether the order already has a delivery scheduled.
	pub delivery_scheduled: bool,
	/// Product count for a [`PlanStep::ReceiveSubset`] step.
	pub receive_count: usize,
}

impl Default for RouteOptions {
	fn default() -> Self {
		Self {
			delivery_scheduled: false,
			receive_count: 1,
		}
	}
}

/// Shortest legal step sequence from a fresh Draft order to `target`.
///
/// Breadth-first over (status, delivery-scheduled) nodes; an unmet
/// delivery guard costs one extra [`PlanStep::ScheduleDelivery`] step, so
/// routes not needing delivery never schedule one. A Draft target yields
/// an empty route.
pub fn plan_route(target: OrderStatus, opts: RouteOptions) -> Vec<PlanStep> {
	let start = (OrderStatus::Draft, opts.delivery_scheduled);
	let mut visited: HashMap<(OrderStatus, bool), Vec<PlanStep>> = HashMap::new();
	visited.insert(start, Vec::new());
	let mut queue = VecDeque::from([start]);

	while let Some((status, delivery)) = queue.pop_front() {
		let steps = visited[&(status, delivery)].clone();
		if status == target {
			return steps;
		}
		for transition in TRANSITIONS.iter().filter(|t| t.from == status) {
			let mut next_steps = steps.clone();
			let mut next_delivery = delivery;
			if transition.guard == Guard::DeliveryScheduled && !delivery {
				next_steps.push(PlanStep::ScheduleDelivery);
				next_delivery = true;
			}
			next_steps.push(match transition.action {
				Action::SetStatus => PlanStep::SetStatus(transition.to),
				Action::ReceiveSubset => PlanStep::ReceiveSubset(opts.receive_count),
				Action::ReceiveRemaining => PlanStep::ReceiveRemaining,
			});
			let node = (transition.to, next_delivery);
			if !visited.contains_key(&node) {
				visited.insert(node, next_steps);
				queue.push_back(node);
			}
		}
	}
	// Every status is reachable from Draft.
	Vec::new()
}
