//! Well-known backend error message strings.
//!
//! These mirror the backend's response error strings verbatim; tests
//! assert equality against them, so they must never be reworded here.

pub const INVALID_ORDER_STATUS: &str = "Invalid order status";
pub const CANT_REOPEN: &str = "Can't reopen not canceled order";
pub const CANT_PROCESS: &str = "Can't process order. Please, schedule delivery";
pub const INCORRECT_DELIVERY: &str = "Incorrect Delivery";
pub const BAD_REQUEST_BODY: &str = "Incorrect request body";
pub const NOT_AUTHORIZED: &str = "Not authorized";
pub const COMMENT_NOT_FOUND: &str = "Comment was not found";

pub fn order_not_found(order_id: &str) -> String {
	format!("Order with id '{order_id}' wasn't found")
}

pub fn customer_not_found(customer_id: &str) -> String {
	format!("Customer with id '{customer_id}' wasn't found")
}

pub fn product_not_found(product_id: &str) -> String {
	format!("Product with id '{product_id}' wasn't found")
}

pub fn manager_not_found(manager_id: &str) -> String {
	format!("Manager with id '{manager_id}' wasn't found")
}

pub fn product_not_requested(product_id: &str) -> String {
	format!("Product with Id '{product_id}' is not requested")
}
