//! Random test-data generators for entity payloads.
//!
//! Produce payloads that satisfy the backend field validators (name and
//! address character classes, bounded numeric ranges, unique product
//! names). Field values are random so parallel test runs never collide on
//! uniqueness constraints.

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::{CustomerBody, DeliveryAddress, DeliveryCondition, DeliveryData, ProductBody};

const COUNTRIES: [&str; 8] = [
	"USA",
	"Canada",
	"Belarus",
	"Ukraine",
	"Germany",
	"France",
	"Great Britain",
	"Russia",
];

const MANUFACTURERS: [&str; 8] = [
	"Apple",
	"Samsung",
	"Google",
	"Microsoft",
	"Sony",
	"Xiaomi",
	"Amazon",
	"Tesla",
];

const FIRST_NAMES: [&str; 6] = ["John", "Jane", "Alex", "Maria", "Ivan", "Olga"];
const LAST_NAMES: [&str; 6] = ["Smith", "Doe", "Brown", "Miller", "Petrov", "Kovac"];
const STREETS: [&str; 5] = ["Main", "Park", "Oak", "Lake", "Hill"];
const CITIES: [&str; 5] = ["Springfield", "Riverton", "Fairview", "Madison", "Clinton"];

/// Short unique alphanumeric tag used to keep generated names collision
/// free.
fn unique_tag() -> String {
	Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn pick<'a>(values: &[&'a str]) -> &'a str {
	values
		.choose(&mut rand::thread_rng())
		.copied()
		.unwrap_or(values[0])
}

/// A valid random customer creation payload.
pub fn customer_body() -> CustomerBody {
	let mut rng = rand::thread_rng();
	let first = pick(&FIRST_NAMES);
	let last = pick(&LAST_NAMES);
	CustomerBody {
		email: format!("{}.{}@test.mail", first.to_lowercase(), unique_tag()),
		name: format!("{first} {last}"),
		country: pick(&COUNTRIES).to_string(),
		city: pick(&CITIES).to_string(),
		street: format!("{} {}", pick(&STREETS), rng.gen_range(1..100)),
		house: rng.gen_range(1..=999),
		flat: rng.gen_range(1..=9999),
		phone: format!("+{}", rng.gen_range(1_000_000_000u64..=999_999_999_999u64)),
		notes: None,
	}
}

/// A valid random product creation payload with a unique name.
pub fn product_body() -> ProductBody {
	let mut rng = rand::thread_rng();
	ProductBody {
		name: format!("Item {}", unique_tag()),
		amount: rng.gen_range(1..=999),
		price: rng.gen_range(1..=99999),
		manufacturer: pick(&MANUFACTURERS).to_string(),
		notes: None,
	}
}

/// Random delivery data with a final date one week out.
pub fn delivery_data() -> DeliveryData {
	let mut rng = rand::thread_rng();
	DeliveryData {
		address: DeliveryAddress {
			country: pick(&COUNTRIES).to_string(),
			city: pick(&CITIES).to_string(),
			street: pick(&STREETS).to_string(),
			house: rng.gen_range(1..=999),
			flat: rng.gen_range(1..=9999),
		},
		condition: DeliveryCondition::Delivery,
		final_date: (Utc::now() + Duration::days(7))
			.format("%Y/%m/%d 00:00:00")
			.to_string(),
	}
}

/// A short comment sentence within the backend's 1-250 character limit.
pub fn comment_text() -> String {
	format!("Automated check note {}", unique_tag())
}
