//! Common types module for the Sales Portal harness.
//!
//! This module defines the core data types and structures used throughout
//! the harness. It provides a centralized location for shared types to
//! ensure consistency across all harness components.

/// Response envelope and status-code types shared by every remote call.
pub mod api;
/// Customer entity and creation payload.
pub mod customer;
/// Delivery scheduling types.
pub mod delivery;
/// Entity kinds tracked for teardown.
pub mod entity;
/// Random test-data generators for entity payloads.
pub mod generators;
/// Well-known backend error message strings.
pub mod messages;
/// Order entity, status lifecycle, and order payloads.
pub mod order;
/// Product entity and creation payload.
pub mod product;

// Re-export all types for convenient access
pub use api::*;
pub use customer::*;
pub use delivery::*;
pub use entity::*;
pub use order::*;
pub use product::*;
