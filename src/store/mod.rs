//! Persistent state store for the fleet collections.
//!
//! This module provides the `FleetStore`, which owns the four record
//! collections in memory and mirrors each one to a JSON file on every
//! mutation. Missing or corrupt files fall back to seed data (vehicles,
//! service records) or the empty collection (repair requests, scrap
//! items) rather than failing.

pub mod fleet;
pub mod seed;

pub use fleet::{generate_id, FleetStore, StoreError, UNKNOWN_VEHICLE};
