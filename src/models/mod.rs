//! Data models for fleet entities.
//!
//! This module contains the four record kinds tracked by the application:
//!
//! - `Vehicle`: fleet inventory with identity and odometer value
//! - `ServiceRecord`: dated maintenance/repair/fuel/upgrade events
//! - `RepairRequest`: fault reports tracked through resolution
//! - `ScrapItem`: removed parts tracked through disposal or sale

pub mod repair;
pub mod scrap;
pub mod service;
pub mod vehicle;

pub use repair::{RepairRequest, RepairStatus, RepairUrgency};
pub use scrap::{ScrapItem, ScrapStatus};
pub use service::{ServiceRecord, ServiceType};
pub use vehicle::{Vehicle, VehicleType};
