//! Fixed sample data used when no prior state exists, so a fresh
//! install has something to show.

use crate::models::{ServiceRecord, ServiceType, Vehicle, VehicleType};

pub fn vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: "1".to_string(),
            vehicle_type: VehicleType::Sedan,
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2018,
            color: "Silver".to_string(),
            current_mileage: 45000,
            vin: Some("LFM1234567890ABCD".to_string()),
            license_plate: Some("PD-1001".to_string()),
            engine_number: None,
            registration_date: Some("2018-05-10".to_string()),
        },
        Vehicle {
            id: "2".to_string(),
            vehicle_type: VehicleType::Suv,
            make: "Honda".to_string(),
            model: "CR-V".to_string(),
            year: 2020,
            color: "Blue".to_string(),
            current_mileage: 22000,
            vin: None,
            license_plate: Some("PD-1002".to_string()),
            engine_number: Some("L15B899999".to_string()),
            registration_date: None,
        },
    ]
}

pub fn service_records() -> Vec<ServiceRecord> {
    vec![
        ServiceRecord {
            id: "101".to_string(),
            vehicle_id: "1".to_string(),
            date: "2023-10-15".to_string(),
            service_type: ServiceType::Maintenance,
            description: "Oil change".to_string(),
            cost: 300.0,
            mileage_at_service: 44000,
            notes: None,
            photo: None,
        },
        ServiceRecord {
            id: "102".to_string(),
            vehicle_id: "1".to_string(),
            date: "2023-08-20".to_string(),
            service_type: ServiceType::Repair,
            description: "Brake pad replacement".to_string(),
            cost: 800.0,
            mileage_at_service: 43500,
            notes: None,
            photo: None,
        },
        ServiceRecord {
            id: "103".to_string(),
            vehicle_id: "2".to_string(),
            date: "2024-01-10".to_string(),
            service_type: ServiceType::Maintenance,
            description: "Tire balancing".to_string(),
            cost: 150.0,
            mileage_at_service: 21500,
            notes: None,
            photo: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_references_resolve() {
        let vehicles = vehicles();
        for record in service_records() {
            assert!(
                vehicles.iter().any(|v| v.id == record.vehicle_id),
                "seed record {} references missing vehicle {}",
                record.id,
                record.vehicle_id
            );
        }
    }
}
