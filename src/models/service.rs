use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Maintenance,
    Repair,
    Fuel,
    Upgrade,
    Other,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Maintenance => write!(f, "Maintenance"),
            ServiceType::Repair => write!(f, "Repair"),
            ServiceType::Fuel => write!(f, "Fuel"),
            ServiceType::Upgrade => write!(f, "Upgrade"),
            ServiceType::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "maintenance" => Ok(ServiceType::Maintenance),
            "repair" => Ok(ServiceType::Repair),
            "fuel" => Ok(ServiceType::Fuel),
            "upgrade" => Ok(ServiceType::Upgrade),
            "other" => Ok(ServiceType::Other),
            _ => Err(format!("Unknown service type: {}", s)),
        }
    }
}

/// A dated maintenance, repair, fuel, or upgrade event for one vehicle.
/// Mileage here is independently authored and never propagates back to
/// the vehicle's odometer value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    #[serde(rename = "vehicleId")]
    pub vehicle_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub description: String,
    pub cost: f64,
    #[serde(rename = "mileageAtService")]
    pub mileage_at_service: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    // Base64 image string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}
