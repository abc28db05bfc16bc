use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Sedan,
    Suv,
    Mpv,
    Bus,
    Truck,
    Motorcycle,
    Special,
    Other,
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleType::Sedan => write!(f, "Sedan"),
            VehicleType::Suv => write!(f, "SUV"),
            VehicleType::Mpv => write!(f, "MPV"),
            VehicleType::Bus => write!(f, "Bus"),
            VehicleType::Truck => write!(f, "Truck"),
            VehicleType::Motorcycle => write!(f, "Motorcycle"),
            VehicleType::Special => write!(f, "Special purpose"),
            VehicleType::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sedan" => Ok(VehicleType::Sedan),
            "suv" => Ok(VehicleType::Suv),
            "mpv" => Ok(VehicleType::Mpv),
            "bus" => Ok(VehicleType::Bus),
            "truck" => Ok(VehicleType::Truck),
            "motorcycle" => Ok(VehicleType::Motorcycle),
            "special" => Ok(VehicleType::Special),
            "other" => Ok(VehicleType::Other),
            _ => Err(format!("Unknown vehicle type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    #[serde(rename = "currentMileage")]
    pub current_mileage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(rename = "licensePlate", default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(rename = "engineNumber", default, skip_serializing_if = "Option::is_none")]
    pub engine_number: Option<String>,
    #[serde(rename = "registrationDate", default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
}

impl Vehicle {
    /// Display label used anywhere a vehicle is referenced:
    /// "Toyota Camry (ABC-1234)", with "-" when no plate is on file.
    pub fn label(&self) -> String {
        format!(
            "{} {} ({})",
            self.make,
            self.model,
            self.license_plate.as_deref().unwrap_or("-")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_with_plate() {
        let v = Vehicle {
            id: "1".to_string(),
            vehicle_type: VehicleType::Sedan,
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2018,
            color: "Silver".to_string(),
            current_mileage: 45000,
            vin: None,
            license_plate: Some("ABC-1234".to_string()),
            engine_number: None,
            registration_date: None,
        };
        assert_eq!(v.label(), "Toyota Camry (ABC-1234)");
    }

    #[test]
    fn test_label_without_plate() {
        let v = Vehicle {
            id: "2".to_string(),
            vehicle_type: VehicleType::Suv,
            make: "Honda".to_string(),
            model: "CR-V".to_string(),
            year: 2020,
            color: "Blue".to_string(),
            current_mileage: 22000,
            vin: None,
            license_plate: None,
            engine_number: None,
            registration_date: None,
        };
        assert_eq!(v.label(), "Honda CR-V (-)");
    }

    #[test]
    fn test_serialized_field_names() {
        let v = Vehicle {
            id: "1".to_string(),
            vehicle_type: VehicleType::Truck,
            make: "Ford".to_string(),
            model: "F-150".to_string(),
            year: 2021,
            color: "White".to_string(),
            current_mileage: 10500,
            vin: Some("1FTFW1E50MFA00001".to_string()),
            license_plate: None,
            engine_number: None,
            registration_date: None,
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "truck");
        assert_eq!(json["currentMileage"], 10500);
        assert!(json.get("licensePlate").is_none());
    }
}
