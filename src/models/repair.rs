use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "resolved")]
    Resolved,
}

impl std::fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairStatus::Pending => write!(f, "Pending"),
            RepairStatus::InProgress => write!(f, "In progress"),
            RepairStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairUrgency {
    Normal,
    Urgent,
    Critical,
}

impl std::fmt::Display for RepairUrgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairUrgency::Normal => write!(f, "Normal"),
            RepairUrgency::Urgent => write!(f, "Urgent"),
            RepairUrgency::Critical => write!(f, "Critical"),
        }
    }
}

impl std::str::FromStr for RepairUrgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(RepairUrgency::Normal),
            "urgent" => Ok(RepairUrgency::Urgent),
            "critical" => Ok(RepairUrgency::Critical),
            _ => Err(format!("Unknown urgency: {}", s)),
        }
    }
}

/// A fault report tracked from submission through resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairRequest {
    pub id: String,
    #[serde(rename = "vehicleId")]
    pub vehicle_id: String,
    pub reporter: String,
    pub description: String,
    pub urgency: RepairUrgency,
    pub status: RepairStatus,
    #[serde(rename = "reportDate")]
    pub report_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(rename = "resolvedDate", default, skip_serializing_if = "Option::is_none")]
    pub resolved_date: Option<String>,
}

impl RepairRequest {
    pub fn is_open(&self) -> bool {
        !matches!(self.status, RepairStatus::Resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(status: RepairStatus) -> RepairRequest {
        RepairRequest {
            id: "r1".to_string(),
            vehicle_id: "1".to_string(),
            reporter: "Officer Chen".to_string(),
            description: "Engine warning light".to_string(),
            urgency: RepairUrgency::Urgent,
            status,
            report_date: "2024-02-01".to_string(),
            photo: None,
            resolved_date: None,
        }
    }

    #[test]
    fn test_is_open() {
        assert!(request(RepairStatus::Pending).is_open());
        assert!(request(RepairStatus::InProgress).is_open());
        assert!(!request(RepairStatus::Resolved).is_open());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_value(request(RepairStatus::InProgress)).unwrap();
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["urgency"], "urgent");
        assert_eq!(json["reportDate"], "2024-02-01");
    }
}
