use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapStatus {
    #[serde(rename = "in-stock")]
    InStock,
    #[serde(rename = "disposed")]
    Disposed,
}

impl std::fmt::Display for ScrapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapStatus::InStock => write!(f, "In stock"),
            ScrapStatus::Disposed => write!(f, "Disposed"),
        }
    }
}

/// A removed part or item (old battery, worn tires, ...) tracked from
/// intake through disposal or sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapItem {
    pub id: String,
    #[serde(rename = "vehicleId")]
    pub vehicle_id: String,
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "entryDate")]
    pub entry_date: String,
    pub status: ScrapStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(rename = "disposalDate", default, skip_serializing_if = "Option::is_none")]
    pub disposal_date: Option<String>,
    #[serde(rename = "saleAmount", default, skip_serializing_if = "Option::is_none")]
    pub sale_amount: Option<f64>,
}
