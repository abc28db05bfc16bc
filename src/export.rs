//! Snapshot export.
//!
//! External consumers (spreadsheet export lives outside this crate) take
//! a read-only snapshot of the four collections with vehicle references
//! already resolved to display labels. The bundled `JsonExporter` writes
//! the snapshot to a dated JSON file. Export failures are surfaced to
//! the caller and never touch stored state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::store::FleetStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRow {
    pub id: String,
    pub vehicle_type: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub current_mileage: u32,
    pub color: String,
    pub vin: String,
    pub engine_number: String,
    pub registration_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRow {
    pub date: String,
    pub vehicle: String,
    pub service_type: String,
    pub description: String,
    pub cost: f64,
    pub mileage_at_service: u32,
    pub notes: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRow {
    pub report_date: String,
    pub vehicle: String,
    pub reporter: String,
    pub urgency: String,
    pub status: String,
    pub description: String,
    pub resolved_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapRow {
    pub entry_date: String,
    pub vehicle: String,
    pub item_name: String,
    pub status: String,
    pub disposal_date: String,
    pub sale_amount: f64,
}

/// Read-only view of the whole fleet, one section per collection.
/// Dangling vehicle references render as the placeholder label.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub vehicles: Vec<VehicleRow>,
    pub service_records: Vec<ServiceRow>,
    pub repair_requests: Vec<RepairRow>,
    pub scrap_items: Vec<ScrapRow>,
}

fn or_dash(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("-").to_string()
}

impl FleetSnapshot {
    pub fn capture(store: &FleetStore) -> Self {
        let vehicles = store
            .vehicles()
            .iter()
            .map(|v| VehicleRow {
                id: v.id.clone(),
                vehicle_type: v.vehicle_type.to_string(),
                make: v.make.clone(),
                model: v.model.clone(),
                year: v.year,
                license_plate: or_dash(&v.license_plate),
                current_mileage: v.current_mileage,
                color: v.color.clone(),
                vin: or_dash(&v.vin),
                engine_number: or_dash(&v.engine_number),
                registration_date: or_dash(&v.registration_date),
            })
            .collect();

        let service_records = store
            .records()
            .iter()
            .map(|r| ServiceRow {
                date: r.date.clone(),
                vehicle: store.vehicle_label(&r.vehicle_id),
                service_type: r.service_type.to_string(),
                description: r.description.clone(),
                cost: r.cost,
                mileage_at_service: r.mileage_at_service,
                notes: or_dash(&r.notes),
            })
            .collect();

        let repair_requests = store
            .repair_requests()
            .iter()
            .map(|r| RepairRow {
                report_date: r.report_date.clone(),
                vehicle: store.vehicle_label(&r.vehicle_id),
                reporter: r.reporter.clone(),
                urgency: r.urgency.to_string(),
                status: r.status.to_string(),
                description: r.description.clone(),
                resolved_date: or_dash(&r.resolved_date),
            })
            .collect();

        let scrap_items = store
            .scrap_items()
            .iter()
            .map(|s| ScrapRow {
                entry_date: s.entry_date.clone(),
                vehicle: store.vehicle_label(&s.vehicle_id),
                item_name: s.item_name.clone(),
                status: s.status.to_string(),
                disposal_date: or_dash(&s.disposal_date),
                sale_amount: s.sale_amount.unwrap_or(0.0),
            })
            .collect();

        Self {
            vehicles,
            service_records,
            repair_requests,
            scrap_items,
        }
    }
}

pub trait Exporter {
    /// Write the snapshot into `dir`, returning the path of the file
    /// produced. The filename carries the current date.
    fn export(&self, snapshot: &FleetSnapshot, dir: &Path) -> Result<PathBuf>;
}

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&self, snapshot: &FleetSnapshot, dir: &Path) -> Result<PathBuf> {
        let date = chrono::Local::now().format("%Y-%m-%d");
        let path = dir.join(format!("fleet-data_{}.json", date));
        let contents =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScrapItem, ScrapStatus};
    use crate::store::UNKNOWN_VEHICLE;
    use tempfile::TempDir;

    fn seeded_store(dir: &TempDir) -> FleetStore {
        FleetStore::open(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_capture_resolves_vehicle_labels() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);
        let snapshot = FleetSnapshot::capture(&store);

        assert_eq!(snapshot.vehicles.len(), store.vehicles().len());
        assert!(snapshot.service_records[0].vehicle.contains("Toyota Camry"));
    }

    #[test]
    fn test_capture_renders_placeholder_for_dangling_reference() {
        let dir = TempDir::new().unwrap();
        let mut store = seeded_store(&dir);
        store
            .add_scrap_item(ScrapItem {
                id: "s1".to_string(),
                vehicle_id: "gone".to_string(),
                item_name: "Worn tires".to_string(),
                entry_date: "2024-04-01".to_string(),
                status: ScrapStatus::InStock,
                photo: None,
                disposal_date: None,
                sale_amount: None,
            })
            .unwrap();

        let snapshot = FleetSnapshot::capture(&store);
        assert_eq!(snapshot.scrap_items[0].vehicle, UNKNOWN_VEHICLE);
        assert_eq!(snapshot.scrap_items[0].sale_amount, 0.0);
    }

    #[test]
    fn test_json_exporter_writes_dated_file() {
        let data_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let store = seeded_store(&data_dir);
        let snapshot = FleetSnapshot::capture(&store);

        let path = JsonExporter.export(&snapshot, out_dir.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("fleet-data_"));
        assert!(name.ends_with(".json"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(value["vehicles"].is_array());
        assert!(value["serviceRecords"].is_array());
    }
}
