use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{RepairRequest, ScrapItem, ServiceRecord, Vehicle};
use crate::store::seed;

/// Storage key for the vehicle inventory collection
pub const VEHICLES_KEY: &str = "vehicles";

/// Storage key for the service record collection
pub const RECORDS_KEY: &str = "records";

/// Storage key for the repair request collection
pub const REPAIR_REQUESTS_KEY: &str = "repairRequests";

/// Storage key for the scrap item collection
pub const SCRAP_ITEMS_KEY: &str = "scrapItems";

/// Placeholder label rendered for records whose vehicle reference
/// no longer resolves. Dangling references are tolerated, not errors.
pub const UNKNOWN_VEHICLE: &str = "Unknown vehicle";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No record with id {0}")]
    NotFound(String),
}

/// Owns the four fleet collections and mirrors each one to a JSON file
/// under the data directory on every mutation. Collections are small
/// enough that a full rewrite per change is the simplest correct thing.
pub struct FleetStore {
    data_dir: PathBuf,
    vehicles: Vec<Vehicle>,
    records: Vec<ServiceRecord>,
    repair_requests: Vec<RepairRequest>,
    scrap_items: Vec<ScrapItem>,
}

impl FleetStore {
    /// Open the store, loading all four collections from the data
    /// directory. Missing or unreadable entries fall back to the seed
    /// collection (vehicles, service records) or the empty collection
    /// (repair requests, scrap items); corrupt data is never fatal.
    pub fn open(data_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&data_dir)?;

        let vehicles = load_collection(&data_dir, VEHICLES_KEY, seed::vehicles);
        let records = load_collection(&data_dir, RECORDS_KEY, seed::service_records);
        let repair_requests = load_collection(&data_dir, REPAIR_REQUESTS_KEY, Vec::new);
        let scrap_items = load_collection(&data_dir, SCRAP_ITEMS_KEY, Vec::new);

        Ok(Self {
            data_dir,
            vehicles,
            records,
            repair_requests,
            scrap_items,
        })
    }

    // ===== Read access =====

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn repair_requests(&self) -> &[RepairRequest] {
        &self.repair_requests
    }

    pub fn scrap_items(&self) -> &[ScrapItem] {
        &self.scrap_items
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Display label for a vehicle reference, tolerating dangling ids.
    pub fn vehicle_label(&self, vehicle_id: &str) -> String {
        self.vehicle(vehicle_id)
            .map(|v| v.label())
            .unwrap_or_else(|| UNKNOWN_VEHICLE.to_string())
    }

    pub fn records_for_vehicle(&self, vehicle_id: &str) -> Vec<&ServiceRecord> {
        self.records
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .collect()
    }

    pub fn open_repair_count(&self) -> usize {
        self.repair_requests.iter().filter(|r| r.is_open()).count()
    }

    pub fn in_stock_scrap_count(&self) -> usize {
        self.scrap_items
            .iter()
            .filter(|s| matches!(s.status, crate::models::ScrapStatus::InStock))
            .count()
    }

    // ===== Vehicles =====

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<(), StoreError> {
        self.vehicles.push(vehicle);
        self.save(VEHICLES_KEY, &self.vehicles)
    }

    /// Remove a vehicle by id. Dependent records are left in place;
    /// their references go dangling and render as the placeholder label.
    pub fn remove_vehicle(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.vehicles.len();
        self.vehicles.retain(|v| v.id != id);
        if self.vehicles.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.save(VEHICLES_KEY, &self.vehicles)
    }

    // ===== Service records =====

    pub fn add_service_record(&mut self, record: ServiceRecord) -> Result<(), StoreError> {
        self.records.push(record);
        self.save(RECORDS_KEY, &self.records)
    }

    // ===== Repair requests =====

    pub fn add_repair_request(&mut self, request: RepairRequest) -> Result<(), StoreError> {
        self.repair_requests.push(request);
        self.save(REPAIR_REQUESTS_KEY, &self.repair_requests)
    }

    /// Replace an existing request wholesale (status transitions,
    /// resolution date).
    pub fn update_repair_request(&mut self, request: RepairRequest) -> Result<(), StoreError> {
        let slot = self
            .repair_requests
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| StoreError::NotFound(request.id.clone()))?;
        *slot = request;
        self.save(REPAIR_REQUESTS_KEY, &self.repair_requests)
    }

    // ===== Scrap items =====

    pub fn add_scrap_item(&mut self, item: ScrapItem) -> Result<(), StoreError> {
        self.scrap_items.push(item);
        self.save(SCRAP_ITEMS_KEY, &self.scrap_items)
    }

    pub fn update_scrap_item(&mut self, item: ScrapItem) -> Result<(), StoreError> {
        let slot = self
            .scrap_items
            .iter_mut()
            .find(|s| s.id == item.id)
            .ok_or_else(|| StoreError::NotFound(item.id.clone()))?;
        *slot = item;
        self.save(SCRAP_ITEMS_KEY, &self.scrap_items)
    }

    fn save<T: Serialize>(&self, key: &str, collection: &[T]) -> Result<(), StoreError> {
        let path = collection_path(&self.data_dir, key);
        let contents = serde_json::to_string_pretty(collection)?;
        std::fs::write(&path, contents)?;
        debug!(key, count = collection.len(), "Persisted collection");
        Ok(())
    }
}

fn collection_path(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(format!("{}.json", key))
}

/// Load one collection, falling back to its default on missing or
/// corrupt data. Corruption is logged and discarded rather than
/// propagated; the next mutation overwrites the bad file.
fn load_collection<T: DeserializeOwned>(
    data_dir: &Path,
    key: &str,
    default: impl FnOnce() -> Vec<T>,
) -> Vec<T> {
    let path = collection_path(data_dir, key);
    if !path.exists() {
        return default();
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored collection, using default");
            return default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(collection) => collection,
        Err(e) => {
            warn!(key, error = %e, "Stored collection is corrupt, using default");
            default()
        }
    }
}

/// Generate a unique record id: millisecond timestamp plus a short
/// random suffix to disambiguate same-millisecond inserts.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().gen_range(0..10000);
    format!("{}{:04}", millis, suffix)
}

// ============================================================================
// Tests
// ============================================================================
