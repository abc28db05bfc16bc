//! Fleetbook - an offline-capable record keeper for a police-department
//! vehicle fleet.
//!
//! Tracks vehicle inventory, maintenance history, repair requests, and
//! scrap/recycling disposal in locally persisted collections, and keeps
//! the application shell usable offline through a versioned asset cache.

mod config;
mod export;
mod models;
mod offline;
mod store;
mod utils;

use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use export::{Exporter, FleetSnapshot, JsonExporter};
use models::{
    RepairRequest, RepairStatus, RepairUrgency, ScrapItem, ScrapStatus, ServiceRecord,
    ServiceType, Vehicle, VehicleType,
};
use offline::{CacheConfig, DiskCacheStorage, FetchOutcome, HttpNetwork, OfflineCacheManager};
use store::{generate_id, FleetStore};
use utils::{format_currency, format_date, format_mileage, truncate_string};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: fleetbook [COMMAND]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  (none)                                        print a fleet status summary");
    eprintln!("  --add-vehicle TYPE MAKE MODEL YEAR COLOR MILEAGE [PLATE]");
    eprintln!("  --remove-vehicle ID");
    eprintln!("  --log-service VEHICLE_ID TYPE COST MILEAGE DESCRIPTION...");
    eprintln!("  --report-repair VEHICLE_ID URGENCY REPORTER DESCRIPTION...");
    eprintln!("  --resolve-repair ID");
    eprintln!("  --add-scrap VEHICLE_ID ITEM_NAME...");
    eprintln!("  --dispose-scrap ID AMOUNT");
    eprintln!("  --set-origin URL");
    eprintln!("  --export [DIR]                                write a dated JSON snapshot");
    eprintln!("  --precache                                    install the offline asset cache");
    eprintln!("  --offline-check URL                           run one URL through the pipeline");
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("Fleetbook starting");

    let config = Config::load()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let rest = args.get(1..).unwrap_or(&[]);

    match args.first().map(String::as_str) {
        None => print_status(&config),
        Some("--add-vehicle") => add_vehicle(&config, rest),
        Some("--remove-vehicle") => remove_vehicle(&config, rest),
        Some("--log-service") => log_service(&config, rest),
        Some("--report-repair") => report_repair(&config, rest),
        Some("--resolve-repair") => resolve_repair(&config, rest),
        Some("--add-scrap") => add_scrap(&config, rest),
        Some("--dispose-scrap") => dispose_scrap(&config, rest),
        Some("--set-origin") => {
            let origin = rest
                .first()
                .ok_or_else(|| anyhow!("--set-origin requires a URL"))?;
            set_origin(config, origin)
        }
        Some("--export") => export_snapshot(&config, rest.first().map(PathBuf::from)),
        Some("--precache") => precache(&config).await,
        Some("--offline-check") => {
            let url = rest
                .first()
                .ok_or_else(|| anyhow!("--offline-check requires a URL"))?;
            offline_check(&config, url).await
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown option: {}", other);
            print_usage();
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> Result<FleetStore> {
    Ok(FleetStore::open(config.data_dir()?)?)
}

/// Print a summary of the fleet: inventory, open repairs, scrap stock.
fn print_status(config: &Config) -> Result<()> {
    let store = open_store(config)?;

    println!("Fleet: {} vehicles", store.vehicles().len());
    for vehicle in store.vehicles() {
        let services = store.records_for_vehicle(&vehicle.id).len();
        println!(
            "  [{}] {} - {}, {} service records",
            vehicle.id,
            vehicle.label(),
            format_mileage(vehicle.current_mileage),
            services
        );
    }

    println!("Repair requests: {} open", store.open_repair_count());
    for request in store.repair_requests().iter().filter(|r| r.is_open()) {
        println!(
            "  [{}] {} - {} ({}, reported {})",
            request.urgency,
            store.vehicle_label(&request.vehicle_id),
            truncate_string(&request.description, 40),
            request.status,
            format_date(&request.report_date)
        );
    }

    println!("Scrap items in stock: {}", store.in_stock_scrap_count());

    let total_cost: f64 = store.records().iter().map(|r| r.cost).sum();
    println!("Total service spend: {}", format_currency(total_cost));
    Ok(())
}

fn add_vehicle(config: &Config, args: &[String]) -> Result<()> {
    let [vehicle_type, make, model, year, color, mileage, tail @ ..] = args else {
        bail!("--add-vehicle requires TYPE MAKE MODEL YEAR COLOR MILEAGE [PLATE]");
    };
    let vehicle = Vehicle {
        id: generate_id(),
        vehicle_type: vehicle_type.parse::<VehicleType>().map_err(|e| anyhow!(e))?,
        make: make.clone(),
        model: model.clone(),
        year: year.parse()?,
        color: color.clone(),
        current_mileage: mileage.parse()?,
        vin: None,
        license_plate: tail.first().cloned(),
        engine_number: None,
        registration_date: Some(today()),
    };

    let mut store = open_store(config)?;
    let label = vehicle.label();
    let id = vehicle.id.clone();
    store.add_vehicle(vehicle)?;
    println!("Added {} with id {}", label, id);
    Ok(())
}

fn remove_vehicle(config: &Config, args: &[String]) -> Result<()> {
    let id = args.first().ok_or_else(|| anyhow!("--remove-vehicle requires ID"))?;
    let mut store = open_store(config)?;
    store.remove_vehicle(id)?;
    println!("Removed vehicle {}", id);
    Ok(())
}

fn log_service(config: &Config, args: &[String]) -> Result<()> {
    let [vehicle_id, service_type, cost, mileage, description @ ..] = args else {
        bail!("--log-service requires VEHICLE_ID TYPE COST MILEAGE DESCRIPTION...");
    };
    if description.is_empty() {
        bail!("--log-service requires a description");
    }
    let record = ServiceRecord {
        id: generate_id(),
        vehicle_id: vehicle_id.clone(),
        date: today(),
        service_type: service_type.parse::<ServiceType>().map_err(|e| anyhow!(e))?,
        description: description.join(" "),
        cost: cost.parse()?,
        mileage_at_service: mileage.parse()?,
        notes: None,
        photo: None,
    };

    let mut store = open_store(config)?;
    store.add_service_record(record)?;
    println!("Logged service for {}", store.vehicle_label(vehicle_id));
    Ok(())
}

fn report_repair(config: &Config, args: &[String]) -> Result<()> {
    let [vehicle_id, urgency, reporter, description @ ..] = args else {
        bail!("--report-repair requires VEHICLE_ID URGENCY REPORTER DESCRIPTION...");
    };
    if description.is_empty() {
        bail!("--report-repair requires a description");
    }
    let request = RepairRequest {
        id: generate_id(),
        vehicle_id: vehicle_id.clone(),
        reporter: reporter.clone(),
        description: description.join(" "),
        urgency: urgency.parse::<RepairUrgency>().map_err(|e| anyhow!(e))?,
        status: RepairStatus::Pending,
        report_date: today(),
        photo: None,
        resolved_date: None,
    };

    let mut store = open_store(config)?;
    let id = request.id.clone();
    store.add_repair_request(request)?;
    println!("Filed repair request {} for {}", id, store.vehicle_label(vehicle_id));
    Ok(())
}

fn resolve_repair(config: &Config, args: &[String]) -> Result<()> {
    let id = args.first().ok_or_else(|| anyhow!("--resolve-repair requires ID"))?;
    let mut store = open_store(config)?;
    let mut request = store
        .repair_requests()
        .iter()
        .find(|r| r.id == *id)
        .cloned()
        .ok_or_else(|| anyhow!("No repair request with id {}", id))?;

    request.status = RepairStatus::Resolved;
    request.resolved_date = Some(today());
    store.update_repair_request(request)?;
    println!("Resolved repair request {}", id);
    Ok(())
}

fn add_scrap(config: &Config, args: &[String]) -> Result<()> {
    let [vehicle_id, item_name @ ..] = args else {
        bail!("--add-scrap requires VEHICLE_ID ITEM_NAME...");
    };
    if item_name.is_empty() {
        bail!("--add-scrap requires an item name");
    }
    let item = ScrapItem {
        id: generate_id(),
        vehicle_id: vehicle_id.clone(),
        item_name: item_name.join(" "),
        entry_date: today(),
        status: ScrapStatus::InStock,
        photo: None,
        disposal_date: None,
        sale_amount: None,
    };

    let mut store = open_store(config)?;
    let id = item.id.clone();
    store.add_scrap_item(item)?;
    println!("Added scrap item {} from {}", id, store.vehicle_label(vehicle_id));
    Ok(())
}

fn dispose_scrap(config: &Config, args: &[String]) -> Result<()> {
    let [id, amount] = args else {
        bail!("--dispose-scrap requires ID AMOUNT");
    };
    let mut store = open_store(config)?;
    let mut item = store
        .scrap_items()
        .iter()
        .find(|s| s.id == *id)
        .cloned()
        .ok_or_else(|| anyhow!("No scrap item with id {}", id))?;

    item.status = ScrapStatus::Disposed;
    item.disposal_date = Some(today());
    item.sale_amount = Some(amount.parse()?);
    store.update_scrap_item(item)?;
    println!("Disposed scrap item {} for {}", id, format_currency(amount.parse()?));
    Ok(())
}

/// Persist the application origin used by the offline cache.
fn set_origin(mut config: Config, origin: &str) -> Result<()> {
    config.origin = Some(origin.trim_end_matches('/').to_string());
    config.save()?;
    println!("Origin set to {}", config.origin());
    Ok(())
}

/// Snapshot all four collections to a dated JSON file. A failed export
/// is reported to the user; stored state is never affected.
fn export_snapshot(config: &Config, dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(config)?;
    let snapshot = FleetSnapshot::capture(&store);
    let out_dir = dir.unwrap_or_else(|| PathBuf::from("."));

    match JsonExporter.export(&snapshot, &out_dir) {
        Ok(path) => {
            println!("Exported fleet data to {}", path.display());
        }
        Err(e) => {
            error!(error = %e, "Export failed");
            eprintln!("Export failed: {:#}. Please retry.", e);
        }
    }
    Ok(())
}

/// Install the precache list into the versioned namespace, then clean
/// up namespaces left over from earlier versions.
async fn precache(config: &Config) -> Result<()> {
    let cache_config = CacheConfig::for_origin(config.origin());
    let storage = DiskCacheStorage::new(config.cache_dir()?)?;
    let network = HttpNetwork::new(cache_config.origin.clone())?;
    let mut manager = OfflineCacheManager::new(cache_config, storage, network);

    manager.install().await?;
    manager.activate()?;
    println!("Offline cache installed and activated");
    Ok(())
}

/// Run one URL through the fetch pipeline and report what happened.
async fn offline_check(config: &Config, url: &str) -> Result<()> {
    let cache_config = CacheConfig::for_origin(config.origin());
    let storage = DiskCacheStorage::new(config.cache_dir()?)?;
    let network = HttpNetwork::new(cache_config.origin.clone())?;
    let mut manager = OfflineCacheManager::new(cache_config, storage, network);

    match manager.handle(url).await? {
        FetchOutcome::PassThrough => {
            println!("{}: not intercepted (outside origin/allow-list)", url)
        }
        FetchOutcome::Cached(r) => println!("{}: served from cache ({} bytes)", url, r.body.len()),
        FetchOutcome::Fetched(r) => {
            println!("{}: fetched from network (status {})", url, r.status)
        }
        FetchOutcome::Fallback(_) => println!("{}: offline, served fallback document", url),
    }
    Ok(())
}
