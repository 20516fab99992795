//! Infrastructure layer: durable storage, the shared inventory store, config.

pub mod config;
pub mod inventory_store;
pub mod store;
pub mod workers;


pub use config::AppConfig;
pub use inventory_store::InventoryStore;
pub use store::{JsonFileStore, StoreError};
pub use workers::persist_worker::{PersistStats, PersistWorker, PersistWorkerHandle, Persister};
