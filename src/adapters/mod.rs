// Adapters layer: concrete implementations for external systems (job stores, http sources).

pub mod importer;
pub mod job_store;
pub mod storage;
