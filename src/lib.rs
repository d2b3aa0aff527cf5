pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{importer::UrlImporter, job_store::JobStoreLocator, storage::LocalStorage};
pub use app::run_import;
pub use crate::core::{
    engine::{ImportEngine, ImportSummary},
    importer::BoundedImporter,
};
pub use domain::model::{FileId, ImportManifest, ImportedFile, ImportedHandle, SourceRef};
pub use utils::error::{ImportError, Result};
