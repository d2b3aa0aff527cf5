pub mod engine;
pub mod importer;

pub use crate::domain::model::{ImportedFile, ImportedHandle, SourceRef};
pub use crate::domain::ports::{ConfigProvider, FileImporter, Storage};
pub use crate::utils::error::Result;
