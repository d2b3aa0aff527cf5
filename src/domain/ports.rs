use crate::domain::model::{ImportedHandle, SourceRef};
use crate::utils::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Backend of a job store.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Writes are all-or-nothing: readers never observe a partially written file.
    fn write_file(
        &self,
        path: &str,
        data: Bytes,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Size of the stored file, or `None` when nothing is stored at `path`.
    fn stored_size(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<u64>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn job_store(&self) -> &str;
    fn sources(&self) -> &[String];
    fn max_threads(&self) -> usize;
    /// Name of the manifest written after a successful run, if any.
    fn manifest_name(&self) -> Option<&str>;
}

/// The capability that actually moves one resource into the job store.
#[async_trait]
pub trait FileImporter: Send + Sync {
    async fn import_file(&self, source: &SourceRef) -> Result<ImportedHandle>;
}
