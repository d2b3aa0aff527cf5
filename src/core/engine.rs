use crate::core::importer::BoundedImporter;
use crate::core::{ConfigProvider, FileImporter, Storage};
use crate::domain::model::{ImportManifest, ImportedFile};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use bytes::Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub files: Vec<ImportedFile>,
    pub manifest_path: Option<String>,
    pub elapsed: Duration,
}

impl ImportSummary {
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.handle.size).sum()
    }
}

pub struct ImportEngine<I: FileImporter + 'static, S: Storage> {
    importer: Arc<I>,
    storage: S,
    job_store: String,
    sources: Vec<String>,
    max_threads: usize,
    manifest_name: Option<String>,
    monitor: SystemMonitor,
}

impl<I: FileImporter + 'static, S: Storage> ImportEngine<I, S> {
    pub fn new<C: ConfigProvider>(importer: I, storage: S, config: &C) -> Self {
        Self::new_with_monitoring(importer, storage, config, false)
    }

    pub fn new_with_monitoring<C: ConfigProvider>(
        importer: I,
        storage: S,
        config: &C,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            importer: Arc::new(importer),
            storage,
            job_store: config.job_store().to_string(),
            sources: config.sources().to_vec(),
            max_threads: config.max_threads(),
            manifest_name: config.manifest_name().map(str::to_string),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<ImportSummary> {
        tracing::info!(
            "Importing {} input files into job store {}",
            self.sources.len(),
            self.job_store
        );
        if self.sources.is_empty() {
            tracing::warn!("No sources configured, nothing to import");
        }
        self.monitor.log_stats("Before import");

        let mut importer =
            BoundedImporter::with_shared(Arc::clone(&self.importer), self.max_threads)?;
        for source in &self.sources {
            importer.add(source.as_str());
        }

        let start = Instant::now();
        let files = importer.load().await?;
        let elapsed = start.elapsed();

        self.monitor.log_stats("After import");

        let manifest_path = match &self.manifest_name {
            Some(name) => Some(self.write_manifest(name, &files).await?),
            None => None,
        };

        tracing::info!(
            "Imported {} input files into {} in {:.3} seconds",
            files.len(),
            self.job_store,
            elapsed.as_secs_f64()
        );
        self.monitor.log_final_stats();

        Ok(ImportSummary {
            files,
            manifest_path,
            elapsed,
        })
    }

    async fn write_manifest(&self, name: &str, files: &[ImportedFile]) -> Result<String> {
        let manifest = ImportManifest::new(self.job_store.clone(), files.to_vec());
        let json = Bytes::from(serde_json::to_vec_pretty(&manifest)?);

        tracing::debug!(
            "Writing manifest {} ({} files, {} bytes total)",
            name,
            manifest.files.len(),
            manifest.total_size()
        );
        self.storage.write_file(name, json).await?;

        Ok(name.to_string())
    }
}
