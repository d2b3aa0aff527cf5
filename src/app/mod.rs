// Application wiring: pick the job store backend named by the config and run the import.

use crate::adapters::importer::UrlImporter;
use crate::adapters::job_store::JobStoreLocator;
use crate::adapters::storage::LocalStorage;
use crate::core::engine::{ImportEngine, ImportSummary};
use crate::core::{ConfigProvider, Storage};
use crate::utils::error::Result;

pub async fn run_import<C: ConfigProvider>(config: &C, monitor: bool) -> Result<ImportSummary> {
    let locator: JobStoreLocator = config.job_store().parse()?;
    tracing::debug!("Resolved job store {}", locator);

    match locator {
        JobStoreLocator::File { path } => {
            run_with_storage(LocalStorage::new(path), config, monitor).await
        }
        #[cfg(feature = "s3")]
        JobStoreLocator::Aws { region, bucket } => {
            let storage = crate::adapters::storage::S3Storage::connect(&region, &bucket).await;
            run_with_storage(storage, config, monitor).await
        }
        #[cfg(not(feature = "s3"))]
        JobStoreLocator::Aws { .. } => Err(crate::utils::error::ImportError::ConfigError {
            message: format!(
                "Job store {} needs S3 support; rebuild with --features s3",
                config.job_store()
            ),
        }),
    }
}

async fn run_with_storage<S, C>(storage: S, config: &C, monitor: bool) -> Result<ImportSummary>
where
    S: Storage + Clone + 'static,
    C: ConfigProvider,
{
    let importer = UrlImporter::new(storage.clone());
    let engine = ImportEngine::new_with_monitoring(importer, storage, config, monitor);
    engine.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ImportError;

    struct StaticConfig(&'static str);

    impl ConfigProvider for StaticConfig {
        fn job_store(&self) -> &str {
            self.0
        }

        fn sources(&self) -> &[String] {
            &[]
        }

        fn max_threads(&self) -> usize {
            2
        }

        fn manifest_name(&self) -> Option<&str> {
            None
        }
    }

    #[tokio::test]
    async fn test_invalid_locator_is_rejected() {
        let err = run_import(&StaticConfig("aws:bad"), false).await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidConfigValueError { .. }));
    }

    #[cfg(not(feature = "s3"))]
    #[tokio::test]
    async fn test_aws_store_requires_s3_feature() {
        let err = run_import(&StaticConfig("aws:us-west-2:async-import-test"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::ConfigError { .. }));
    }
}
