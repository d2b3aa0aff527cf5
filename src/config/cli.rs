use crate::core::importer::DEFAULT_MAX_THREADS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_range, validate_sources, validate_store_relative_path, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "async-import")]
#[command(about = "Bulk-import remote files into a job store with a bounded worker pool")]
pub struct CliConfig {
    /// Job store locator: file:<path>, <path> or aws:<region>:<bucket>
    #[arg(long, default_value = "file:./jobstore")]
    pub job_store: String,

    /// Source URLs to import (repeat or separate with commas)
    #[arg(long = "source", value_delimiter = ',')]
    pub sources: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_THREADS)]
    pub max_threads: usize,

    /// Manifest written into the job store after a successful import
    #[arg(long)]
    pub manifest: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn job_store(&self) -> &str {
        &self.job_store
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn max_threads(&self) -> usize {
        self.max_threads
    }

    fn manifest_name(&self) -> Option<&str> {
        self.manifest.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.job_store
            .parse::<crate::adapters::job_store::JobStoreLocator>()?;
        validate_sources("source", &self.sources)?;
        validate_range("max_threads", self.max_threads, 1, 256)?;
        if let Some(manifest) = &self.manifest {
            validate_store_relative_path("manifest", manifest)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_arguments() {
        let config = CliConfig::parse_from([
            "async-import",
            "--job-store",
            "aws:us-west-2:async-import-test",
            "--source",
            "http://example.com/a.zip,http://example.com/b.zip",
            "--source",
            "http://example.com/c.zip",
            "--max-threads",
            "4",
        ]);

        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.max_threads(), 4);
        assert!(config.manifest_name().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["async-import"]);

        assert_eq!(config.job_store, "file:./jobstore");
        assert_eq!(config.max_threads, DEFAULT_MAX_THREADS);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_zero_threads_fails_validation() {
        let config = CliConfig::parse_from(["async-import", "--max-threads", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_manifest_must_stay_inside_job_store() {
        let config = CliConfig::parse_from(["async-import", "--manifest", "manifest.json"]);
        assert!(config.validate().is_ok());

        for bad in ["", "/x.json", "../x.json"] {
            let config = CliConfig::parse_from(["async-import", "--manifest", bad]);
            assert!(config.validate().is_err(), "accepted manifest {:?}", bad);
        }
    }
}
