use crate::adapters::job_store::JobStoreLocator;
use crate::core::importer::DEFAULT_MAX_THREADS;
use crate::core::ConfigProvider;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{
    validate_range, validate_sources, validate_store_relative_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job_store: JobStoreConfig,
    pub import: ImportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStoreConfig {
    pub locator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    pub max_threads: Option<usize>,
    #[serde(default)]
    pub sources: Vec<String>,
    pub manifest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ImportError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${JOB_STORE})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn locator(&self) -> Result<JobStoreLocator> {
        self.job_store.locator.parse()
    }

    pub fn max_threads(&self) -> usize {
        self.import.max_threads.unwrap_or(DEFAULT_MAX_THREADS)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn job_store(&self) -> &str {
        &self.job_store.locator
    }

    fn sources(&self) -> &[String] {
        &self.import.sources
    }

    fn max_threads(&self) -> usize {
        TomlConfig::max_threads(self)
    }

    fn manifest_name(&self) -> Option<&str> {
        self.import.manifest.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.locator()?;
        validate_sources("import.sources", &self.import.sources)?;
        validate_range("import.max_threads", self.max_threads(), 1, 256)?;

        if let Some(manifest) = &self.import.manifest {
            validate_store_relative_path("import.manifest", manifest)?;
        }

        tracing::debug!("TOML configuration validation passed");
        Ok(())
    }
}
