use crate::utils::error::{ImportError, Result};
use std::path::{Component, Path};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Schemes the URL importer knows how to fetch.
pub const SOURCE_SCHEMES: &[&str] = &["http", "https", "file"];

pub fn validate_url(field_name: &str, url_str: &str, allowed_schemes: &[&str]) -> Result<()> {
    if url_str.is_empty() {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) if allowed_schemes.contains(&url.scheme()) => Ok(()),
        Ok(url) => Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!(
                "Unsupported URL scheme: {}. Allowed schemes: {}",
                url.scheme(),
                allowed_schemes.join(", ")
            ),
        }),
        Err(e) => Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_sources(field_name: &str, sources: &[String]) -> Result<()> {
    for (index, source) in sources.iter().enumerate() {
        validate_url(&format!("{}[{}]", field_name, index), source, SOURCE_SCHEMES)?;
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Names of objects inside the job store must stay inside it.
pub fn validate_store_relative_path(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;
    validate_path(field_name, path)?;

    let as_path = Path::new(path);
    let reason = if path.starts_with(['/', '\\']) || as_path.is_absolute() {
        Some("Path must be relative to the job store")
    } else if as_path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        Some("Path must not leave the job store")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source", "https://example.com/a.zip", SOURCE_SCHEMES).is_ok());
        assert!(validate_url("source", "http://example.com", SOURCE_SCHEMES).is_ok());
        assert!(validate_url("source", "file:///tmp/a.txt", SOURCE_SCHEMES).is_ok());
        assert!(validate_url("source", "", SOURCE_SCHEMES).is_err());
        assert!(validate_url("source", "invalid-url", SOURCE_SCHEMES).is_err());
        assert!(validate_url("source", "ftp://example.com", SOURCE_SCHEMES).is_err());
    }

    #[test]
    fn test_validate_sources_reports_index() {
        let sources = vec![
            "https://example.com/a.zip".to_string(),
            "gopher://example.com/b".to_string(),
        ];

        match validate_sources("import.sources", &sources) {
            Err(ImportError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "import.sources[1]");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("max_threads", 8, 1, 256).is_ok());
        assert!(validate_range("max_threads", 0, 1, 256).is_err());
        assert!(validate_range("max_threads", 512, 1, 256).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("job_store", "./jobstore").is_ok());
        assert!(validate_path("job_store", "").is_err());
        assert!(validate_path("job_store", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_store_relative_path() {
        assert!(validate_store_relative_path("manifest", "manifest.json").is_ok());
        assert!(validate_store_relative_path("manifest", "runs/2024/manifest.json").is_ok());
        assert!(validate_store_relative_path("manifest", "").is_err());
        assert!(validate_store_relative_path("manifest", "   ").is_err());
        assert!(validate_store_relative_path("manifest", "/x.json").is_err());
        assert!(validate_store_relative_path("manifest", "../x.json").is_err());
        assert!(validate_store_relative_path("manifest", "runs/../../x.json").is_err());
    }
}
