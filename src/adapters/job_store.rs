use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where imported files land.
///
/// Accepted forms:
/// - `file:<path>` or a bare path: a local directory
/// - `aws:<region>:<bucket>`: an S3 bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStoreLocator {
    File { path: PathBuf },
    Aws { region: String, bucket: String },
}

impl FromStr for JobStoreLocator {
    type Err = ImportError;

    fn from_str(locator: &str) -> Result<Self> {
        if let Some(rest) = locator.strip_prefix("aws:") {
            let Some((region, bucket)) = rest.split_once(':') else {
                return Err(ImportError::InvalidConfigValueError {
                    field: "job_store".to_string(),
                    value: locator.to_string(),
                    reason: "Expected aws:<region>:<bucket>".to_string(),
                });
            };
            validate_aws_region("job_store.region", region)?;
            validate_s3_bucket_name("job_store.bucket", bucket)?;
            return Ok(JobStoreLocator::Aws {
                region: region.to_string(),
                bucket: bucket.to_string(),
            });
        }

        let path = locator.strip_prefix("file:").unwrap_or(locator);
        validate_path("job_store", path)?;
        Ok(JobStoreLocator::File {
            path: PathBuf::from(path),
        })
    }
}

impl fmt::Display for JobStoreLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStoreLocator::File { path } => write!(f, "file:{}", path.display()),
            JobStoreLocator::Aws { region, bucket } => write!(f, "aws:{}:{}", region, bucket),
        }
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name must be between 3 and 63 characters".to_string(),
        });
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots"
                .to_string(),
        });
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name cannot start or end with a hyphen".to_string(),
        });
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}
