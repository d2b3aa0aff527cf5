use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Reference to a remote resource to import, usually a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for SourceRef {
    fn from(source: String) -> Self {
        Self(source)
    }
}

/// Content-derived identifier of a file in the job store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    const NAMESPACE: Uuid = Uuid::NAMESPACE_OID;

    pub fn from_content(data: &[u8]) -> Self {
        Self(Uuid::new_v5(&Self::NAMESPACE, data))
    }

    /// Key under which the file's bytes live in the job store.
    pub fn store_path(&self) -> String {
        format!("files/{}", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedHandle {
    pub file_id: FileId,
    pub size: u64,
}

/// A finished import, keeping the source next to the handle it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedFile {
    pub source: SourceRef,
    #[serde(flatten)]
    pub handle: ImportedHandle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportManifest {
    pub job_store: String,
    pub created_at: DateTime<Utc>,
    pub files: Vec<ImportedFile>,
}

impl ImportManifest {
    pub fn new(job_store: impl Into<String>, files: Vec<ImportedFile>) -> Self {
        Self {
            job_store: job_store.into(),
            created_at: Utc::now(),
            files,
        }
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.handle.size).sum()
    }
}
