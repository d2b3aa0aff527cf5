use crate::core::{FileImporter, ImportedHandle, SourceRef, Storage};
use crate::domain::model::FileId;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use url::Url;

/// Imports `http`, `https` and `file` URLs into a content-addressed job store.
pub struct UrlImporter<S: Storage> {
    storage: S,
    client: Client,
}

impl<S: Storage> UrlImporter<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            client: Client::new(),
        }
    }

    pub fn with_client(storage: S, client: Client) -> Self {
        Self { storage, client }
    }

    async fn fetch(&self, source: &SourceRef) -> Result<Bytes> {
        let url = Url::parse(source.as_str()).map_err(|e| ImportError::UnsupportedSource {
            source_ref: source.to_string(),
            reason: format!("Invalid URL: {}", e),
        })?;

        match url.scheme() {
            "http" | "https" => {
                tracing::debug!("Downloading {}", url);
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ImportError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes().await?)
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| ImportError::UnsupportedSource {
                        source_ref: source.to_string(),
                        reason: "Not a local file path".to_string(),
                    })?;
                tracing::debug!("Reading {}", path.display());
                Ok(Bytes::from(tokio::fs::read(path).await?))
            }
            scheme => Err(ImportError::UnsupportedSource {
                source_ref: source.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        }
    }
}

#[async_trait]
impl<S: Storage> FileImporter for UrlImporter<S> {
    async fn import_file(&self, source: &SourceRef) -> Result<ImportedHandle> {
        let data = self.fetch(source).await?;
        let file_id = FileId::from_content(&data);
        let path = file_id.store_path();
        let size = data.len() as u64;

        match self.storage.stored_size(&path).await? {
            Some(stored) if stored == size => {
                tracing::debug!("{} already stored as {}, skipping write", source, file_id);
            }
            Some(stored) => {
                tracing::warn!(
                    "Stored copy of {} has {} bytes, expected {}; rewriting",
                    file_id,
                    stored,
                    size
                );
                self.storage.write_file(&path, data).await?;
            }
            None => self.storage.write_file(&path, data).await?,
        }

        Ok(ImportedHandle { file_id, size })
    }
}
