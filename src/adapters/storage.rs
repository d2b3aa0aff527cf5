use crate::core::Storage;
use crate::utils::error::Result;
use bytes::Bytes;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: Bytes) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 先寫入同目錄的暫存檔，再以 rename 原子替換
        let mut tmp_name = full_path.as_os_str().to_owned();
        tmp_name.push(format!(".tmp-{}", Uuid::new_v4()));
        let tmp_path = PathBuf::from(tmp_name);

        if let Err(e) = tokio::fs::write(&tmp_path, &data).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &full_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn stored_size(&self, path: &str) -> Result<Option<u64>> {
        match tokio::fs::metadata(self.base_path.join(path)).await {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(feature = "s3")]
pub use s3::S3Storage;

#[cfg(feature = "s3")]
mod s3 {
    use crate::core::Storage;
    use crate::utils::error::{ImportError, Result};
    use aws_config::{BehaviorVersion, SdkConfig};
    use aws_sdk_s3::config::Region;
    use aws_sdk_s3::primitives::ByteStream;
    use aws_sdk_s3::Client as S3Client;
    use bytes::Bytes;

    #[derive(Debug, Clone)]
    pub struct S3Storage {
        client: S3Client,
        bucket: String,
    }

    impl S3Storage {
        pub fn new(client: S3Client, bucket: String) -> Self {
            Self { client, bucket }
        }

        /// 使用預設憑證鏈建立指定區域的 S3 客戶端
        pub async fn connect(region: &str, bucket: &str) -> Self {
            let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
            let config = client_config(&shared, region);
            Self::new(S3Client::from_conf(config), bucket.to_string())
        }
    }

    // Virtual-hosted addressing (the SDK default) for real AWS buckets.
    fn client_config(shared: &SdkConfig, region: &str) -> aws_sdk_s3::Config {
        aws_sdk_s3::config::Builder::from(shared)
            .region(Region::new(region.to_string()))
            .build()
    }

    impl Storage for S3Storage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let resp = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(path)
                .send()
                .await
                .map_err(|e| ImportError::Storage {
                    message: format!("Failed to read s3://{}/{}: {}", self.bucket, path, e),
                })?;

            let data = resp.body.collect().await.map_err(|e| ImportError::Storage {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

            Ok(data.into_bytes().to_vec())
        }

        async fn write_file(&self, path: &str, data: Bytes) -> Result<()> {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(path)
                .body(ByteStream::from(data))
                .send()
                .await
                .map_err(|e| ImportError::Storage {
                    message: format!("Failed to write s3://{}/{}: {}", self.bucket, path, e),
                })?;

            Ok(())
        }

        async fn stored_size(&self, path: &str) -> Result<Option<u64>> {
            match self
                .client
                .head_object()
                .bucket(&self.bucket)
                .key(path)
                .send()
                .await
            {
                Ok(head) => Ok(Some(
                    head.content_length().map(|len| len.max(0) as u64).unwrap_or(0),
                )),
                Err(err) => match err.into_service_error() {
                    e if e.is_not_found() => Ok(None),
                    e => Err(ImportError::Storage {
                        message: format!("Failed to stat s3://{}/{}: {}", self.bucket, path, e),
                    }),
                },
            }
        }
    }

}
