//! Object storage client for book media assets (cover, pdf, audio)

use aws_sdk_s3::{primitives::ByteStream, Client};
use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct StorageService {
    client: Client,
    bucket: String,
    public_url: String,
}

impl StorageService {
    pub async fn new(config: &StorageConfig) -> Self {
        let sdk_config = aws_config::from_env()
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            bucket: config.bucket.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload an asset and return its absolute public URL.
    /// The object key is a generated identifier plus the original extension.
    pub async fn put_object(
        &self,
        folder: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> AppResult<String> {
        let key = object_key(folder, filename);
        tracing::debug!("Uploading {} bytes to {}", data.len(), key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(format!("{}/{}", self.public_url, key))
    }
}

/// Build the storage key: `{folder}/{uuid}.{original extension}`.
/// Files without an extension get a bare uuid key.
fn object_key(folder: &str, filename: &str) -> String {
    let id = Uuid::new_v4();
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{}/{}.{}", folder, id, ext),
        _ => format!("{}/{}", folder, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_keeps_extension() {
        let key = object_key("books", "cover.png");
        assert!(key.starts_with("books/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_object_key_without_extension() {
        let key = object_key("books", "cover");
        assert!(key.starts_with("books/"));
        assert!(!key.contains('.'));
    }
}
