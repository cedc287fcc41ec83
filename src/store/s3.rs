//! S3对象存储客户端
//!
//! 设计原则：
//! - 只提供原语（list_objects, put_object, delete_object）
//! - 大文件分片上传，每片8MB，逐片报告进度
//! - 不做重试，调用失败由上层编排决定

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::serde_types::Part;
use s3::Region;

use super::{ObjectInfo, ObjectListing, ObjectStore, ProgressCallback};
use crate::config::BrowserConfig;

const CHUNK_SIZE: usize = 8 * 1024 * 1024; // 8MB per chunk (S3最小5MB)

/// rust-s3 backed object store / 基于rust-s3的对象存储
pub struct S3Store {
    bucket: Box<Bucket>,
}

impl S3Store {
    /// 创建新的S3客户端实例
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let bucket = Self::create_bucket(config)?;
        Ok(Self { bucket })
    }

    /// 创建S3 Bucket客户端
    fn create_bucket(config: &BrowserConfig) -> Result<Box<Bucket>> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| anyhow!("创建S3凭证失败: {}", e))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| anyhow!("创建S3 Bucket失败: {}", e))?;

        let bucket = if config.force_path_style {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(bucket)
    }

    /// 分片上传，每片完成后报告一次进度
    async fn put_multipart(
        &self,
        key: &str,
        body: Bytes,
        progress: Option<&ProgressCallback>,
    ) -> Result<()> {
        let total = body.len() as u64;

        let init_response = self
            .bucket
            .initiate_multipart_upload(key, "application/octet-stream")
            .await
            .map_err(|e| anyhow!("初始化分片上传失败: {}", e))?;
        let upload_id = init_response.upload_id;

        tracing::debug!("S3分片上传开始: key={}, upload_id={}", key, upload_id);

        let mut completed_parts: Vec<Part> = Vec::new();
        let mut uploaded: u64 = 0;

        for (idx, chunk) in body.chunks(CHUNK_SIZE).enumerate() {
            let part_number = idx as u32 + 1;
            let response = self
                .bucket
                .put_multipart_chunk(
                    chunk.to_vec(),
                    key,
                    part_number,
                    &upload_id,
                    "application/octet-stream",
                )
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    let _ = self.bucket.abort_upload(key, &upload_id).await;
                    return Err(anyhow!("上传分片失败: part={}, error={}", part_number, e));
                }
            };

            completed_parts.push(Part {
                part_number,
                etag: response.etag,
            });

            uploaded += chunk.len() as u64;
            if let Some(cb) = progress {
                cb(uploaded, total);
            }
        }

        self.bucket
            .complete_multipart_upload(key, &upload_id, completed_parts)
            .await
            .map_err(|e| anyhow!("完成分片上传失败: {}", e))?;

        tracing::debug!("S3分片上传完成: key={}", key);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_objects(&self, prefix: &str, delimiter: Option<&str>) -> Result<ObjectListing> {
        let results = self
            .bucket
            .list(prefix.to_string(), delimiter.map(|d| d.to_string()))
            .await
            .map_err(|e| anyhow!("列出S3对象失败: {}", e))?;

        let mut listing = ObjectListing::default();

        for result in results {
            for cp in result.common_prefixes.unwrap_or_default() {
                listing.common_prefixes.push(cp.prefix);
            }

            for obj in result.contents {
                let last_modified = DateTime::parse_from_rfc3339(&obj.last_modified)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc));
                listing.contents.push(ObjectInfo {
                    key: obj.key,
                    last_modified,
                    size: obj.size as u64,
                });
            }
        }

        Ok(listing)
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        progress: Option<ProgressCallback>,
    ) -> Result<()> {
        let total = body.len() as u64;

        if let Some(cb) = &progress {
            cb(0, total);
        }

        if body.len() > CHUNK_SIZE {
            return self.put_multipart(key, body, progress.as_ref()).await;
        }

        self.bucket
            .put_object(key, &body)
            .await
            .map_err(|e| anyhow!("上传S3对象失败: {}", e))?;

        if let Some(cb) = &progress {
            cb(total, total);
        }

        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| anyhow!("删除S3对象失败: {}", e))?;
        Ok(())
    }
}
