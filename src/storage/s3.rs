//! A [`FileSystem`] over an S3-compatible object store such as MinIO.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::{Builder, Credentials};
use aws_sdk_s3::Client;
use tracing::trace;

use super::{framing_offset, FileSystem, LineRecords, RecordReader};

/// Builds a path-style S3 client for a MinIO endpoint.
pub fn get_min_io_client(base_url: &str, access_id: &str, access_key: &str) -> Client {
    let credentials = Credentials::new(access_id, access_key, None, None, "minio");

    let config = Builder::new()
        .region(Region::new("us-east-1"))
        .endpoint_url(base_url)
        .credentials_provider(credentials)
        .force_path_style(true)
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .build();

    Client::from_conf(config)
}

/// Serves resources as objects of one bucket.
#[derive(Clone, Debug)]
pub struct S3FileSystem {
    client: Client,
    bucket: String,
    nodes: Vec<String>,
}

impl S3FileSystem {
    pub fn new(client: Client, bucket: impl Into<String>, nodes: Vec<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            nodes,
        }
    }
}

/// The `Range` header fetching everything from `offset` to the end of the
/// object. Reads run past the range end to finish its last line.
fn range_header(offset: u64) -> String {
    format!("bytes={}-", offset)
}

#[async_trait]
impl FileSystem for S3FileSystem {
    async fn nodes(&self) -> Result<Vec<String>> {
        Ok(self.nodes.clone())
    }

    async fn length(&self, name: &str) -> Result<u64> {
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .with_context(|| format!("Failed to stat s3://{}/{}", self.bucket, name))?;
        let length = head
            .content_length()
            .ok_or_else(|| anyhow!("s3://{}/{} has no content length", self.bucket, name))?;
        Ok(u64::try_from(length)?)
    }

    async fn read_file(&self, name: &str, start: u64, end: u64) -> Result<Box<dyn RecordReader>> {
        let offset = framing_offset(start);
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name)
            .range(range_header(offset))
            .send()
            .await
            .with_context(|| format!("Failed to read s3://{}/{}", self.bucket, name))?;
        trace!(bucket = %self.bucket, name, start, end, "opened s3 record stream");
        let body = Box::pin(object.body.into_async_read());
        Ok(Box::new(LineRecords::new(body, start, end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_starts_one_byte_early() {
        assert_eq!(range_header(framing_offset(0)), "bytes=0-");
        assert_eq!(range_header(framing_offset(100)), "bytes=99-");
    }

    #[tokio::test]
    async fn nodes_are_fixed_at_construction() {
        let client = get_min_io_client("http://127.0.0.1:9000", "ROOTNAME", "CHANGEME123");
        let fs = S3FileSystem::new(client, "mrl-lite", vec!["w1:50051".into()]);
        assert_eq!(fs.nodes().await.unwrap(), vec!["w1:50051".to_string()]);
    }
}
