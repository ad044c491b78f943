//! S3 implementation of the `AssetStore` port.

use std::time::Duration;

use anyhow::Result;
use aws_sdk_s3::Client;
use aws_sdk_s3::client::Waiters;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, PublicAccessBlockConfiguration,
    Tag as S3Tag, Tagging,
};

use crate::application::ports::{AssetStore, BucketCreation};
use crate::domain::Tag;

/// The region whose buckets must be created without a location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// Upper bound for a new bucket to become visible.
const BUCKET_WAIT: Duration = Duration::from_secs(120);

/// `AssetStore` backed by the S3 SDK client.
pub struct S3AssetStore {
    client: Client,
}

impl S3AssetStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn api_error(action: &str, bucket: &str, err: impl std::error::Error) -> anyhow::Error {
    anyhow::anyhow!("{action} {bucket}: {}", DisplayErrorContext(err))
}

impl AssetStore for S3AssetStore {
    async fn bucket_exists(&self, bucket: &str) -> bool {
        self.client.head_bucket().bucket(bucket).send().await.is_ok()
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<BucketCreation> {
        let mut request = self.client.create_bucket().bucket(bucket);
        if region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }
        match request.send().await {
            Ok(_) => Ok(BucketCreation::Created),
            Err(e) if e.raw_response().is_some_and(|r| r.status().as_u16() == 409) => {
                Ok(BucketCreation::AlreadyExists)
            }
            Err(e) => Err(api_error("failed to create bucket", bucket, e)),
        }
    }

    async fn tag_bucket(&self, bucket: &str, tags: &[Tag]) -> Result<()> {
        let tag_set = tags
            .iter()
            .map(|t| S3Tag::builder().key(&t.key).value(&t.value).build())
            .collect::<Result<Vec<_>, _>>()?;
        self.client
            .put_bucket_tagging()
            .bucket(bucket)
            .tagging(Tagging::builder().set_tag_set(Some(tag_set)).build()?)
            .send()
            .await
            .map_err(|e| api_error("failed to tag bucket", bucket, e))?;
        Ok(())
    }

    async fn block_public_access(&self, bucket: &str) -> Result<()> {
        let config = PublicAccessBlockConfiguration::builder()
            .block_public_acls(true)
            .ignore_public_acls(true)
            .block_public_policy(true)
            .restrict_public_buckets(true)
            .build();
        self.client
            .put_public_access_block()
            .bucket(bucket)
            .public_access_block_configuration(config)
            .send()
            .await
            .map_err(|e| api_error("failed to block public access on", bucket, e))?;
        Ok(())
    }

    async fn wait_for_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .wait_until_bucket_exists()
            .bucket(bucket)
            .wait(BUCKET_WAIT)
            .await
            .map_err(|e| api_error("gave up waiting for bucket", bucket, e))?;
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| api_error(&format!("failed to upload {key} to"), bucket, e))?;
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| api_error("failed to list objects in", bucket, e))?;
            keys.extend(page.contents().iter().filter_map(|o| o.key().map(str::to_string)));
            continuation = page.next_continuation_token().map(str::to_string);
            if continuation.is_none() {
                return Ok(keys);
            }
        }
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| api_error(&format!("failed to delete {key} from"), bucket, e))?;
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| api_error("failed to delete bucket", bucket, e))?;
        Ok(())
    }
}
