//! Asset bucket provisioning and teardown.

use anyhow::Result;
use futures_util::future::try_join_all;

use crate::application::ports::{AssetStore, BucketCreation};
use crate::domain::stack::{BUCKET_NAME_TAG, BUCKET_ROLE_TAG};
use crate::domain::{Stack, Tag};

/// Make sure `bucket` exists, is owned by `stack_name`, and is private.
///
/// Safe to call on every install. The public-access block is applied even
/// when the bucket already existed.
///
/// # Errors
///
/// Returns any storage error other than a creation conflict.
pub async fn ensure_bucket(
    store: &impl AssetStore,
    stack_name: &str,
    bucket: &str,
    region: &str,
) -> Result<()> {
    if store.bucket_exists(bucket).await {
        tracing::debug!(bucket, "asset bucket already exists");
    } else {
        match store.create_bucket(bucket, region).await? {
            BucketCreation::Created => {
                let owner = Tag {
                    key: BUCKET_ROLE_TAG.to_string(),
                    value: stack_name.to_string(),
                };
                store.tag_bucket(bucket, &[owner]).await?;
                tracing::info!(bucket, region, "created asset bucket");
            }
            BucketCreation::AlreadyExists => {
                tracing::debug!(bucket, "asset bucket created concurrently");
            }
        }
    }
    store.block_public_access(bucket).await?;
    store.wait_for_bucket(bucket).await
}

/// Empty and delete the asset bucket recorded on `stack`.
///
/// Does nothing when the stack carries no bucket tag or the bucket is gone.
///
/// # Errors
///
/// Returns the first failed deletion.
pub async fn delete_asset_bucket(store: &impl AssetStore, stack: &Stack) -> Result<()> {
    let Some(bucket) = stack.tag(BUCKET_NAME_TAG) else {
        tracing::debug!(stack = %stack.stack_name, "stack has no asset bucket tag");
        return Ok(());
    };
    if !store.bucket_exists(bucket).await {
        tracing::debug!(bucket, "asset bucket already removed");
        return Ok(());
    }
    let keys = store.list_objects(bucket).await?;
    try_join_all(keys.iter().map(|key| store.delete_object(bucket, key))).await?;
    store.delete_bucket(bucket).await?;
    tracing::info!(bucket, objects = keys.len(), "deleted asset bucket");
    Ok(())
}
