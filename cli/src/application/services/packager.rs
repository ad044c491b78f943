//! Function code packaging.
//!
//! Every function resource whose `Code` property names a local directory is
//! zipped, uploaded to the asset bucket, and rewritten to point at the
//! uploaded object. Uploads for different resources run concurrently.

use std::path::Path;

use anyhow::{Context, Result};
use futures_util::future::try_join_all;

use super::bucket::ensure_bucket;
use crate::application::ports::{AssetStore, LocalFiles};
use crate::domain::Template;
use crate::domain::template::{asset_key, code_directory};

/// Inputs of one packaging run.
#[derive(Debug, Clone, Copy)]
pub struct PackageRequest<'a> {
    pub stack_name: &'a str,
    pub bucket: &'a str,
    pub template_path: &'a Path,
    pub region: &'a str,
}

/// Provision the bucket, upload code assets, and return the rewritten
/// template body.
///
/// # Errors
///
/// Returns an error if the template cannot be read or parsed, or if any
/// archive or upload fails. Uploads already finished are left in place.
pub async fn package_template(
    store: &impl AssetStore,
    files: &impl LocalFiles,
    request: &PackageRequest<'_>,
) -> Result<String> {
    let body = files.read_template(request.template_path)?;
    ensure_bucket(store, request.stack_name, request.bucket, request.region).await?;

    let mut template = Template::parse(&body)?;
    let cwd = files.current_dir()?;
    let uploads = template.code_references().into_iter().map(|reference| {
        let dir = code_directory(request.template_path, &reference.path);
        let key = asset_key(&cwd, &dir);
        async move {
            let archive = files
                .archive_directory(&dir)
                .await
                .with_context(|| format!("failed to package {}", reference.resource))?;
            let size = archive.len();
            store.put_object(request.bucket, &key, archive).await?;
            tracing::debug!(resource = %reference.resource, key = %key, size, "uploaded code asset");
            Ok::<_, anyhow::Error>((reference.resource, key))
        }
    });

    for (resource, key) in try_join_all(uploads).await? {
        template.set_code_location(&resource, request.bucket, &key);
    }
    Ok(template.render()?)
}
