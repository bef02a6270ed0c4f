use std::path::Path;

use tracing::{error, info};

use crate::addressing::service_name_to_key;
use crate::config::DEFINITION_CONTENT_TYPE;
use crate::contract::{BucketClient, PutObject};
use crate::error::{DocsError, Result};

/// Upload the local definition at `definition_path` as the stored definition of `service`.
///
/// The file is read before anything is written, so a missing file leaves
/// the bucket untouched. Returns the key written.
pub async fn upload_definition<C>(
    client: &C,
    prefix: &str,
    service: &str,
    definition_path: &Path,
) -> Result<String>
where
    C: BucketClient + ?Sized,
{
    let body = tokio::fs::read(definition_path).await.map_err(|e| {
        error!(error = ?e, path = %definition_path.display(), "Failed to read local OpenAPI definition");
        DocsError::io(definition_path, e)
    })?;

    let key = service_name_to_key(prefix, service);
    info!(service, key = %key, size = body.len(), "Uploading OpenAPI definition");

    client
        .put(PutObject {
            key: key.clone(),
            body,
            content_type: DEFINITION_CONTENT_TYPE.to_string(),
            cache_control: None,
        })
        .await
        .map_err(|e| {
            error!(error = ?e, key = %key, "Failed to upload OpenAPI definition");
            DocsError::storage(key.clone(), e)
        })?;

    Ok(key)
}
