use tracing::{debug, error, info};

use crate::addressing::{is_definition_key, key_to_service_name, listing_prefix};
use crate::contract::BucketClient;
use crate::error::{DocsError, Result};

/// Names of all services with a stored definition directly under `prefix`.
///
/// Order is the order the bucket listed the keys in.
pub async fn discover_service_names<C>(client: &C, prefix: &str) -> Result<Vec<String>>
where
    C: BucketClient + ?Sized,
{
    let listing_prefix = listing_prefix(prefix);
    let keys = client.list(&listing_prefix).await.map_err(|e| {
        error!(error = ?e, prefix = %listing_prefix, "Failed to list stored definitions");
        DocsError::storage(listing_prefix.clone(), e)
    })?;

    let services: Vec<String> = keys
        .iter()
        .filter(|key| {
            let keep = is_definition_key(key);
            if !keep {
                debug!(key = %key, "Skipping non-definition object");
            }
            keep
        })
        .filter_map(|key| key_to_service_name(key))
        .map(str::to_string)
        .collect();

    info!(count = services.len(), services = ?services, "Discovered service definitions");
    Ok(services)
}
