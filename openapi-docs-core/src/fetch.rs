//! Parallel retrieval and decoding of stored definitions.

use futures::future::try_join_all;
use futures::TryStreamExt;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::addressing::service_name_to_key;
use crate::contract::{BucketClient, ObjectBody};
use crate::error::{DocsError, Result};

/// Fetch and parse the stored definition of every service in `services`.
///
/// All gets are issued together and awaited as one batch; the first
/// failure fails the whole batch. Results keep the order of `services`.
pub async fn fetch_definitions<C>(client: &C, prefix: &str, services: &[String]) -> Result<Vec<Value>>
where
    C: BucketClient + ?Sized,
{
    info!(count = services.len(), "Fetching stored definitions");

    let requests = services.iter().map(|service| async move {
        let key = service_name_to_key(prefix, service);
        client.get(&key).await.map_err(|e| {
            error!(error = ?e, key = %key, "Failed to fetch stored definition");
            DocsError::storage(key, e)
        })
    });
    let bodies = try_join_all(requests).await?;

    let texts = try_join_all(
        services
            .iter()
            .zip(bodies)
            .map(|(service, body)| read_to_string(prefix, service, body)),
    )
    .await?;

    services
        .iter()
        .zip(texts)
        .map(|(service, text)| parse_definition(service, &text))
        .collect()
}

/// Drain an object body and decode it as UTF-8.
async fn read_to_string(prefix: &str, service: &str, body: ObjectBody) -> Result<String> {
    let chunks: Vec<bytes::Bytes> = body.try_collect().await.map_err(|e| {
        error!(error = ?e, service, "Failed while reading definition body");
        DocsError::storage(service_name_to_key(prefix, service), e)
    })?;
    let bytes = chunks.concat();
    debug!(service, size = bytes.len(), "Read definition body");
    String::from_utf8(bytes).map_err(|e| DocsError::Decode {
        service: service.to_string(),
        reason: e.to_string(),
    })
}

fn parse_definition(service: &str, text: &str) -> Result<Value> {
    let decode_error = |reason: String| {
        error!(reason = %reason, service, "Stored definition is not valid YAML");
        DocsError::Decode {
            service: service.to_string(),
            reason,
        }
    };

    let mut document: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| decode_error(e.to_string()))?;
    // `<<` merge keys are resolved before the tree leaves YAML land.
    document
        .apply_merge()
        .map_err(|e| decode_error(e.to_string()))?;
    serde_json::to_value(document).map_err(|e| decode_error(e.to_string()))
}
