use std::path::Path;

use tracing::{error, info};

use crate::config::{HTML_CONTENT_TYPE, NO_CACHE};
use crate::contract::{BucketClient, PutObject};
use crate::error::{DocsError, Result};

/// Publish the rendered docs at `html_path` to `key`, served as HTML and never cached.
pub async fn publish_docs<C>(client: &C, html_path: &Path, key: &str) -> Result<()>
where
    C: BucketClient + ?Sized,
{
    let body = tokio::fs::read(html_path).await.map_err(|e| {
        error!(error = ?e, path = %html_path.display(), "Failed to read rendered docs");
        DocsError::io(html_path, e)
    })?;

    info!(key, size = body.len(), "Publishing rendered docs");
    client
        .put(PutObject {
            key: key.to_string(),
            body,
            content_type: HTML_CONTENT_TYPE.to_string(),
            cache_control: Some(NO_CACHE.to_string()),
        })
        .await
        .map_err(|e| {
            error!(error = ?e, key, "Failed to publish rendered docs");
            DocsError::storage(key, e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MockBucketClient;

    #[tokio::test]
    async fn puts_html_with_no_cache_headers() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("docs.html");
        std::fs::write(&html, "<html></html>").unwrap();

        let mut client = MockBucketClient::new();
        client
            .expect_put()
            .withf(|object: &PutObject| {
                object.key == "index.html"
                    && object.body == b"<html></html>"
                    && object.content_type == "text/html"
                    && object.cache_control.as_deref()
                        == Some("max-age=0,no-cache,no-store,must-revalidate")
            })
            .times(1)
            .returning(|_| Ok(()));

        publish_docs(&client, &html, "index.html").await.unwrap();
    }

    #[tokio::test]
    async fn missing_html_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = MockBucketClient::new();
        client.expect_put().times(0);

        let err = publish_docs(&client, &dir.path().join("missing.html"), "index.html")
            .await
            .unwrap_err();
        assert!(matches!(err, DocsError::Io { .. }));
    }
}
