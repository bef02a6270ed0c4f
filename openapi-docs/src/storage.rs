//! # Bucket wiring for the CLI
//!
//! Builds the production [`BucketClient`] from a [`DocsConfig`]: an S3 store
//! from the `object_store` crate, wrapped in the core
//! [`ObjectStoreBucket`] adapter.
//!
//! Credentials are resolved by `AmazonS3Builder::from_env` (`AWS_ACCESS_KEY_ID`,
//! `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`, ...). Bucket and region always
//! come from the config, never from the AWS environment.
//!
//! [`BucketClient`]: openapi_docs_core::contract::BucketClient

use std::sync::Arc;

use anyhow::{Context, Result};
use object_store::aws::AmazonS3Builder;
use openapi_docs_core::config::DocsConfig;
use openapi_docs_core::store::ObjectStoreBucket;

pub fn s3_bucket(config: &DocsConfig) -> Result<ObjectStoreBucket> {
    let store = AmazonS3Builder::from_env()
        .with_bucket_name(&config.bucket)
        .with_region(&config.region)
        .build()
        .map_err(|e| {
            tracing::error!(error = ?e, bucket = %config.bucket, "Failed to construct S3 client");
            e
        })
        .with_context(|| format!("failed to construct S3 client for bucket {}", config.bucket))?;

    tracing::info!(
        bucket = %config.bucket,
        region = %config.region,
        "Initialized S3 client from environment"
    );
    Ok(ObjectStoreBucket::new(Arc::new(store)))
}
