#![allow(unused)]

//! # contract: seams between the pipeline and its external collaborators
//!
//! The pipeline talks to three things it does not implement itself:
//! - the bucket holding the definitions and the published docs ([`BucketClient`])
//! - the OpenAPI merge step ([`Merger`])
//! - the HTML renderer, an external process in production ([`Renderer`])
//!
//! Each one is a narrow trait so the orchestrator can be driven by real
//! clients in the CLI and by `mockall` mocks in tests. Mocks are exported
//! behind the `test-export-mocks` feature so dependent crates can use them.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use mockall::{automock, predicate::*};
use serde_json::Value;

use crate::merge::MergeError;
use crate::render::RenderError;

/// Errors surfaced by a bucket client. Transport details stay opaque.
pub type StorageError = Box<dyn std::error::Error + Send + Sync>;

/// Body of a stored object, yielded chunk by chunk.
pub type ObjectBody = BoxStream<'static, Result<Bytes, StorageError>>;

/// A single object write, with the HTTP metadata the bucket should serve it with.
#[derive(Debug, Clone, PartialEq)]
pub struct PutObject {
    /// Full object key, relative to the bucket root.
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    /// Optional `Cache-Control` header value.
    pub cache_control: Option<String>,
}

/// Minimal object-storage surface used by the pipeline.
///
/// Implementors own the bucket name, region and credentials; callers only
/// deal in keys relative to the bucket root.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BucketClient: Send + Sync {
    /// List the keys of objects directly under `prefix` (one level, delimiter `/`).
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Open the body of the object stored at `key`.
    async fn get(&self, key: &str) -> Result<ObjectBody, StorageError>;

    /// Create or overwrite an object.
    async fn put(&self, object: PutObject) -> Result<(), StorageError>;
}

/// Combines parsed OpenAPI definitions into one specification.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Merger: Send + Sync {
    /// Merge `definitions` in the given order. Order decides first-wins fields.
    fn merge(&self, definitions: Vec<Value>) -> Result<Value, MergeError>;
}

/// Turns a merged specification on disk into an HTML document on disk.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, spec_path: &Path, out_path: &Path) -> Result<(), RenderError>;
}
