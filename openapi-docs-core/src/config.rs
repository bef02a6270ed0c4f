use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Region the docs bucket lives in.
pub const REGION: &str = "eu-central-1";
/// Folder under which every service stores its definition.
pub const DEFINITIONS_PREFIX: &str = "openapi-files";
/// Key of the published docs, at the bucket root.
pub const INDEX_KEY: &str = "index.html";

pub const DEFINITION_CONTENT_TYPE: &str = "text/x-yaml";
pub const HTML_CONTENT_TYPE: &str = "text/html";
pub const NO_CACHE: &str = "max-age=0,no-cache,no-store,must-revalidate";

/// Everything a pipeline run needs to know about where things live.
///
/// Built once by the caller and passed into the orchestrator; nothing in
/// the core crate reads process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocsConfig {
    pub bucket: String,
    pub region: String,
    pub prefix: String,
    pub index_key: String,
    pub artifacts: ArtifactPaths,
    pub renderer: RendererCommand,
}

impl DocsConfig {
    /// Config with the fixed region, prefix and index key and the default local paths.
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: REGION.to_string(),
            prefix: DEFINITIONS_PREFIX.to_string(),
            index_key: INDEX_KEY.to_string(),
            artifacts: ArtifactPaths::default(),
            renderer: RendererCommand::default(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.bucket,
            region = %self.region,
            prefix = %self.prefix,
            "Loaded DocsConfig"
        );
        debug!(?self, "DocsConfig loaded (full debug)");
    }
}

/// Local files the pipeline reads and writes, relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactPaths {
    /// The invoking service's own definition.
    pub definition: PathBuf,
    /// Merged specification, compact JSON.
    pub merged_spec: PathBuf,
    /// Rendered HTML document.
    pub rendered_html: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            definition: PathBuf::from("./openapi-definition.yml"),
            merged_spec: PathBuf::from("./talentwunder-api.json"),
            rendered_html: PathBuf::from("./talentwunder-api.html"),
        }
    }
}

/// External renderer invocation; output and input paths are appended as
/// `-o <out> <spec>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RendererCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for RendererCommand {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec![
                "--yes".to_string(),
                "redoc-cli".to_string(),
                "build".to_string(),
            ],
        }
    }
}
