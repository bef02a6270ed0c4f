//! High-level pipeline: upload → discover → fetch → merge → render → publish.
//!
//! Every step needs the complete output of the one before it, so the steps
//! run strictly one after another. The only concurrency is inside the fetch
//! step (see [`crate::fetch`]).
//!
//! # Error Handling
//! The first failing step aborts the run and its error is returned as-is.
//! Nothing is retried or rolled back: an uploaded definition stays uploaded
//! even when rendering fails later on.
//!
//! # Navigation
//! - Main entrypoint: [`run_pipeline`]
//! - Docs regeneration without an upload: [`generate_docs`]

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::config::DocsConfig;
use crate::contract::{BucketClient, Merger, Renderer};
use crate::discover::discover_service_names;
use crate::error::{DocsError, Result};
use crate::fetch::fetch_definitions;
use crate::merge::write_merged_spec;
use crate::publish::publish_docs;
use crate::upload::upload_definition;

/// Where a run is. Any stage can end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    Uploading,
    Discovering,
    Fetching,
    Merging,
    Rendering,
    Publishing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not-started",
            Stage::Uploading => "uploading",
            Stage::Discovering => "discovering",
            Stage::Fetching => "fetching",
            Stage::Merging => "merging",
            Stage::Rendering => "rendering",
            Stage::Publishing => "publishing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Key of the definition uploaded by this run, if any.
    pub uploaded_key: Option<String>,
    /// Services whose definitions were merged, in merge order.
    pub services: Vec<String>,
    /// Number of distinct paths in the merged specification.
    pub merged_paths: usize,
    pub merged_spec: PathBuf,
    pub published_key: String,
}

async fn in_stage<T, F>(stage: Stage, step: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    info!(stage = %stage, "Entering stage");
    step.await.map_err(|e| {
        error!(stage = %Stage::Failed, failed_stage = %stage, error = %e, "Stage failed, aborting run");
        e
    })
}

/// Upload `service`'s local definition, then regenerate and publish the docs.
pub async fn run_pipeline<C, M, R>(
    config: &DocsConfig,
    service: &str,
    client: &C,
    merger: &M,
    renderer: &R,
) -> Result<PipelineReport>
where
    C: BucketClient + ?Sized,
    M: Merger + ?Sized,
    R: Renderer + ?Sized,
{
    info!(stage = %Stage::NotStarted, service, bucket = %config.bucket, "Starting docs pipeline");

    if service.trim().is_empty() {
        error!("No service name given");
        return Err(DocsError::Config("service name must not be empty".to_string()));
    }
    if service.contains('/') || service.contains('.') {
        warn!(service, "Service name contains '/' or '.', its stored key will not map back to it");
    }

    let uploaded_key = in_stage(
        Stage::Uploading,
        upload_definition(client, &config.prefix, service, &config.artifacts.definition),
    )
    .await?;

    let mut report = generate_docs(config, client, merger, renderer).await?;
    report.uploaded_key = Some(uploaded_key);
    Ok(report)
}

/// Rebuild the merged docs from whatever definitions are currently stored and publish them.
pub async fn generate_docs<C, M, R>(
    config: &DocsConfig,
    client: &C,
    merger: &M,
    renderer: &R,
) -> Result<PipelineReport>
where
    C: BucketClient + ?Sized,
    M: Merger + ?Sized,
    R: Renderer + ?Sized,
{
    let services = in_stage(
        Stage::Discovering,
        discover_service_names(client, &config.prefix),
    )
    .await?;

    let definitions = in_stage(
        Stage::Fetching,
        fetch_definitions(client, &config.prefix, &services),
    )
    .await?;

    let merged_spec = &config.artifacts.merged_spec;
    let merged_paths = in_stage(Stage::Merging, async {
        let merged = merger.merge(definitions)?;
        let merged_paths = merged
            .get("paths")
            .and_then(|p| p.as_object())
            .map_or(0, |p| p.len());
        write_merged_spec(merged_spec, &merged).await?;
        Ok(merged_paths)
    })
    .await?;

    let rendered_html = &config.artifacts.rendered_html;
    in_stage(Stage::Rendering, async {
        renderer.render(merged_spec, rendered_html).await?;
        Ok(())
    })
    .await?;

    in_stage(
        Stage::Publishing,
        publish_docs(client, rendered_html, &config.index_key),
    )
    .await?;

    info!(
        stage = %Stage::Done,
        services = services.len(),
        merged_paths,
        key = %config.index_key,
        "Docs pipeline complete"
    );

    Ok(PipelineReport {
        uploaded_key: None,
        services,
        merged_paths,
        merged_spec: merged_spec.clone(),
        published_key: config.index_key.clone(),
    })
}
