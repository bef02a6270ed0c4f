//!
//! This module implements the CLI interface for openapi-docs: command parsing,
//! the async entrypoint and the failure signal reported back to the CI host.
//!
//! All pipeline logic lives in the [`openapi-docs-core`] crate. This module
//! only resolves inputs, builds the concrete collaborators and hands them over.
//!
//! ## How To Use
//! - In CI: `openapi-docs publish` with `INPUT_SERVICE` and `AWS_OPENAPI_BUCKET` set.
//! - Locally: `openapi-docs publish --service search`, or `openapi-docs generate`
//!   to rebuild the docs from what is already stored.
//!
//! [`openapi-docs-core`]: ../../openapi-docs-core/
use crate::load_config::load_config;
use crate::storage::s3_bucket;
use anyhow::Result;
use clap::{Parser, Subcommand};
use openapi_docs_core::merge::OpenApiMerger;
use openapi_docs_core::pipeline::{generate_docs, run_pipeline, PipelineReport};
use openapi_docs_core::render::CommandRenderer;
use std::path::PathBuf;

/// CLI for openapi-docs: publish merged API docs for all services.
#[derive(Parser)]
#[clap(
    name = "openapi-docs",
    version,
    about = "Upload a service's OpenAPI definition and republish the merged API docs"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload this service's definition, then regenerate and publish the docs
    Publish {
        /// Name of the service the definition belongs to
        #[clap(long, env = "INPUT_SERVICE")]
        service: Option<String>,
        /// Optional YAML file overriding local paths and the renderer
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Regenerate and publish the docs from the definitions already stored
    Generate {
        /// Optional YAML file overriding local paths and the renderer
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let report = match cli.command {
        Commands::Publish { service, config } => {
            let service = resolve_service(service)?;
            let config = load_config(config.as_deref())?;
            tracing::info!(command = "publish", service = %service, "Starting docs publication");
            println!("Starting to create Talentwunder API documentation ...");

            let bucket = s3_bucket(&config)?;
            let renderer = CommandRenderer::new(config.renderer.clone());
            run_pipeline(&config, &service, &bucket, &OpenApiMerger, &renderer).await?
        }
        Commands::Generate { config } => {
            let config = load_config(config.as_deref())?;
            tracing::info!(command = "generate", "Starting docs regeneration");

            let bucket = s3_bucket(&config)?;
            let renderer = CommandRenderer::new(config.renderer.clone());
            generate_docs(&config, &bucket, &OpenApiMerger, &renderer).await?
        }
    };

    print_summary(&report);
    Ok(())
}

/// Action inputs are trimmed; a blank one counts as missing.
fn resolve_service(service: Option<String>) -> Result<String> {
    service
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Input required and not supplied: service"))
}

fn print_summary(report: &PipelineReport) {
    tracing::info!(?report, "Docs pipeline complete");
    if let Some(key) = &report.uploaded_key {
        println!("Uploaded definition to {key}");
    }
    println!(
        "Merged {} service definition(s) ({} paths): {}",
        report.services.len(),
        report.merged_paths,
        report.services.join(", ")
    );
    println!("Published {}", report.published_key);
    println!("All done!");
}

/// Reports `error` to the CI host as a failed step, using the workflow
/// command syntax (`::error::<message>`).
pub fn report_failure(error: &anyhow::Error) {
    println!("::error::{}", escape_workflow_data(&format!("{error:#}")));
}

fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
