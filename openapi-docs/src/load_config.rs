//! `load_config` module: builds the [`DocsConfig`] a run works with.
//!
//! The bucket name always comes from the `AWS_OPENAPI_BUCKET` environment
//! variable. Region, definitions prefix and the published key are fixed.
//! An optional YAML file may relocate the local artifacts and swap the
//! renderer command, e.g.:
//!
//! ```yaml
//! artifacts:
//!   definition: ./docs/openapi.yml
//! renderer:
//!   program: npx
//!   args: ["--yes", "@redocly/cli", "build-docs"]
//! ```
//!
//! # Errors
//! All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use openapi_docs_core::config::{DocsConfig, RendererCommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const BUCKET_ENV: &str = "AWS_OPENAPI_BUCKET";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub artifacts: ArtifactsSection,
    #[serde(default)]
    pub renderer: Option<RendererCommand>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsSection {
    pub definition: Option<PathBuf>,
    pub merged_spec: Option<PathBuf>,
    pub rendered_html: Option<PathBuf>,
}

/// Builds the run configuration from the environment and, if given, a YAML file.
pub fn load_config(path: Option<&Path>) -> Result<DocsConfig> {
    let bucket = match std::env::var(BUCKET_ENV) {
        Ok(bucket) if !bucket.trim().is_empty() => bucket,
        Ok(_) => {
            error!(var = BUCKET_ENV, "Bucket environment variable is empty");
            anyhow::bail!("{BUCKET_ENV} environment variable is empty");
        }
        Err(e) => {
            error!(error = ?e, var = BUCKET_ENV, "Bucket environment variable not set");
            return Err(anyhow::anyhow!("{BUCKET_ENV} environment variable not set: {e}"));
        }
    };

    let mut config = DocsConfig::for_bucket(bucket);

    if let Some(path_ref) = path {
        let file_config = read_file_config(path_ref)?;
        let artifacts = file_config.artifacts;
        if let Some(definition) = artifacts.definition {
            config.artifacts.definition = definition;
        }
        if let Some(merged_spec) = artifacts.merged_spec {
            config.artifacts.merged_spec = merged_spec;
        }
        if let Some(rendered_html) = artifacts.rendered_html {
            config.artifacts.rendered_html = rendered_html;
        }
        if let Some(renderer) = file_config.renderer {
            info!(program = %renderer.program, "Renderer overridden by config file");
            config.renderer = renderer;
        }
    }

    config.trace_loaded();
    Ok(config)
}

fn read_file_config(path_ref: &Path) -> Result<FileConfig> {
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file is a valid, empty config.
    if config_content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
