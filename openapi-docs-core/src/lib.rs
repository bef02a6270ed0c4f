#![doc = "openapi-docs-core: core pipeline for openapi-docs."]

//! This crate holds the pipeline that keeps the shared API documentation in
//! sync: every service uploads its own OpenAPI definition into the bucket,
//! then all stored definitions are fetched, merged, rendered to HTML and
//! published back to the bucket root.
//!
//! The CLI crate only parses arguments, loads configuration and wires the
//! concrete collaborators into [`pipeline::run_pipeline`].

pub mod addressing;
pub mod config;
pub mod contract;
pub mod discover;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod store;
pub mod upload;
