use std::path::Path;
use std::sync::Arc;

use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, ObjectStore, PutPayload};
use tempfile::{tempdir, TempDir};

use openapi_docs_core::config::{ArtifactPaths, DocsConfig};
use openapi_docs_core::contract::{MockBucketClient, MockRenderer};
use openapi_docs_core::discover::discover_service_names;
use openapi_docs_core::error::DocsError;
use openapi_docs_core::merge::OpenApiMerger;
use openapi_docs_core::pipeline::{generate_docs, run_pipeline};
use openapi_docs_core::render::RenderError;
use openapi_docs_core::store::ObjectStoreBucket;
use openapi_docs_core::upload::upload_definition;

const ORGS: &str = r#"
openapi: 3.0.0
info:
  title: Organizations
  version: 1.0.0
paths:
  /organizations:
    get:
      operationId: listOrganizations
      responses:
        '200':
          $ref: '#/components/responses/Ok'
components:
  responses:
    Ok:
      description: OK
"#;

const JOBS: &str = r#"
openapi: 3.0.0
info:
  title: Jobs
  version: 1.0.0
paths:
  /jobs:
    get:
      operationId: listJobs
      responses:
        '200':
          $ref: '#/components/responses/Ok'
components:
  responses:
    Ok:
      description: OK
"#;

const SEARCH: &str = r#"
openapi: 3.0.0
info:
  title: Search
  version: 1.0.0
paths:
  /search:
    post:
      operationId: search
      responses:
        '200':
          description: results
"#;

/// Working directory holding the local definition, with a config pointing into it.
fn workspace(definition: Option<&str>) -> (TempDir, DocsConfig) {
    let dir = tempdir().unwrap();
    let artifacts = ArtifactPaths {
        definition: dir.path().join("openapi-definition.yml"),
        merged_spec: dir.path().join("talentwunder-api.json"),
        rendered_html: dir.path().join("talentwunder-api.html"),
    };
    if let Some(content) = definition {
        std::fs::write(&artifacts.definition, content).unwrap();
    }
    let mut config = DocsConfig::for_bucket("docs-bucket");
    config.artifacts = artifacts;
    (dir, config)
}

async fn seeded_bucket(objects: &[(&str, &str)]) -> ObjectStoreBucket {
    let store = Arc::new(InMemory::new());
    for (key, content) in objects {
        store
            .put(
                &ObjectPath::from(*key),
                PutPayload::from(content.as_bytes().to_vec()),
            )
            .await
            .unwrap();
    }
    ObjectStoreBucket::new(store)
}

/// Renderer stand-in that writes a fixed HTML document to the output path.
fn html_renderer() -> MockRenderer {
    let mut renderer = MockRenderer::new();
    renderer.expect_render().returning(|spec: &Path, out: &Path| {
        assert!(spec.exists(), "merged spec must exist before rendering");
        std::fs::write(out, "<html>talentwunder api</html>").map_err(|e| RenderError::Launch {
            program: "fake".to_string(),
            source: e,
        })
    });
    renderer
}

async fn object_bytes(bucket: &ObjectStoreBucket, key: &str) -> Vec<u8> {
    bucket
        .inner()
        .get(&ObjectPath::from(key))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn end_to_end_upload_merge_render_publish() {
    let bucket = seeded_bucket(&[
        ("openapi-files/orgs.yml", ORGS),
        ("openapi-files/jobs.yml", JOBS),
    ])
    .await;
    let (_dir, config) = workspace(Some(SEARCH));

    let report = run_pipeline(&config, "search", &bucket, &OpenApiMerger, &html_renderer())
        .await
        .expect("pipeline should succeed");

    assert_eq!(
        report.uploaded_key.as_deref(),
        Some("openapi-files/search.yml")
    );
    let mut services = report.services.clone();
    services.sort();
    assert_eq!(services, vec!["jobs", "orgs", "search"]);
    assert_eq!(report.merged_paths, 3);
    assert_eq!(report.published_key, "index.html");

    // Uploaded definition is stored verbatim, as YAML.
    assert_eq!(
        object_bytes(&bucket, "openapi-files/search.yml").await,
        SEARCH.as_bytes()
    );
    let uploaded = bucket
        .inner()
        .get(&ObjectPath::from("openapi-files/search.yml"))
        .await
        .unwrap();
    let content_type: Option<&str> = uploaded
        .attributes
        .get(&Attribute::ContentType)
        .map(|v| v.as_ref());
    assert_eq!(content_type, Some("text/x-yaml"));

    let merged: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&config.artifacts.merged_spec).unwrap()).unwrap();
    let paths = merged["paths"].as_object().unwrap();
    for path in ["/organizations", "/jobs", "/search"] {
        assert!(paths.contains_key(path), "missing {path} in merged spec");
    }

    let published = bucket
        .inner()
        .get(&ObjectPath::from("index.html"))
        .await
        .unwrap();
    let content_type: Option<&str> = published
        .attributes
        .get(&Attribute::ContentType)
        .map(|v| v.as_ref());
    let cache_control: Option<&str> = published
        .attributes
        .get(&Attribute::CacheControl)
        .map(|v| v.as_ref());
    assert_eq!(content_type, Some("text/html"));
    assert_eq!(
        cache_control,
        Some("max-age=0,no-cache,no-store,must-revalidate")
    );
    assert_eq!(
        &published.bytes().await.unwrap()[..],
        b"<html>talentwunder api</html>"
    );
}

#[tokio::test]
async fn missing_local_definition_fails_before_any_storage_call() {
    let (_dir, config) = workspace(None);
    let mut client = MockBucketClient::new();
    client.expect_put().times(0);
    client.expect_list().times(0);
    client.expect_get().times(0);
    let renderer = MockRenderer::new();

    let err = run_pipeline(&config, "search", &client, &OpenApiMerger, &renderer)
        .await
        .unwrap_err();

    assert!(matches!(err, DocsError::Io { .. }), "got {err:?}");
}

#[tokio::test]
async fn empty_service_name_is_a_configuration_error() {
    let (_dir, config) = workspace(Some(SEARCH));
    let client = MockBucketClient::new();
    let renderer = MockRenderer::new();

    let err = run_pipeline(&config, "  ", &client, &OpenApiMerger, &renderer)
        .await
        .unwrap_err();

    assert!(matches!(err, DocsError::Config(_)));
}

#[tokio::test]
async fn discovery_returns_every_uploaded_service() {
    let bucket = seeded_bucket(&[]).await;
    let dir = tempdir().unwrap();
    let definition = dir.path().join("def.yml");
    std::fs::write(&definition, SEARCH).unwrap();

    for service in ["a", "b", "c"] {
        upload_definition(&bucket, "openapi-files", service, &definition)
            .await
            .unwrap();
    }

    let mut services = discover_service_names(&bucket, "openapi-files")
        .await
        .unwrap();
    services.sort();
    assert_eq!(services, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn discovery_ignores_nested_and_foreign_objects() {
    let bucket = seeded_bucket(&[
        ("openapi-files/orgs.yml", ORGS),
        ("openapi-files/archive/old.yml", ORGS),
        ("openapi-files/notes.txt", "notes"),
        ("index.html", "<html></html>"),
    ])
    .await;

    let services = discover_service_names(&bucket, "openapi-files")
        .await
        .unwrap();
    assert_eq!(services, vec!["orgs"]);
}

#[tokio::test]
async fn regenerating_with_identical_inputs_is_byte_identical() {
    let bucket = seeded_bucket(&[
        ("openapi-files/orgs.yml", ORGS),
        ("openapi-files/jobs.yml", JOBS),
    ])
    .await;
    let (_dir, config) = workspace(None);
    let renderer = html_renderer();

    generate_docs(&config, &bucket, &OpenApiMerger, &renderer)
        .await
        .unwrap();
    let first = std::fs::read(&config.artifacts.merged_spec).unwrap();

    generate_docs(&config, &bucket, &OpenApiMerger, &renderer)
        .await
        .unwrap();
    let second = std::fs::read(&config.artifacts.merged_spec).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn render_failure_keeps_the_upload_and_skips_publishing() {
    let bucket = seeded_bucket(&[("openapi-files/orgs.yml", ORGS)]).await;
    let (_dir, config) = workspace(Some(SEARCH));
    let mut renderer = MockRenderer::new();
    renderer.expect_render().returning(|_, _| {
        Err(RenderError::Failed {
            program: "npx".to_string(),
            status: "exit status: 1".to_string(),
        })
    });

    let err = run_pipeline(&config, "search", &bucket, &OpenApiMerger, &renderer)
        .await
        .unwrap_err();

    assert!(matches!(err, DocsError::Render(_)));
    assert_eq!(
        object_bytes(&bucket, "openapi-files/search.yml").await,
        SEARCH.as_bytes()
    );
    assert!(bucket
        .inner()
        .get(&ObjectPath::from("index.html"))
        .await
        .is_err());
}

#[tokio::test]
async fn conflicting_definitions_abort_before_rendering() {
    let conflicting_orgs = ORGS.replace("description: OK", "description: Something else");
    let bucket = seeded_bucket(&[
        ("openapi-files/jobs.yml", JOBS),
        ("openapi-files/orgs.yml", conflicting_orgs.as_str()),
    ])
    .await;
    let (_dir, config) = workspace(None);
    let mut renderer = MockRenderer::new();
    renderer.expect_render().times(0);

    let err = generate_docs(&config, &bucket, &OpenApiMerger, &renderer)
        .await
        .unwrap_err();

    assert!(matches!(err, DocsError::Merge(_)), "got {err:?}");
    assert!(!config.artifacts.merged_spec.exists());
}
