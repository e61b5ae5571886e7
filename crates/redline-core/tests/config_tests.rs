//! Configuration loading from project files.

use redline_core::{Config, ConfigError, CoreError, Instance};
use redline_test_utils::TestDocuments;

#[tokio::test]
async fn project_config_is_loaded() {
    let docs = TestDocuments::new()
        .with_config(r#"{ "read_limit": 7, "diff_context_lines": 1 }"#)
        .build();

    let (config, sources) = Config::load(Some(docs.path())).await.unwrap();
    assert_eq!(config.read_limit, Some(7));
    assert_eq!(config.engine_settings().diff.context_lines, 1);
    assert!(sources.contains(&docs.file("redline.json")));
}

#[tokio::test]
async fn jsonc_project_config_wins_over_json() {
    let docs = TestDocuments::new()
        .with_file("redline.jsonc", "{\n  // preferred\n  \"read_limit\": 11\n}")
        .with_file("redline.json", r#"{ "read_limit": 22 }"#)
        .build();

    let (config, _) = Config::load(Some(docs.path())).await.unwrap();
    assert_eq!(config.read_limit, Some(11));
}

#[tokio::test]
async fn invalid_project_config_is_rejected() {
    let docs = TestDocuments::new()
        .with_config(r#"{ "read_limit": 0 }"#)
        .build();

    let err = Config::load(Some(docs.path())).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Config(ConfigError::Validation { .. })
    ));
}

#[tokio::test]
async fn overrides_apply_on_top_of_files() {
    let docs = TestDocuments::new()
        .with_config(r#"{ "read_limit": 7, "confine_to_root": false }"#)
        .with_file("paper.tex", "\\section{A}\n")
        .build();

    let overrides = Config {
        documents_dir: Some(docs.path().display().to_string()),
        confine_to_root: Some(true),
        ..Default::default()
    };
    let instance = Instance::load(Some(docs.path()), overrides).await.unwrap();

    assert_eq!(instance.config().read_limit, Some(7));
    assert_eq!(instance.config().confine_to_root, Some(true));
    assert_eq!(instance.documents_root(), docs.path());

    let outside = instance.context().resolve("/etc/hostname");
    assert!(outside.is_err());
    assert!(instance.context().resolve("paper.tex").is_ok());
}
