//! End-to-end tests of the generation run

use std::fs;
use std::path::{Path, PathBuf};

use krmgen_codegen::{GenerateError, RunOutput, run};
use krmgen_core::GenerateConfig;
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures"))
}

fn manifest_files() -> Vec<PathBuf> {
    let root = fixtures_path().join("manifests");
    vec![
        root.join("widget.yml"),
        root.join("app.yaml"),
        root.join("config").join("settings.yaml"),
    ]
}

fn dry_run() -> GenerateConfig {
    GenerateConfig {
        dry_run: true,
        ..Default::default()
    }
}

/// Write manifests into a scratch directory, returning the file paths
fn write_manifests(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, contents)| {
            let path = dir.join(name);
            fs::write(&path, contents).unwrap();
            path
        })
        .collect()
}

fn contents<'a>(output: &'a RunOutput, file: &str) -> &'a str {
    &output
        .bundle
        .file(file)
        .unwrap_or_else(|| panic!("{file} missing from bundle"))
        .contents
}

#[test]
fn test_config_map_and_custom_resource() {
    let dir = TempDir::new().unwrap();
    let inputs = write_manifests(
        dir.path(),
        &[(
            "input.yaml",
            r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
data:
  mode: fast
---
apiVersion: example.com/v1
kind: CustomResource
metadata:
  name: thing
spec:
  replicas: 1
"#,
        )],
    );

    let output = run(&inputs, &dry_run()).unwrap();
    let summary = &output.summary;

    assert_eq!(summary.kinds.len(), 2);
    let config_map = &summary.kinds["ConfigMap"];
    assert_eq!((config_map.generated, config_map.skipped), (1, 0));
    assert!(config_map.typed);
    let custom = &summary.kinds["CustomResource"];
    assert_eq!((custom.generated, custom.skipped), (1, 0));
    assert!(!custom.typed);
    assert!(summary.skipped.is_empty());

    let typed = contents(&output, "config_map.rs");
    assert!(typed.contains("use k8s_openapi::api::core::v1::ConfigMap;"));
    assert!(typed.contains("pub fn settings() -> ConfigMap {"));
    assert!(typed.contains("(\"mode\".to_owned(), \"fast\".to_owned()),"));

    let generic = contents(&output, "custom_resource.rs");
    assert!(generic.contains("use serde_json::Value;"));
    assert!(generic.contains("pub fn thing() -> Value {"));
    assert!(generic.contains("Value::Object(Map::from_iter(["));
    assert!(generic.contains("(\"replicas\".to_owned(), Value::from(1_i64)),"));

    let index = contents(&output, "mod.rs");
    assert!(index.contains("(\"ConfigMap\", &[\"settings\"]),"));
    assert!(index.contains("(\"CustomResource\", &[\"thing\"]),"));
}

#[test]
fn test_fixture_manifests() {
    let output = run(&manifest_files(), &dry_run()).unwrap();
    let summary = &output.summary;

    assert_eq!(summary.files_read, 3);
    assert_eq!(summary.documents, 5);
    assert_eq!(summary.generated(), 5);
    assert!(!summary.has_failures());
    assert!(summary.warnings.is_empty());
    assert_eq!(
        summary.kinds.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["ConfigMap", "Deployment", "Secret", "Service", "Widget"]
    );

    let paths: Vec<_> = output.bundle.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        ["mod.rs", "config_map.rs", "deployment.rs", "secret.rs", "service.rs", "widget.rs"]
            .iter()
            .map(PathBuf::from)
            .collect::<Vec<_>>()
    );

    let deployment = contents(&output, "deployment.rs");
    assert!(deployment.contains("/// `web` from `app.yaml` (document 0)"));
    assert!(deployment.contains("Quantity(\"500m\".to_owned())"));
    assert!(deployment.contains("empty_dir: Some(EmptyDirVolumeSource {"));

    let secret = contents(&output, "secret.rs");
    assert!(secret.contains("/// `app-secret` from `config/settings.yaml` (document 1)"));
    assert!(secret.contains("ByteString(b\"hunter2\".to_vec())"));

    let config_map = contents(&output, "config_map.rs");
    assert!(config_map.contains(r#"("greeting".to_owned(), "hello \"world\"".to_owned()),"#));

    let widget = contents(&output, "widget.rs");
    assert!(widget.contains("(\"owner\".to_owned(), Value::Null),"));
    assert!(widget.contains("(\"tags\".to_owned(), Value::Array(vec![])),"));
    assert!(widget.contains("(\"options\".to_owned(), Value::Object(Map::new())),"));
    assert!(widget.contains("(\"ratio\".to_owned(), Value::from(0.5_f64)),"));
}

#[test]
fn test_output_is_deterministic() {
    let first = run(&manifest_files(), &dry_run()).unwrap();

    let mut reversed = manifest_files();
    reversed.reverse();
    let second = run(&reversed, &dry_run()).unwrap();
    assert_eq!(first.bundle, second.bundle);

    // Same manifests under a different root produce the same bundle
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("config")).unwrap();
    let copies: Vec<PathBuf> = ["widget.yml", "app.yaml", "config/settings.yaml"]
        .iter()
        .map(|name| {
            let to = dir.path().join(name);
            fs::copy(fixtures_path().join("manifests").join(name), &to).unwrap();
            to
        })
        .collect();
    let third = run(&copies, &dry_run()).unwrap();
    assert_eq!(first.bundle, third.bundle);
}

#[test]
fn test_partial_failure_is_isolated() {
    let inputs = vec![fixtures_path().join("broken").join("mixed.yaml")];
    let output = run(&inputs, &dry_run()).unwrap();
    let summary = &output.summary;

    assert_eq!(summary.documents, 4);
    assert_eq!(summary.generated(), 1);
    assert_eq!(summary.skipped.len(), 3);
    assert_eq!(summary.unclassified(), 2);
    assert!(summary.has_failures());

    assert_eq!(summary.kinds["ConfigMap"].generated, 1);
    let deployment = &summary.kinds["Deployment"];
    assert_eq!((deployment.generated, deployment.skipped), (0, 1));
    assert!(deployment.typed);

    let indexes: Vec<_> = summary.skipped.iter().map(|s| s.index).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
    assert_eq!(summary.skipped[1].kind.as_deref(), Some("Deployment"));
    assert_eq!(summary.skipped[1].line, 12);

    // Only the surviving kind gets a file
    assert!(output.bundle.file("config_map.rs").is_some());
    assert!(output.bundle.file("deployment.rs").is_none());
}

#[test]
fn test_run_with_only_failures_completes() {
    let dir = TempDir::new().unwrap();
    let inputs = write_manifests(dir.path(), &[("bad.yaml", "- just\n- a list\n")]);
    let output = run(&inputs, &dry_run()).unwrap();
    assert_eq!(output.summary.generated(), 0);
    assert_eq!(output.summary.skipped.len(), 1);
    assert_eq!(output.bundle.files.len(), 1);
}

#[test]
fn test_bindings_are_grouped_and_deduplicated() {
    let dir = TempDir::new().unwrap();
    let config_map = |name: &str| {
        format!("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: {name}\n")
    };
    let a = format!("{}---\n{}", config_map("web"), config_map("all"));
    let b = format!("{}---\n{}", config_map("web"), config_map("web.v2"));
    let inputs = write_manifests(
        dir.path(),
        &[
            ("a.yaml", a.as_str()),
            ("b.yaml", b.as_str()),
            ("c.yaml", "apiVersion: v1\nkind: ConfigMap\ndata:\n  k: v\n"),
        ],
    );

    let output = run(&inputs, &dry_run()).unwrap();
    assert_eq!(output.summary.kinds["ConfigMap"].generated, 5);

    let file = contents(&output, "config_map.rs");
    for binding in ["web", "all_", "web_1", "web_v2", "unnamed"] {
        assert!(
            file.contains(&format!("pub fn {binding}() -> ConfigMap {{")),
            "missing binding {binding}"
        );
    }
    assert!(contents(&output, "mod.rs").contains(
        r#"("ConfigMap", &["web", "all_", "web_1", "web_v2", "unnamed"]),"#
    ));
}

#[test]
fn test_namespace_override() {
    let config = GenerateConfig {
        namespace: Some("prod".to_string()),
        ..dry_run()
    };
    let output = run(&manifest_files(), &config).unwrap();

    let deployment = contents(&output, "deployment.rs");
    assert!(deployment.contains("namespace: Some(\"prod\".to_owned()),"));
    let config_map = contents(&output, "config_map.rs");
    assert!(!config_map.contains("\"default\".to_owned()"));
    let widget = contents(&output, "widget.rs");
    assert!(widget.contains("(\"namespace\".to_owned(), Value::String(\"prod\".to_owned())),"));
}

#[test]
fn test_allow_list_controls_typing() {
    let config = GenerateConfig {
        typed_kinds: vec!["Deployment".to_string()],
        ..dry_run()
    };
    let output = run(&manifest_files(), &config).unwrap();

    assert!(output.summary.kinds["Deployment"].typed);
    assert!(!output.summary.kinds["ConfigMap"].typed);
    assert!(contents(&output, "config_map.rs").contains("pub fn app_config() -> Value {"));
    let index = contents(&output, "mod.rs");
    assert!(index.contains("Deployment(::k8s_openapi::api::apps::v1::Deployment),"));
    assert!(!index.contains("ConfigMap(::"));
}

#[test]
fn test_strict_mode_rejects_unknown_fields() {
    let dir = TempDir::new().unwrap();
    let inputs = write_manifests(
        dir.path(),
        &[(
            "cm.yaml",
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cfg\ndatta:\n  k: v\n",
        )],
    );

    let lenient = run(&inputs, &dry_run()).unwrap();
    assert_eq!(lenient.summary.generated(), 1);

    let strict = GenerateConfig {
        strict: true,
        ..dry_run()
    };
    let output = run(&inputs, &strict).unwrap();
    assert_eq!(output.summary.generated(), 0);
    assert_eq!(output.summary.kinds["ConfigMap"].skipped, 1);
    assert!(output.summary.skipped[0].reason.contains("datta"));
}

#[test]
fn test_unreadable_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let binary = dir.path().join("binary.yaml");
    fs::write(&binary, [0x61, 0x3a, 0x20, 0xff, 0xfe]).unwrap();
    let mut inputs = write_manifests(
        dir.path(),
        &[("ok.yaml", "apiVersion: v1\nkind: ServiceAccount\nmetadata:\n  name: bot\n")],
    );
    inputs.push(binary);

    let output = run(&inputs, &dry_run()).unwrap();
    assert_eq!(output.summary.files_read, 1);
    assert_eq!(output.summary.unreadable_files.len(), 1);
    assert_eq!(output.summary.unreadable_files[0].file, "binary.yaml");
    assert_eq!(output.summary.kinds["ServiceAccount"].generated, 1);
}

#[test]
fn test_missing_input_is_fatal() {
    let err = run(&[PathBuf::from("/nonexistent/krmgen/input.yaml")], &dry_run()).unwrap_err();
    assert!(matches!(err, GenerateError::InputNotFound(_)));
}

#[test]
fn test_invalid_config_is_fatal() {
    let config = GenerateConfig {
        namespace: Some("Not_A_Label".to_string()),
        ..dry_run()
    };
    let err = run(&manifest_files(), &config).unwrap_err();
    assert!(matches!(err, GenerateError::Config(_)));
}

#[test]
fn test_bundle_is_written_and_replaced() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("src").join("generated");
    let config = GenerateConfig {
        output_dir: out.clone(),
        ..Default::default()
    };

    let output = run(&manifest_files(), &config).unwrap();
    assert_eq!(output.summary.output_dir.as_deref(), Some(out.as_path()));
    for file in &output.bundle.files {
        let written = fs::read_to_string(out.join(&file.path)).unwrap();
        assert_eq!(written, file.contents);
    }

    let inputs = vec![fixtures_path().join("broken").join("mixed.yaml")];
    run(&inputs, &config).unwrap();
    assert!(out.join("config_map.rs").is_file());
    assert!(!out.join("widget.rs").exists());
    assert!(!out.join("deployment.rs").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("generated");
    let config = GenerateConfig {
        output_dir: out.clone(),
        dry_run: true,
        ..Default::default()
    };
    let output = run(&manifest_files(), &config).unwrap();
    assert!(output.summary.output_dir.is_none());
    assert!(!out.exists());
}
