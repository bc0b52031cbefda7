//! Run configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Kinds decoded into their typed schema unless configured otherwise
pub const DEFAULT_TYPED_KINDS: &[&str] = &[
    "Deployment",
    "Service",
    "Secret",
    "Role",
    "RoleBinding",
    "ClusterRoleBinding",
    "PersistentVolumeClaim",
    "StatefulSet",
    "ServiceAccount",
    "ClusterRole",
    "PriorityClass",
    "ConfigMap",
];

/// Default location of the generated module
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Configuration of a generation run (`krmgen.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateConfig {
    /// Kinds decoded into typed schemas
    pub typed_kinds: Vec<String>,

    /// Namespace forced onto generated resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Directory receiving the generated module
    pub output_dir: PathBuf,

    /// Reject typed documents with fields unknown to their schema
    pub strict: bool,

    /// Build the bundle without writing it
    pub dry_run: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            typed_kinds: DEFAULT_TYPED_KINDS.iter().map(|k| k.to_string()).collect(),
            namespace: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            strict: false,
            dry_run: false,
        }
    }
}

impl GenerateConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults config
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> Result<()> {
        if let Some(namespace) = &self.namespace {
            if !is_dns_label(namespace) {
                return Err(CoreError::InvalidConfig {
                    message: format!(
                        "namespace '{namespace}' is not a valid DNS label (lowercase alphanumerics and '-', at most 63 characters)"
                    ),
                });
            }
        }
        if let Some(kind) = self.typed_kinds.iter().find(|k| k.trim().is_empty()) {
            return Err(CoreError::InvalidConfig {
                message: format!("typed kind '{kind}' is empty"),
            });
        }
        Ok(())
    }

    pub fn is_typed_kind(&self, kind: &str) -> bool {
        self.typed_kinds.iter().any(|k| k == kind)
    }
}

fn is_dns_label(s: &str) -> bool {
    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    !s.is_empty()
        && s.len() <= 63
        && s.chars().all(|c| alnum(c) || c == '-')
        && s.starts_with(alnum)
        && s.ends_with(alnum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerateConfig::default();
        assert_eq!(config.typed_kinds.len(), 12);
        assert!(config.is_typed_kind("ConfigMap"));
        assert!(!config.is_typed_kind("Ingress"));
        assert_eq!(config.output_dir, PathBuf::from("generated"));
        assert!(!config.strict);
    }

    #[test]
    fn test_from_yaml_camel_case() {
        let config = GenerateConfig::from_yaml(
            "typedKinds: [Deployment]\nnamespace: prod\noutputDir: out/gen\nstrict: true\n",
        )
        .unwrap();
        assert_eq!(config.typed_kinds, vec!["Deployment"]);
        assert_eq!(config.namespace.as_deref(), Some("prod"));
        assert_eq!(config.output_dir, PathBuf::from("out/gen"));
        assert!(config.strict);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_from_yaml_partial_keeps_defaults() {
        let config = GenerateConfig::from_yaml("dryRun: true\n").unwrap();
        assert!(config.dry_run);
        assert_eq!(config.typed_kinds.len(), 12);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(GenerateConfig::from_yaml("").unwrap(), GenerateConfig::default());
    }

    #[test]
    fn test_invalid_namespace() {
        let err = GenerateConfig::from_yaml("namespace: Prod_1\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("krmgen.yaml");
        std::fs::write(&path, "namespace: team-a\n").unwrap();
        let config = GenerateConfig::from_file(&path).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("team-a"));
    }

    #[test]
    fn test_dns_label() {
        assert!(is_dns_label("a"));
        assert!(is_dns_label("kube-system"));
        assert!(!is_dns_label("-a"));
        assert!(!is_dns_label("a-"));
        assert!(!is_dns_label(&"a".repeat(64)));
    }
}
