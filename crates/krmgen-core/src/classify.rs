//! Routing documents down the typed or schema-less path

use std::collections::BTreeSet;

use kube::core::GroupVersionKind;

use crate::config::GenerateConfig;
use crate::document::Document;
use crate::error::DocumentError;
use crate::registry::{SchemaRegistry, TypedResource};
use crate::tree::Tree;

/// A resource without a registered typed schema
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredResource {
    pub gvk: GroupVersionKind,
    pub tree: Tree,
}

impl UnstructuredResource {
    pub fn name(&self) -> Option<&str> {
        self.tree.pointer(&["metadata", "name"]).and_then(Tree::as_str)
    }

    /// Replace `metadata.namespace` when the resource already sets one
    ///
    /// Returns whether the namespace was replaced.
    pub fn override_namespace(&mut self, namespace: &str) -> bool {
        let Some(slot) = self
            .tree
            .get_mut("metadata")
            .and_then(|meta| meta.get_mut("namespace"))
        else {
            return false;
        };
        *slot = Tree::String(namespace.to_string());
        true
    }
}

/// A classified resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Typed(TypedResource),
    Unstructured(UnstructuredResource),
}

impl Resource {
    pub fn kind(&self) -> &str {
        match self {
            Resource::Typed(typed) => typed.kind(),
            Resource::Unstructured(u) => &u.gvk.kind,
        }
    }

    pub fn gvk(&self) -> GroupVersionKind {
        match self {
            Resource::Typed(typed) => typed.gvk(),
            Resource::Unstructured(u) => u.gvk.clone(),
        }
    }

    /// `metadata.name`, when set
    pub fn name(&self) -> Option<&str> {
        match self {
            Resource::Typed(typed) => typed.metadata().name.as_deref(),
            Resource::Unstructured(u) => u.name(),
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, Resource::Typed(_))
    }
}

/// Decoding path chosen for a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Typed,
    Unstructured,
}

/// Classifies documents against the allow-list and the registry
pub struct Classifier<'r> {
    registry: &'r dyn SchemaRegistry,
    typed_kinds: BTreeSet<String>,
    namespace: Option<String>,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r dyn SchemaRegistry, config: &GenerateConfig) -> Self {
        Self {
            registry,
            typed_kinds: config.typed_kinds.iter().cloned().collect(),
            namespace: config.namespace.clone(),
        }
    }

    /// Path a kind takes: typed only when allow-listed and registered
    pub fn route(&self, kind: &str) -> Route {
        if !self.typed_kinds.contains(kind) {
            return Route::Unstructured;
        }
        if self.registry.is_registered(kind) {
            Route::Typed
        } else {
            tracing::warn!(
                kind,
                "Kind is allow-listed but has no typed schema, treating it as third-party kind"
            );
            Route::Unstructured
        }
    }

    /// Classify one document
    pub fn classify(&self, document: &Document<'_>) -> Result<Resource, DocumentError> {
        let (tree, gvk) = self.registry.decode_generic(document.text)?;

        let mut resource = match self.route(&gvk.kind) {
            Route::Typed => {
                let (typed, _) = self.registry.decode(document.text)?;
                Resource::Typed(typed)
            }
            Route::Unstructured => {
                tracing::info!(kind = %gvk.kind, "Kind would be treated as third-party kind");
                Resource::Unstructured(UnstructuredResource { gvk, tree })
            }
        };

        if let Some(namespace) = &self.namespace {
            apply_namespace(&mut resource, namespace);
        }
        Ok(resource)
    }
}

/// Classify a single document with a one-off classifier
pub fn classify(
    document: &Document<'_>,
    config: &GenerateConfig,
    registry: &dyn SchemaRegistry,
) -> Result<Resource, DocumentError> {
    Classifier::new(registry, config).classify(document)
}

fn apply_namespace(resource: &mut Resource, namespace: &str) {
    match resource {
        Resource::Typed(typed) => {
            if typed.is_namespaced() {
                typed.metadata_mut().namespace = Some(namespace.to_string());
            }
        }
        Resource::Unstructured(u) => {
            if !u.override_namespace(namespace) {
                tracing::debug!(
                    kind = %u.gvk.kind,
                    "Third-party resource has no namespace, leaving its scope unchanged"
                );
            }
        }
    }
}
