//! The generation run: split, classify, encode, assemble

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use krmgen_core::{
    Classifier, Document, DocumentError, GenerateConfig, KubeRegistry, Resource, Route,
    SchemaRegistry, split_bytes,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::assembler::{Accumulator, Bundle, EncodedResource, SourceRef};
use crate::error::{EncodeError, GenerateError, Result};
use crate::typed::encode_typed;
use crate::unstructured::encode_unstructured;

/// Outcome of one kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSummary {
    pub generated: usize,
    pub skipped: usize,
    pub typed: bool,
}

/// A document that did not make it into the bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDocument {
    pub file: String,
    pub index: usize,
    pub line: usize,
    /// Kind, when the document got far enough to have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub reason: String,
}

/// An input file that could not be read as manifest text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadableFile {
    pub file: String,
    pub reason: String,
}

/// Lossy or untyped emission of one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningRecord {
    pub file: String,
    pub index: usize,
    pub kind: String,
    pub message: String,
}

/// Report of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub files_read: usize,
    pub documents: usize,
    /// Per kind counts, in lexical kind order
    pub kinds: BTreeMap<String, KindSummary>,
    pub skipped: Vec<SkippedDocument>,
    pub unreadable_files: Vec<UnreadableFile>,
    pub warnings: Vec<WarningRecord>,
    /// Where the bundle was written, `None` on a dry run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl RunSummary {
    /// Resources placed in the bundle
    pub fn generated(&self) -> usize {
        self.kinds.values().map(|k| k.generated).sum()
    }

    /// Skipped documents that never got a kind
    pub fn unclassified(&self) -> usize {
        self.skipped.iter().filter(|s| s.kind.is_none()).count()
    }

    /// Whether any document or file was left out
    pub fn has_failures(&self) -> bool {
        !self.skipped.is_empty() || !self.unreadable_files.is_empty()
    }

    /// "Generated 5 resources of 3 kinds"
    pub fn success_message(&self) -> String {
        let generated = self.generated();
        let resource_word = if generated == 1 {
            "resource"
        } else {
            "resources"
        };
        let kinds = self.kinds.values().filter(|k| k.generated > 0).count();
        let kind_word = if kinds == 1 { "kind" } else { "kinds" };
        format!("Generated {generated} {resource_word} of {kinds} {kind_word}")
    }

    fn kind_mut(&mut self, kind: &str, typed: bool) -> &mut KindSummary {
        self.kinds
            .entry(kind.to_string())
            .or_insert_with(|| KindSummary {
                typed,
                ..Default::default()
            })
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub bundle: Bundle,
    pub summary: RunSummary,
}

/// Generate a bundle from manifest files, with the `k8s-openapi` registry
///
/// Files are processed in sorted path order. Unreadable files and documents
/// that fail to decode are recorded in the summary and skipped; only an
/// invalid config, a missing input or a failed write abort the run.
pub fn run(input_paths: &[PathBuf], config: &GenerateConfig) -> Result<RunOutput> {
    let registry = KubeRegistry::new().with_strict(config.strict);
    run_with_registry(input_paths, config, &registry)
}

/// Same as [`run`], decoding typed kinds through `registry`
pub fn run_with_registry(
    input_paths: &[PathBuf],
    config: &GenerateConfig,
    registry: &dyn SchemaRegistry,
) -> Result<RunOutput> {
    config.validate()?;

    let mut paths = input_paths.to_vec();
    paths.sort();
    paths.dedup();
    if let Some(missing) = paths.iter().find(|p| !p.exists()) {
        return Err(GenerateError::InputNotFound(missing.clone()));
    }

    let root = common_root(&paths);
    let mut pipeline = Pipeline::new(Classifier::new(registry, config));
    for path in &paths {
        let shown = display_path(path, root.as_deref());
        pipeline.process_file(path, &shown);
    }

    let Pipeline {
        accumulator,
        mut summary,
        ..
    } = pipeline;
    let bundle = accumulator.finish();

    if config.dry_run {
        info!(files = bundle.files.len(), "Dry run, bundle not written");
    } else {
        bundle.write_to(&config.output_dir)?;
        summary.output_dir = Some(config.output_dir.clone());
        info!(path = %config.output_dir.display(), "{}", summary.success_message());
    }

    Ok(RunOutput { bundle, summary })
}

struct Pipeline<'r> {
    classifier: Classifier<'r>,
    accumulator: Accumulator,
    summary: RunSummary,
}

impl<'r> Pipeline<'r> {
    fn new(classifier: Classifier<'r>) -> Self {
        Self {
            classifier,
            accumulator: Accumulator::new(),
            summary: RunSummary::default(),
        }
    }

    fn process_file(&mut self, path: &Path, shown: &str) {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.unreadable(shown, e.to_string());
                return;
            }
        };
        let documents = match split_bytes(&bytes) {
            Ok(documents) => documents,
            Err(e) => {
                self.unreadable(shown, e.to_string());
                return;
            }
        };

        self.summary.files_read += 1;
        debug!(file = shown, "Reading manifests");
        for document in documents {
            self.summary.documents += 1;
            self.process_document(&document, shown);
        }
    }

    fn process_document(&mut self, document: &Document<'_>, file: &str) {
        let resource = match self.classifier.classify(document) {
            Ok(resource) => resource,
            Err(e) => {
                let kind = e.kind().map(str::to_string);
                self.skip(document, file, kind, &e);
                return;
            }
        };

        let kind = resource.kind().to_string();
        let typed = resource.is_typed();
        let name = resource.name().map(str::to_string);
        let literal = match &resource {
            Resource::Typed(typed) => match encode_typed(typed) {
                Ok(literal) => literal,
                Err(e) => {
                    self.skip_encode(document, file, &kind, &e);
                    return;
                }
            },
            Resource::Unstructured(u) => encode_unstructured(&u.tree),
        };

        for warning in &literal.warnings {
            self.summary.warnings.push(WarningRecord {
                file: file.to_string(),
                index: document.index,
                kind: kind.clone(),
                message: warning.to_string(),
            });
        }

        let binding = self.accumulator.add(EncodedResource {
            kind: kind.clone(),
            typed,
            name,
            literal,
            source: SourceRef {
                file: file.to_string(),
                index: document.index,
            },
        });
        self.summary.kind_mut(&kind, typed).generated += 1;
        debug!(file, index = document.index, kind = %kind, binding = %binding, "Resource encoded");
    }

    fn skip(&mut self, document: &Document<'_>, file: &str, kind: Option<String>, e: &DocumentError) {
        error!(
            file,
            index = document.index,
            line = document.line,
            error = %e,
            "Skipping document"
        );
        if let Some(kind) = &kind {
            let typed = self.classifier.route(kind) == Route::Typed;
            self.summary.kind_mut(kind, typed).skipped += 1;
        }
        self.summary.skipped.push(SkippedDocument {
            file: file.to_string(),
            index: document.index,
            line: document.line,
            kind,
            reason: e.to_string(),
        });
    }

    fn skip_encode(&mut self, document: &Document<'_>, file: &str, kind: &str, e: &EncodeError) {
        error!(
            file,
            index = document.index,
            line = document.line,
            error = %e,
            "Skipping document"
        );
        self.summary.kind_mut(kind, true).skipped += 1;
        self.summary.skipped.push(SkippedDocument {
            file: file.to_string(),
            index: document.index,
            line: document.line,
            kind: Some(kind.to_string()),
            reason: e.to_string(),
        });
    }

    fn unreadable(&mut self, file: &str, reason: String) {
        warn!(file, reason = %reason, "Skipping unreadable file");
        self.summary.unreadable_files.push(UnreadableFile {
            file: file.to_string(),
            reason,
        });
    }
}

/// Deepest directory containing every input
///
/// Paths are shown relative to it, so generated doc comments do not depend on
/// where the manifests happen to live.
fn common_root(paths: &[PathBuf]) -> Option<PathBuf> {
    let mut iter = paths.iter();
    let mut root = iter.next()?.parent()?.to_path_buf();
    for path in iter {
        while !path.starts_with(&root) {
            if !root.pop() {
                return None;
            }
        }
    }
    Some(root)
}

fn display_path(path: &Path, root: Option<&Path>) -> String {
    let relative = root
        .and_then(|root| path.strip_prefix(root).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path);
    // Forward slashes keep bundles identical across platforms
    relative.to_string_lossy().replace('\\', "/")
}
