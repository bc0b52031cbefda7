//! Assembling encoded resources into a generated Rust module
//!
//! The output is a directory holding `mod.rs` plus one file per kind:
//!
//! ```text
//! generated/
//! ├── mod.rs            # Resource enum, KIND_INDEX, resources(kind)
//! ├── config_map.rs     # pub fn <binding>() -> ConfigMap, pub fn all()
//! └── widget.rs         # pub fn <binding>() -> serde_json::Value, pub fn all()
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AssemblyWriteError;
use crate::literal::{Expr, Literal, indent_continuation, quote_str};
use crate::naming::{IdentAllocator, binding_base, module_name};
use crate::schema::{CRATE_ROOT, HOST_TYPES};

const HEADER: &str = "// @generated by krmgen. Do not edit by hand.";

/// Where a resource came from, for the doc comment of its binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub file: String,
    pub index: usize,
}

/// One resource ready to be placed in the bundle
#[derive(Debug, Clone)]
pub struct EncodedResource {
    pub kind: String,
    pub typed: bool,
    pub name: Option<String>,
    pub literal: Literal,
    pub source: SourceRef,
}

#[derive(Debug, Clone)]
struct Entry {
    binding: String,
    name: Option<String>,
    literal: Literal,
    source: SourceRef,
}

#[derive(Debug, Clone)]
struct KindGroup {
    typed: bool,
    bindings: IdentAllocator,
    entries: Vec<Entry>,
}

/// Resources collected so far, grouped by kind
///
/// Kinds iterate in lexical order; bindings within a kind keep encounter order.
#[derive(Debug, Default, Clone)]
pub struct Accumulator {
    groups: BTreeMap<String, KindGroup>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, returning the binding it was given
    pub fn add(&mut self, resource: EncodedResource) -> String {
        let group = self
            .groups
            .entry(resource.kind)
            .or_insert_with(|| KindGroup {
                typed: resource.typed,
                bindings: IdentAllocator::new(),
                entries: Vec::new(),
            });
        let binding = group
            .bindings
            .allocate(&binding_base(resource.name.as_deref()));
        group.entries.push(Entry {
            binding: binding.clone(),
            name: resource.name,
            literal: resource.literal,
            source: resource.source,
        });
        binding
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of resources collected for `kind`
    pub fn count(&self, kind: &str) -> usize {
        self.groups.get(kind).map_or(0, |g| g.entries.len())
    }

    /// Kinds with their bindings, in output order
    pub fn index(&self) -> Vec<(String, Vec<String>)> {
        self.groups
            .iter()
            .map(|(kind, group)| {
                let bindings = group.entries.iter().map(|e| e.binding.clone()).collect();
                (kind.clone(), bindings)
            })
            .collect()
    }

    /// Render the collected resources
    pub fn finish(self) -> Bundle {
        let mut modules = IdentAllocator::new();
        // `mod.rs` owns this name
        modules.allocate("mod");

        let mut kinds = Vec::with_capacity(self.groups.len());
        let mut files = Vec::with_capacity(self.groups.len() + 1);
        for (kind, group) in &self.groups {
            let module = modules.allocate(&module_name(kind));
            let return_type = ReturnType::of(kind, group.typed);
            files.push(GeneratedFile {
                path: PathBuf::from(format!("{module}.rs")),
                contents: render_kind_file(kind, &return_type, &group.entries),
            });
            kinds.push(KindModule {
                kind,
                module,
                return_type,
                bindings: group.entries.iter().map(|e| e.binding.as_str()).collect(),
            });
        }

        files.insert(
            0,
            GeneratedFile {
                path: PathBuf::from("mod.rs"),
                contents: render_mod_file(&kinds),
            },
        );
        Bundle { files }
    }
}

/// Return type of the bindings of one kind
#[derive(Debug, Clone)]
enum ReturnType {
    Typed { module: &'static str, name: String },
    Value,
}

impl ReturnType {
    fn of(kind: &str, typed: bool) -> Self {
        if !typed {
            return ReturnType::Value;
        }
        let module = match HOST_TYPES.get(kind) {
            Some(host) => host.module,
            None => {
                tracing::warn!(kind, "Typed kind missing from the host type table");
                CRATE_ROOT
            }
        };
        ReturnType::Typed {
            module,
            name: kind.to_string(),
        }
    }

    fn name(&self) -> &str {
        match self {
            ReturnType::Typed { name, .. } => name,
            ReturnType::Value => "Value",
        }
    }

    fn path(&self) -> String {
        match self {
            ReturnType::Typed { module, name } => format!("{module}::{name}"),
            ReturnType::Value => "serde_json::Value".to_string(),
        }
    }
}

struct KindModule<'a> {
    kind: &'a str,
    module: String,
    return_type: ReturnType,
    bindings: Vec<&'a str>,
}

fn render_kind_file(kind: &str, return_type: &ReturnType, entries: &[Entry]) -> String {
    let mut imports: BTreeSet<String> = entries
        .iter()
        .flat_map(|e| e.literal.imports.iter().cloned())
        .collect();
    imports.insert(return_type.path());

    let ty = return_type.name();
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    let _ = writeln!(out, "//! `{kind}` resources");
    out.push('\n');
    for import in &imports {
        let _ = writeln!(out, "use {import};");
    }

    for entry in entries {
        out.push('\n');
        let _ = writeln!(
            out,
            "/// `{}` from `{}` (document {})",
            entry.name.as_deref().unwrap_or("<unnamed>"),
            entry.source.file,
            entry.source.index
        );
        let _ = writeln!(out, "pub fn {}() -> {ty} {{", entry.binding);
        let _ = writeln!(
            out,
            "    {}",
            indent_continuation(&entry.literal.expression, 1)
        );
        out.push_str("}\n");
    }

    let calls = entries
        .iter()
        .map(|e| Expr::atom(format!("{}()", e.binding)))
        .collect();
    let all = Expr::block("vec![", calls, "]").render();
    out.push('\n');
    let _ = writeln!(out, "/// Every `{kind}`, in manifest order");
    let _ = writeln!(out, "pub fn all() -> Vec<{ty}> {{");
    let _ = writeln!(out, "    {}", indent_continuation(&all, 1));
    out.push_str("}\n");
    out
}

fn render_mod_file(kinds: &[KindModule<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    let _ = writeln!(out, "//! Resources reconstructed from Kubernetes manifests");

    if !kinds.is_empty() {
        out.push('\n');
        for k in kinds {
            let _ = writeln!(out, "pub mod {};", k.module);
        }
    }

    out.push_str("\n/// Any generated resource\n");
    out.push_str("#[derive(Debug, Clone, PartialEq)]\n");
    out.push_str("pub enum Resource {\n");
    for k in kinds {
        if let ReturnType::Typed { .. } = k.return_type {
            let _ = writeln!(out, "    {}(::{}),", k.kind, k.return_type.path());
        }
    }
    out.push_str("    Unstructured(::serde_json::Value),\n");
    out.push_str("}\n");

    out.push_str("\n/// Kinds and their bindings, in manifest order\n");
    if kinds.is_empty() {
        out.push_str("pub const KIND_INDEX: &[(&str, &[&str])] = &[];\n");
    } else {
        out.push_str("pub const KIND_INDEX: &[(&str, &[&str])] = &[\n");
        for k in kinds {
            let bindings: Vec<String> = k.bindings.iter().map(|b| quote_str(b)).collect();
            let _ = writeln!(
                out,
                "    ({}, &[{}]),",
                quote_str(k.kind),
                bindings.join(", ")
            );
        }
        out.push_str("];\n");
    }

    out.push_str("\n/// Every resource of `kind`, or `None` if the kind was not generated\n");
    if kinds.is_empty() {
        out.push_str("pub fn resources(_kind: &str) -> Option<Vec<Resource>> {\n    None\n}\n");
        return out;
    }
    out.push_str("pub fn resources(kind: &str) -> Option<Vec<Resource>> {\n");
    out.push_str("    let resources = match kind {\n");
    for k in kinds {
        let variant = match k.return_type {
            ReturnType::Typed { .. } => k.kind,
            ReturnType::Value => "Unstructured",
        };
        let _ = writeln!(
            out,
            "        {} => {}::all().into_iter().map(Resource::{variant}).collect(),",
            quote_str(k.kind),
            k.module
        );
    }
    out.push_str("        _ => return None,\n");
    out.push_str("    };\n");
    out.push_str("    Some(resources)\n");
    out.push_str("}\n");
    out
}

/// A generated source file, relative to the bundle root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// The complete set of generated files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    pub files: Vec<GeneratedFile>,
}

impl Bundle {
    /// Look up a file by its relative path
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path.as_ref())
    }

    /// Replace the directory at `dest` with this bundle
    ///
    /// Files are staged in a temporary directory next to `dest` and renamed
    /// into place, so readers never see a half-written bundle. A previous
    /// bundle is moved aside first and removed once the new one is in place.
    pub fn write_to(&self, dest: &Path) -> Result<(), AssemblyWriteError> {
        let Some(dir_name) = dest.file_name() else {
            return Err(AssemblyWriteError::new(
                dest,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "output path has no directory name",
                ),
            ));
        };
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| AssemblyWriteError::new(&parent, e))?;

        // Dropping the guard removes whatever is left of the staging directory
        let staging = tempfile::Builder::new()
            .prefix(".krmgen-")
            .tempdir_in(&parent)
            .map_err(|e| AssemblyWriteError::new(&parent, e))?;
        for file in &self.files {
            let path = staging.path().join(&file.path);
            fs::write(&path, &file.contents)
                .map_err(|e| AssemblyWriteError::new(dest.join(&file.path), e))?;
        }
        // Temporary directories are private; the bundle is not
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(staging.path(), fs::Permissions::from_mode(0o755))
                .map_err(|e| AssemblyWriteError::new(dest, e))?;
        }

        let backup = if dest.exists() {
            let backup = parent.join(format!(".{}.krmgen-old", dir_name.to_string_lossy()));
            if backup.exists() {
                remove_path(&backup).map_err(|e| AssemblyWriteError::new(&backup, e))?;
            }
            fs::rename(dest, &backup).map_err(|e| AssemblyWriteError::new(dest, e))?;
            Some(backup)
        } else {
            None
        };

        if let Err(e) = fs::rename(staging.path(), dest) {
            if let Some(backup) = &backup {
                if let Err(restore) = fs::rename(backup, dest) {
                    tracing::error!(
                        backup = %backup.display(),
                        error = %restore,
                        "Failed to restore previous output"
                    );
                }
            }
            return Err(AssemblyWriteError::new(dest, e));
        }

        if let Some(backup) = backup {
            if let Err(e) = remove_path(&backup) {
                tracing::warn!(
                    path = %backup.display(),
                    error = %e,
                    "Failed to delete previous output, manual delete advised"
                );
            }
        }

        tracing::debug!(path = %dest.display(), files = self.files.len(), "Bundle written");
        Ok(())
    }
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
