//! Kinds command - list the kinds with a typed schema

use krmgen_core::{DEFAULT_TYPED_KINDS, KubeRegistry, SchemaRegistry, registered_kind};
use serde::Serialize;

use crate::display;
use crate::error::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KindEntry {
    kind: String,
    api_version: String,
    namespaced: bool,
    typed_by_default: bool,
}

pub fn run(json: bool) -> Result<()> {
    let registry = KubeRegistry::new();
    let kinds: Vec<_> = registry
        .registered_kinds()
        .iter()
        .filter_map(|kind| registered_kind(kind))
        .collect();

    if json {
        let entries: Vec<_> = kinds
            .iter()
            .map(|k| KindEntry {
                kind: k.gvk.kind.clone(),
                api_version: k.gvk.api_version(),
                namespaced: k.namespaced,
                typed_by_default: DEFAULT_TYPED_KINDS.contains(&k.gvk.kind.as_str()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        display::print_kinds(&kinds);
    }
    Ok(())
}
