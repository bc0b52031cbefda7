// @generated by krmgen. Do not edit by hand.
//! Resources reconstructed from Kubernetes manifests

pub mod config_map;
pub mod deployment;
pub mod secret;
pub mod service;
pub mod widget;

/// Any generated resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    ConfigMap(::k8s_openapi::api::core::v1::ConfigMap),
    Deployment(::k8s_openapi::api::apps::v1::Deployment),
    Secret(::k8s_openapi::api::core::v1::Secret),
    Service(::k8s_openapi::api::core::v1::Service),
    Unstructured(::serde_json::Value),
}

/// Kinds and their bindings, in manifest order
pub const KIND_INDEX: &[(&str, &[&str])] = &[
    ("ConfigMap", &["app_config"]),
    ("Deployment", &["web"]),
    ("Secret", &["app_secret"]),
    ("Service", &["web"]),
    ("Widget", &["blue_widget"]),
];

/// Every resource of `kind`, or `None` if the kind was not generated
pub fn resources(kind: &str) -> Option<Vec<Resource>> {
    let resources = match kind {
        "ConfigMap" => config_map::all().into_iter().map(Resource::ConfigMap).collect(),
        "Deployment" => deployment::all().into_iter().map(Resource::Deployment).collect(),
        "Secret" => secret::all().into_iter().map(Resource::Secret).collect(),
        "Service" => service::all().into_iter().map(Resource::Service).collect(),
        "Widget" => widget::all().into_iter().map(Resource::Unstructured).collect(),
        _ => return None,
    };
    Some(resources)
}
