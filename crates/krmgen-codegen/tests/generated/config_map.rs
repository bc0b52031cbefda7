// @generated by krmgen. Do not edit by hand.
//! `ConfigMap` resources

use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// `app-config` from `config/settings.yaml` (document 0)
pub fn app_config() -> ConfigMap {
    ConfigMap {
        data: Some(BTreeMap::from([
            ("LOG_LEVEL".to_owned(), "info".to_owned()),
            ("greeting".to_owned(), "hello \"world\"".to_owned()),
        ])),
        metadata: ObjectMeta {
            name: Some("app-config".to_owned()),
            namespace: Some("default".to_owned()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Every `ConfigMap`, in manifest order
pub fn all() -> Vec<ConfigMap> {
    vec![
        app_config(),
    ]
}
