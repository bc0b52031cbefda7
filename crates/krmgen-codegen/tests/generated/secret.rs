// @generated by krmgen. Do not edit by hand.
//! `Secret` resources

use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// `app-secret` from `config/settings.yaml` (document 1)
pub fn app_secret() -> Secret {
    Secret {
        data: Some(BTreeMap::from([
            ("password".to_owned(), ByteString(b"hunter2".to_vec())),
        ])),
        metadata: ObjectMeta {
            name: Some("app-secret".to_owned()),
            namespace: Some("default".to_owned()),
            ..Default::default()
        },
        type_: Some("Opaque".to_owned()),
        ..Default::default()
    }
}

/// Every `Secret`, in manifest order
pub fn all() -> Vec<Secret> {
    vec![
        app_secret(),
    ]
}
