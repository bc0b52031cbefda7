// @generated by krmgen. Do not edit by hand.
//! `Service` resources

use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::core::v1::ServicePort;
use k8s_openapi::api::core::v1::ServiceSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

/// `web` from `app.yaml` (document 1)
pub fn web() -> Service {
    Service {
        metadata: ObjectMeta {
            labels: Some(BTreeMap::from([
                ("app".to_owned(), "web".to_owned()),
            ])),
            name: Some("web".to_owned()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            ports: Some(vec![
                ServicePort {
                    name: Some("http".to_owned()),
                    port: 80,
                    target_port: Some(IntOrString::String("http".to_owned())),
                    ..Default::default()
                },
            ]),
            selector: Some(BTreeMap::from([
                ("app".to_owned(), "web".to_owned()),
            ])),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Every `Service`, in manifest order
pub fn all() -> Vec<Service> {
    vec![
        web(),
    ]
}
