// @generated by krmgen. Do not edit by hand.
//! `Deployment` resources

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::apps::v1::DeploymentSpec;
use k8s_openapi::api::core::v1::Container;
use k8s_openapi::api::core::v1::ContainerPort;
use k8s_openapi::api::core::v1::EmptyDirVolumeSource;
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::api::core::v1::Volume;
use k8s_openapi::api::core::v1::VolumeMount;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// `web` from `app.yaml` (document 0)
pub fn web() -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            labels: Some(BTreeMap::from([
                ("app".to_owned(), "web".to_owned()),
            ])),
            name: Some("web".to_owned()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(2),
            selector: LabelSelector {
                match_labels: Some(BTreeMap::from([
                    ("app".to_owned(), "web".to_owned()),
                ])),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(BTreeMap::from([
                        ("app".to_owned(), "web".to_owned()),
                    ])),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![
                        Container {
                            image: Some("nginx:1.27".to_owned()),
                            name: "web".to_owned(),
                            ports: Some(vec![
                                ContainerPort {
                                    container_port: 80,
                                    name: Some("http".to_owned()),
                                    ..Default::default()
                                },
                            ]),
                            resources: Some(ResourceRequirements {
                                limits: Some(BTreeMap::from([
                                    ("cpu".to_owned(), Quantity("500m".to_owned())),
                                    ("memory".to_owned(), Quantity("128Mi".to_owned())),
                                ])),
                                ..Default::default()
                            }),
                            volume_mounts: Some(vec![
                                VolumeMount {
                                    mount_path: "/cache".to_owned(),
                                    name: "cache".to_owned(),
                                    ..Default::default()
                                },
                            ]),
                            ..Default::default()
                        },
                    ],
                    volumes: Some(vec![
                        Volume {
                            empty_dir: Some(EmptyDirVolumeSource {
                                ..Default::default()
                            }),
                            name: "cache".to_owned(),
                            ..Default::default()
                        },
                    ]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Every `Deployment`, in manifest order
pub fn all() -> Vec<Deployment> {
    vec![
        web(),
    ]
}
