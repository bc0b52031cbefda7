//! Host type table for the emitted `k8s-openapi` literals
//!
//! Serialization reports struct names and field names, but not where a type
//! lives or which of its fields are `Option`s. This table fills that gap for
//! every struct reachable from the typed kinds.

use std::borrow::Cow;

use phf::phf_map;

const APPS: &str = "k8s_openapi::api::apps::v1";
const CORE: &str = "k8s_openapi::api::core::v1";
/// Module of `ObjectMeta` and the time newtypes
pub const META: &str = "k8s_openapi::apimachinery::pkg::apis::meta::v1";
const RBAC: &str = "k8s_openapi::api::rbac::v1";
const SCHEDULING: &str = "k8s_openapi::api::scheduling::v1";

/// A `k8s-openapi` struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostType {
    /// Module the type is declared in
    pub module: &'static str,
    /// Top-level resource: `apiVersion` and `kind` are implied by the type
    pub resource: bool,
    /// Wire names of the fields that are not `Option`s
    pub required: &'static [&'static str],
}

impl HostType {
    const fn resource(module: &'static str, required: &'static [&'static str]) -> Self {
        Self {
            module,
            resource: true,
            required,
        }
    }

    const fn object(module: &'static str, required: &'static [&'static str]) -> Self {
        Self {
            module,
            resource: false,
            required,
        }
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(&field)
    }
}

pub static HOST_TYPES: phf::Map<&'static str, HostType> = phf_map! {
    // apps/v1
    "Deployment" => HostType::resource(APPS, &["metadata"]),
    "DeploymentSpec" => HostType::object(APPS, &["selector", "template"]),
    "DeploymentStrategy" => HostType::object(APPS, &[]),
    "RollingUpdateDeployment" => HostType::object(APPS, &[]),
    "DeploymentStatus" => HostType::object(APPS, &[]),
    "DeploymentCondition" => HostType::object(APPS, &["status", "type"]),
    "StatefulSet" => HostType::resource(APPS, &["metadata"]),
    "StatefulSetSpec" => HostType::object(APPS, &["selector", "serviceName", "template"]),
    "StatefulSetUpdateStrategy" => HostType::object(APPS, &[]),
    "RollingUpdateStatefulSetStrategy" => HostType::object(APPS, &[]),
    "StatefulSetPersistentVolumeClaimRetentionPolicy" => HostType::object(APPS, &[]),
    "StatefulSetOrdinals" => HostType::object(APPS, &[]),
    "StatefulSetStatus" => HostType::object(APPS, &["replicas"]),
    "StatefulSetCondition" => HostType::object(APPS, &["status", "type"]),

    // core/v1 resources
    "ConfigMap" => HostType::resource(CORE, &["metadata"]),
    "Secret" => HostType::resource(CORE, &["metadata"]),
    "ServiceAccount" => HostType::resource(CORE, &["metadata"]),
    "Service" => HostType::resource(CORE, &["metadata"]),
    "PersistentVolumeClaim" => HostType::resource(CORE, &["metadata"]),

    // core/v1 service
    "ServiceSpec" => HostType::object(CORE, &[]),
    "ServicePort" => HostType::object(CORE, &["port"]),
    "SessionAffinityConfig" => HostType::object(CORE, &[]),
    "ClientIPConfig" => HostType::object(CORE, &[]),
    "ServiceStatus" => HostType::object(CORE, &[]),
    "LoadBalancerStatus" => HostType::object(CORE, &[]),
    "LoadBalancerIngress" => HostType::object(CORE, &[]),
    "PortStatus" => HostType::object(CORE, &["port", "protocol"]),

    // core/v1 claims
    "PersistentVolumeClaimSpec" => HostType::object(CORE, &[]),
    "PersistentVolumeClaimStatus" => HostType::object(CORE, &[]),
    "PersistentVolumeClaimCondition" => HostType::object(CORE, &["status", "type"]),
    "PersistentVolumeClaimTemplate" => HostType::object(CORE, &["spec"]),
    "VolumeResourceRequirements" => HostType::object(CORE, &[]),
    "TypedLocalObjectReference" => HostType::object(CORE, &["kind", "name"]),
    "TypedObjectReference" => HostType::object(CORE, &["kind", "name"]),
    "ModifyVolumeStatus" => HostType::object(CORE, &["status"]),

    // core/v1 references
    "ObjectReference" => HostType::object(CORE, &[]),
    "LocalObjectReference" => HostType::object(CORE, &["name"]),

    // core/v1 pods
    "PodTemplateSpec" => HostType::object(CORE, &[]),
    "PodSpec" => HostType::object(CORE, &["containers"]),
    "Container" => HostType::object(CORE, &["name"]),
    "EphemeralContainer" => HostType::object(CORE, &["name"]),
    "ContainerPort" => HostType::object(CORE, &["containerPort"]),
    "ContainerResizePolicy" => HostType::object(CORE, &["resourceName", "restartPolicy"]),
    "EnvVar" => HostType::object(CORE, &["name"]),
    "EnvVarSource" => HostType::object(CORE, &[]),
    "EnvFromSource" => HostType::object(CORE, &[]),
    "ConfigMapKeySelector" => HostType::object(CORE, &["key", "name"]),
    "SecretKeySelector" => HostType::object(CORE, &["key", "name"]),
    "ConfigMapEnvSource" => HostType::object(CORE, &["name"]),
    "SecretEnvSource" => HostType::object(CORE, &["name"]),
    "ObjectFieldSelector" => HostType::object(CORE, &["fieldPath"]),
    "ResourceFieldSelector" => HostType::object(CORE, &["resource"]),
    "ResourceRequirements" => HostType::object(CORE, &[]),
    "ResourceClaim" => HostType::object(CORE, &["name"]),
    "VolumeMount" => HostType::object(CORE, &["mountPath", "name"]),
    "VolumeDevice" => HostType::object(CORE, &["devicePath", "name"]),
    "Probe" => HostType::object(CORE, &[]),
    "ExecAction" => HostType::object(CORE, &[]),
    "HTTPGetAction" => HostType::object(CORE, &["port"]),
    "HTTPHeader" => HostType::object(CORE, &["name", "value"]),
    "TCPSocketAction" => HostType::object(CORE, &["port"]),
    "GRPCAction" => HostType::object(CORE, &["port"]),
    "Lifecycle" => HostType::object(CORE, &[]),
    "LifecycleHandler" => HostType::object(CORE, &[]),
    "SleepAction" => HostType::object(CORE, &["seconds"]),
    "SecurityContext" => HostType::object(CORE, &[]),
    "PodSecurityContext" => HostType::object(CORE, &[]),
    "Capabilities" => HostType::object(CORE, &[]),
    "SELinuxOptions" => HostType::object(CORE, &[]),
    "SeccompProfile" => HostType::object(CORE, &["type"]),
    "AppArmorProfile" => HostType::object(CORE, &["type"]),
    "WindowsSecurityContextOptions" => HostType::object(CORE, &[]),
    "Sysctl" => HostType::object(CORE, &["name", "value"]),
    "Affinity" => HostType::object(CORE, &[]),
    "NodeAffinity" => HostType::object(CORE, &[]),
    "NodeSelector" => HostType::object(CORE, &["nodeSelectorTerms"]),
    "NodeSelectorTerm" => HostType::object(CORE, &[]),
    "NodeSelectorRequirement" => HostType::object(CORE, &["key", "operator"]),
    "PreferredSchedulingTerm" => HostType::object(CORE, &["preference", "weight"]),
    "PodAffinity" => HostType::object(CORE, &[]),
    "PodAntiAffinity" => HostType::object(CORE, &[]),
    "PodAffinityTerm" => HostType::object(CORE, &["topologyKey"]),
    "WeightedPodAffinityTerm" => HostType::object(CORE, &["podAffinityTerm", "weight"]),
    "Toleration" => HostType::object(CORE, &[]),
    "TopologySpreadConstraint" => HostType::object(CORE, &["maxSkew", "topologyKey", "whenUnsatisfiable"]),
    "HostAlias" => HostType::object(CORE, &["ip"]),
    "PodDNSConfig" => HostType::object(CORE, &[]),
    "PodDNSConfigOption" => HostType::object(CORE, &[]),
    "PodReadinessGate" => HostType::object(CORE, &["conditionType"]),
    "PodOS" => HostType::object(CORE, &["name"]),
    "PodSchedulingGate" => HostType::object(CORE, &["name"]),
    "PodResourceClaim" => HostType::object(CORE, &["name"]),

    // core/v1 volumes
    "Volume" => HostType::object(CORE, &["name"]),
    "EmptyDirVolumeSource" => HostType::object(CORE, &[]),
    "ConfigMapVolumeSource" => HostType::object(CORE, &["name"]),
    "SecretVolumeSource" => HostType::object(CORE, &[]),
    "KeyToPath" => HostType::object(CORE, &["key", "path"]),
    "PersistentVolumeClaimVolumeSource" => HostType::object(CORE, &["claimName"]),
    "HostPathVolumeSource" => HostType::object(CORE, &["path"]),
    "ProjectedVolumeSource" => HostType::object(CORE, &[]),
    "VolumeProjection" => HostType::object(CORE, &[]),
    "ConfigMapProjection" => HostType::object(CORE, &["name"]),
    "SecretProjection" => HostType::object(CORE, &["name"]),
    "ServiceAccountTokenProjection" => HostType::object(CORE, &["path"]),
    "DownwardAPIProjection" => HostType::object(CORE, &[]),
    "DownwardAPIVolumeSource" => HostType::object(CORE, &[]),
    "DownwardAPIVolumeFile" => HostType::object(CORE, &["path"]),
    "ClusterTrustBundleProjection" => HostType::object(CORE, &["path"]),
    "NFSVolumeSource" => HostType::object(CORE, &["path", "server"]),
    "CSIVolumeSource" => HostType::object(CORE, &["driver"]),
    "EphemeralVolumeSource" => HostType::object(CORE, &[]),

    // meta/v1
    "ObjectMeta" => HostType::object(META, &[]),
    "OwnerReference" => HostType::object(META, &["apiVersion", "kind", "name", "uid"]),
    "ManagedFieldsEntry" => HostType::object(META, &[]),
    "LabelSelector" => HostType::object(META, &[]),
    "LabelSelectorRequirement" => HostType::object(META, &["key", "operator"]),
    "Condition" => HostType::object(META, &["lastTransitionTime", "message", "reason", "status", "type"]),

    // rbac.authorization.k8s.io/v1
    "Role" => HostType::resource(RBAC, &["metadata"]),
    "ClusterRole" => HostType::resource(RBAC, &["metadata"]),
    "RoleBinding" => HostType::resource(RBAC, &["metadata", "roleRef"]),
    "ClusterRoleBinding" => HostType::resource(RBAC, &["metadata", "roleRef"]),
    "PolicyRule" => HostType::object(RBAC, &["verbs"]),
    "AggregationRule" => HostType::object(RBAC, &[]),
    "RoleRef" => HostType::object(RBAC, &["apiGroup", "kind", "name"]),
    "Subject" => HostType::object(RBAC, &["kind", "name"]),

    // scheduling.k8s.io/v1
    "PriorityClass" => HostType::resource(SCHEDULING, &["metadata", "value"]),
};

/// Module of `Quantity`
pub const RESOURCE: &str = "k8s_openapi::apimachinery::pkg::api::resource";

/// Module of `ByteString`
pub const CRATE_ROOT: &str = "k8s_openapi";

/// Single-field newtypes and where they live
pub static NEWTYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "Quantity" => RESOURCE,
    "Time" => META,
    "MicroTime" => META,
    "FieldsV1" => META,
    "ByteString" => CRATE_ROOT,
};

/// Module of `IntOrString`
pub const INTSTR: &str = "k8s_openapi::apimachinery::pkg::util::intstr";

/// Fields whose type does not survive serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHint {
    /// `IntOrString`, serialized as a bare integer or string
    IntOrString,
    /// `ByteString`, serialized as base64 text
    ByteString,
    /// `BTreeMap<String, ByteString>`
    ByteStringMap,
}

/// Keyed by `"<Struct>.<wireField>"`
pub static FIELD_HINTS: phf::Map<&'static str, FieldHint> = phf_map! {
    "RollingUpdateDeployment.maxSurge" => FieldHint::IntOrString,
    "RollingUpdateDeployment.maxUnavailable" => FieldHint::IntOrString,
    "RollingUpdateStatefulSetStrategy.maxUnavailable" => FieldHint::IntOrString,
    "ServicePort.targetPort" => FieldHint::IntOrString,
    "HTTPGetAction.port" => FieldHint::IntOrString,
    "TCPSocketAction.port" => FieldHint::IntOrString,
    "Secret.data" => FieldHint::ByteStringMap,
    "ConfigMap.binaryData" => FieldHint::ByteStringMap,
};

pub fn field_hint(type_name: &str, field: &str) -> Option<FieldHint> {
    FIELD_HINTS.get(format!("{type_name}.{field}").as_str()).copied()
}

/// Rust field name `k8s-openapi` gives a wire field name
pub fn rust_field_ident(name: &str) -> Cow<'static, str> {
    match name {
        "$ref" => return "ref_path".into(),
        "$schema" => return "schema".into(),
        "as" => return "as_".into(),
        "continue" => return "continue_".into(),
        "enum" => return "enum_".into(),
        "ref" => return "ref_".into(),
        "type" => return "type_".into(),
        _ => {}
    }

    // Plural acronyms
    match name {
        "clusterIPs" => return "cluster_ips".into(),
        "externalIPs" => return "external_ips".into(),
        "hostIPs" => return "host_ips".into(),
        "nonResourceURLs" => return "non_resource_urls".into(),
        "podCIDRs" => return "pod_cidrs".into(),
        "podIPs" => return "pod_ips".into(),
        "serverAddressByClientCIDRs" => return "server_address_by_client_cidrs".into(),
        "targetWWNs" => return "target_wwns".into(),
        _ => {}
    }

    let chars: Vec<char> = name.chars().collect();
    let mut ident = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_upper = i.checked_sub(1).map(|p| chars[p].is_uppercase());
            let next_upper = chars.get(i + 1).map(|n| n.is_uppercase());
            if matches!((prev_upper, next_upper), (Some(false), _) | (Some(true), Some(false))) {
                ident.push('_');
            }
            ident.extend(c.to_lowercase());
        } else if c == '-' {
            ident.push('_');
        } else {
            ident.push(c);
        }
    }
    ident.into()
}
