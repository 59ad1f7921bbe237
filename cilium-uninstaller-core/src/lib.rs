pub mod helpers;
pub mod kubernetes;
pub mod patch;
pub mod release;
pub mod uninstall;

pub const FIELD_MANAGER: &str = "cilium-uninstaller";

/// Node annotation prefixes owned by the platform.
pub const NODE_ANNOTATION_PREFIXES: [&str; 2] = ["io.cilium.", "cilium.io/"];

pub const AWS_NODE_DAEMONSET_NAMESPACE: &str = "kube-system";
pub const AWS_NODE_DAEMONSET_NAME: &str = "aws-node";
pub const AWS_NODE_DAEMONSET_NODE_SELECTOR_KEY: &str = "io.cilium/aws-node-enabled";
