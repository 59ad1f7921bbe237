use async_trait::async_trait;
use json_patch::Patch;
use k8s_openapi::api::{
    apps::v1::DaemonSet,
    core::v1::{Namespace, Node},
};
use thiserror::Error;

pub mod operations;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("{kind} '{name}' doesn't exist on the cluster!")]
    NotFound { kind: &'static str, name: String },
    #[error("Kubernetes API request for {kind} '{name}' failed! Reason: {source}")]
    KubeApiError {
        kind: &'static str,
        name: String,
        #[source]
        source: kube::Error,
    },
}

impl ClusterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound { .. })
    }
}

pub trait NotFoundExt<T> {
    /// Turns a `NotFound` error into `Ok(None)`, leaving other failures intact.
    fn found(self) -> Result<Option<T>, ClusterError>;
}

impl<T> NotFoundExt<T> for Result<T, ClusterError> {
    fn found(self) -> Result<Option<T>, ClusterError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }
}

/// The subset of the kubernetes API the uninstaller talks to.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Deletes every pod in the namespace.
    async fn delete_pod_collection(&self, namespace: &str) -> Result<(), ClusterError>;
    async fn delete_namespace(&self, name: &str) -> Result<(), ClusterError>;
    async fn get_namespace(&self, name: &str) -> Result<Namespace, ClusterError>;
    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError>;
    async fn patch_node(&self, name: &str, patch: &Patch) -> Result<(), ClusterError>;
    async fn get_daemonset(&self, namespace: &str, name: &str)
        -> Result<DaemonSet, ClusterError>;
    async fn patch_daemonset(
        &self,
        namespace: &str,
        name: &str,
        patch: &Patch,
    ) -> Result<(), ClusterError>;
}
