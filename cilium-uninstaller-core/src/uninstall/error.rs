use std::{fmt::Display, time::Duration};

use thiserror::Error;

use crate::{kubernetes::ClusterError, release::ReleaseError};

#[derive(Debug, Error)]
pub enum UninstallError {
    #[error("Couldn't delete pods in the '{}' test namespace! Reason: {}", .namespace, .source)]
    TestPods {
        namespace: String,
        #[source]
        source: ClusterError,
    },
    #[error("Couldn't clean up the '{}' test namespace! Reason: {}", .namespace, .source)]
    TestNamespace {
        namespace: String,
        #[source]
        source: ClusterError,
    },
    #[error("Namespace '{}' wasn't terminated within {:?}!", .namespace, .timeout)]
    NamespaceTerminationTimeout { namespace: String, timeout: Duration },
    #[error("Couldn't uninstall the release! Reason: {}", .0)]
    Release(#[source] ReleaseError),
    #[error("Couldn't list the cluster nodes! Reason: {}", .0)]
    NodeList(#[source] ClusterError),
    #[error("Couldn't remove annotations from {} node(s): {}", .0.len(), NodePatchFailures(.0))]
    NodeAnnotations(Vec<NodePatchFailure>),
    #[error("Couldn't look up the '{}/{}' DaemonSet! Reason: {}", .namespace, .name, .source)]
    CompensationLookup {
        namespace: String,
        name: String,
        #[source]
        source: ClusterError,
    },
    #[error("Couldn't undo the changes to the '{}/{}' DaemonSet! Reason: {}", .namespace, .name, .source)]
    CompensationRollback {
        namespace: String,
        name: String,
        #[source]
        source: ClusterError,
    },
}

#[derive(Debug)]
pub struct NodePatchFailure {
    pub node: String,
    pub error: ClusterError,
}

struct NodePatchFailures<'a>(&'a [NodePatchFailure]);

impl<'a> Display for NodePatchFailures<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} ({})", failure.node, failure.error)?;
        }

        Ok(())
    }
}
