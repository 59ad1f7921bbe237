use std::time::Duration;

use log::{debug, info};
use tokio::time::{sleep, timeout};

use crate::kubernetes::{ClusterApi, NotFoundExt};

use super::{config::UninstallConfig, error::UninstallError};

/// Deletes every pod of the test namespace, then the namespace itself.
///
/// Test pods that outlive the platform leave CNI deletions queued on the
/// nodes, so with `wait` set the namespace is polled until it is gone.
/// Nothing here is fatal; every failure is handed back to the caller.
pub async fn delete_test_namespace(
    cluster: &dyn ClusterApi,
    config: &UninstallConfig,
) -> Vec<UninstallError> {
    let namespace = config.test_namespace.as_str();
    let mut failures = Vec::new();

    info!("Deleting pods in '{namespace}' namespace...");
    match cluster.delete_pod_collection(namespace).await.found() {
        Ok(Some(())) => {}
        Ok(None) => debug!("Namespace '{namespace}' has no pods left"),
        Err(source) => failures.push(UninstallError::TestPods {
            namespace: namespace.to_owned(),
            source,
        }),
    }

    info!("Deleting '{namespace}' namespace...");
    let deleted = match cluster.delete_namespace(namespace).await.found() {
        Ok(deleted) => deleted,
        Err(source) => {
            failures.push(UninstallError::TestNamespace {
                namespace: namespace.to_owned(),
                source,
            });
            return failures;
        }
    };

    if deleted.is_none() {
        debug!("Namespace '{namespace}' is already gone");
        return failures;
    }

    if config.wait && !config.dry_run {
        info!("Waiting for '{namespace}' namespace to be terminated...");
        if let Err(error) =
            wait_for_namespace_termination(cluster, namespace, config.poll_interval, config.timeout)
                .await
        {
            failures.push(error);
        }
    }

    failures
}

/// Polls the namespace every `interval` until the cluster reports it missing.
pub async fn wait_for_namespace_termination(
    cluster: &dyn ClusterApi,
    namespace: &str,
    interval: Duration,
    deadline: Duration,
) -> Result<(), UninstallError> {
    let poll = async {
        loop {
            match cluster.get_namespace(namespace).await {
                Ok(_) => {}
                Err(error) if error.is_not_found() => return,
                Err(error) => debug!("Couldn't check the '{namespace}' namespace, retrying... {error}"),
            }

            sleep(interval).await;
        }
    };

    timeout(deadline, poll)
        .await
        .map_err(|_| UninstallError::NamespaceTerminationTimeout {
            namespace: namespace.to_owned(),
            timeout: deadline,
        })
}
