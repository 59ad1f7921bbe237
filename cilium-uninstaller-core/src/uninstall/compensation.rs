use log::{debug, info, warn};

use crate::{
    kubernetes::{ClusterApi, NotFoundExt},
    patch::node_selector_removal_patch,
    AWS_NODE_DAEMONSET_NAME, AWS_NODE_DAEMONSET_NAMESPACE, AWS_NODE_DAEMONSET_NODE_SELECTOR_KEY,
};

use super::error::UninstallError;

/// Drops the node selector the installer put on the `aws-node` DaemonSet.
///
/// Returns `Ok(false)` when the DaemonSet doesn't exist. A lookup failure
/// other than not-found comes back as [`UninstallError::CompensationLookup`]
/// so the caller can tell it apart from absence.
pub async fn rollback_compensation(cluster: &dyn ClusterApi) -> Result<bool, UninstallError> {
    let namespace = AWS_NODE_DAEMONSET_NAMESPACE;
    let name = AWS_NODE_DAEMONSET_NAME;

    let daemonset = cluster
        .get_daemonset(namespace, name)
        .await
        .found()
        .map_err(|source| UninstallError::CompensationLookup {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            source,
        })?;

    if daemonset.is_none() {
        debug!("'{namespace}/{name}' DaemonSet isn't present, nothing to undo");
        return Ok(false);
    }

    info!("Undoing the changes to the '{name}' DaemonSet...");
    let patch = node_selector_removal_patch(AWS_NODE_DAEMONSET_NODE_SELECTOR_KEY);

    if let Err(source) = cluster.patch_daemonset(namespace, name, &patch).await {
        warn!("Failed to patch the '{name}' DaemonSet, please remove its node selector manually!");
        return Err(UninstallError::CompensationRollback {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            source,
        });
    }

    Ok(true)
}
