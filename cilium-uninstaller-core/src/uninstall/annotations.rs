use futures::{future, stream, StreamExt};
use json_patch::Patch;
use k8s_openapi::api::core::v1::Node;
use log::{debug, info, warn};

use crate::{kubernetes::ClusterApi, patch::annotation_removal_patch, NODE_ANNOTATION_PREFIXES};

use super::error::{NodePatchFailure, UninstallError};

pub fn is_platform_annotation(key: &str) -> bool {
    NODE_ANNOTATION_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

pub fn platform_annotation_keys(node: &Node) -> Vec<&str> {
    node.metadata
        .annotations
        .iter()
        .flatten()
        .map(|(key, _)| key.as_str())
        .filter(|key| is_platform_annotation(key))
        .collect()
}

/// Builds the patch stripping platform annotations off a node, if it has any.
pub fn node_annotation_patch(node: &Node) -> Option<Patch> {
    let keys = platform_annotation_keys(node);

    if keys.is_empty() {
        return None;
    }

    Some(annotation_removal_patch(keys))
}

/// Removes platform-owned annotations from every node of the cluster.
///
/// Nodes are patched independently, at most `worker_count` at a time. A node
/// that can't be patched doesn't stop the others; all failures are reported
/// together once every node was visited. Returns the number of patched nodes.
pub async fn cleanup_node_annotations(
    cluster: &dyn ClusterApi,
    worker_count: usize,
) -> Result<usize, UninstallError> {
    info!("Cleaning up Cilium node annotations...");

    let nodes = cluster
        .list_nodes()
        .await
        .map_err(UninstallError::NodeList)?;

    let patches = nodes
        .iter()
        .filter_map(|node| match node.metadata.name.as_deref() {
            Some(name) => node_annotation_patch(node).map(|patch| (name, patch)),
            None => {
                warn!("Cluster returned a nameless Node!"); // this shouldn't happen
                None
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "{} out of {} nodes carry Cilium annotations",
        patches.len(),
        nodes.len()
    );

    let patched = patches.len();
    let failures = stream::iter(patches)
        .map(|(name, patch)| async move {
            info!("  Removing annotations from node {name}");
            cluster
                .patch_node(name, &patch)
                .await
                .map_err(|error| NodePatchFailure {
                    node: name.to_owned(),
                    error,
                })
        })
        .buffer_unordered(worker_count.max(1))
        .filter_map(|result| future::ready(result.err()))
        .collect::<Vec<_>>()
        .await;

    if !failures.is_empty() {
        return Err(UninstallError::NodeAnnotations(failures));
    }

    Ok(patched)
}
