use log::{debug, info, warn};

use crate::{kubernetes::ClusterApi, release::ReleaseManager};

use self::{
    annotations::cleanup_node_annotations, compensation::rollback_compensation,
    config::UninstallConfig, error::UninstallError, namespace::delete_test_namespace,
    release::uninstall_release,
};

pub mod annotations;
pub mod compensation;
pub mod config;
pub mod error;
pub mod namespace;
pub mod release;

#[cfg(test)]
pub(crate) mod fake;

/// Outcome of a run that didn't hit a fatal error.
#[derive(Debug, Default)]
pub struct UninstallSummary {
    /// best-effort phases that failed along the way
    pub warnings: Vec<UninstallError>,
    pub annotated_nodes: usize,
    pub compensation_rolled_back: bool,
}

/// Removes everything an install left on the cluster.
///
/// Phases run in order: test namespace, release, node annotations, `aws-node`
/// compensation. Only the release and a failed rollback of a present `aws-node`
/// DaemonSet can fail the run; everything else is reported as a warning.
pub struct Uninstaller<'a> {
    cluster: &'a dyn ClusterApi,
    release_manager: &'a dyn ReleaseManager,
    config: UninstallConfig,
}

impl<'a> Uninstaller<'a> {
    pub fn new(
        cluster: &'a dyn ClusterApi,
        release_manager: &'a dyn ReleaseManager,
        config: UninstallConfig,
    ) -> Self {
        Self {
            cluster,
            release_manager,
            config,
        }
    }

    pub async fn run(&self) -> Result<UninstallSummary, UninstallError> {
        let mut summary = UninstallSummary::default();

        debug!("{:#?}", self.config);

        for error in delete_test_namespace(self.cluster, &self.config).await {
            warn!("{error}");
            summary.warnings.push(error);
        }

        uninstall_release(self.release_manager, &self.config).await?;

        match cleanup_node_annotations(self.cluster, self.config.worker_count()).await {
            Ok(patched) => summary.annotated_nodes = patched,
            Err(error) => {
                warn!("Failed to clean up node annotations: {error}");
                summary.warnings.push(error);
            }
        }

        match rollback_compensation(self.cluster).await {
            Ok(rolled_back) => summary.compensation_rolled_back = rolled_back,
            Err(error @ UninstallError::CompensationLookup { .. }) => {
                warn!("{error}");
                summary.warnings.push(error);
            }
            Err(error) => return Err(error),
        }

        if summary.warnings.is_empty() {
            info!("Cilium was uninstalled");
        } else {
            info!(
                "Cilium was uninstalled with {} warning(s)",
                summary.warnings.len()
            );
        }

        Ok(summary)
    }
}
