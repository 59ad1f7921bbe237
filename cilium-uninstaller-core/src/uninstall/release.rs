use log::info;

use crate::release::{DeletionPropagation, ReleaseManager, ReleaseUninstallRequest};

use super::{config::UninstallConfig, error::UninstallError};

pub fn release_uninstall_request(config: &UninstallConfig) -> ReleaseUninstallRequest {
    ReleaseUninstallRequest {
        release_name: config.release_name.to_owned(),
        namespace: config.namespace.to_owned(),
        wait: config.wait,
        timeout: config.timeout,
        propagation: config.wait.then_some(DeletionPropagation::Foreground),
        dry_run: config.dry_run,
    }
}

pub async fn uninstall_release(
    release_manager: &dyn ReleaseManager,
    config: &UninstallConfig,
) -> Result<(), UninstallError> {
    info!(
        "Uninstalling '{}' release from '{}' namespace...",
        config.release_name, config.namespace
    );

    release_manager
        .uninstall(&release_uninstall_request(config))
        .await
        .map_err(UninstallError::Release)
}
