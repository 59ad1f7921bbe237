use std::time::Duration;

use anyhow::Context;
use cilium_uninstaller_core::{
    kubernetes::operations::KubeCluster,
    release::HelmReleaseManager,
    uninstall::{
        config::{UninstallConfig, UninstallConfigBuilder},
        Uninstaller,
    },
};
use kube::Client;
use log::{debug, info};

use crate::cli::{GlobalArgs, UninstallArgs};

pub fn build_config(
    global_args: &GlobalArgs,
    args: &UninstallArgs,
) -> anyhow::Result<UninstallConfig> {
    UninstallConfigBuilder::default()
        .namespace(global_args.namespace.as_str())
        .test_namespace(args.test_namespace.as_str())
        .wait(args.wait)
        .timeout(Duration::from_secs(args.timeout))
        .release_name(args.release_name.as_str())
        .helm_values_secret_name(args.helm_values_secret_name.as_str())
        .helm_chart_directory(args.chart_directory.clone())
        .redact_helm_cert_keys(args.redact_helm_cert_keys)
        .worker_count(args.worker_count)
        .dry_run(args.dry_run)
        .build()
        .context("Invalid uninstall parameters!")
}

pub async fn uninstall(
    global_args: GlobalArgs,
    args: UninstallArgs,
    client: Client,
) -> anyhow::Result<()> {
    let config = build_config(&global_args, &args)?;

    if config.dry_run {
        info!("Dry run, no changes will be persisted on the cluster");
    }

    debug!(
        "Ignoring install-time parameters: values secret '{}', chart directory {:?}, redact cert keys: {}",
        config.helm_values_secret_name, config.helm_chart_directory, config.redact_helm_cert_keys
    );

    let cluster = KubeCluster::new(client).with_dry_run(config.dry_run);
    let release_manager = HelmReleaseManager::new(&args.helm_binary)
        .with_kube_config(global_args.kube_config)
        .with_kube_context(global_args.kube_context);

    let summary = Uninstaller::new(&cluster, &release_manager, config)
        .run()
        .await
        .context("Couldn't uninstall Cilium!")?;

    debug!(
        "{} node(s) cleaned up, aws-node rolled back: {}, {} warning(s)",
        summary.annotated_nodes,
        summary.compensation_rolled_back,
        summary.warnings.len()
    );

    Ok(())
}
