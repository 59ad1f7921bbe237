use std::{fmt::Display, path::PathBuf, process::Output, time::Duration};

use async_trait::async_trait;
use log::debug;
use thiserror::Error;
use tokio::process::Command;

use crate::helpers::{AndIf, AndIfSome};

pub const DEFAULT_HELM_BINARY: &str = "helm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPropagation {
    Background,
    Foreground,
}

impl Display for DeletionPropagation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DeletionPropagation::Background => "background",
            DeletionPropagation::Foreground => "foreground",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseUninstallRequest {
    pub release_name: String,
    pub namespace: String,
    pub wait: bool,
    pub timeout: Duration,
    /// `None` leaves the choice to the release manager.
    pub propagation: Option<DeletionPropagation>,
    pub dry_run: bool,
}

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Couldn't launch the release manager ({})! Reason: {}", .binary, .source)]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Release '{}' couldn't be uninstalled ({})! Details: {}", .release, .status, .stderr)]
    Failed {
        release: String,
        status: String,
        stderr: String,
    },
}

/// Removes a deployed release from the cluster.
#[async_trait]
pub trait ReleaseManager: Send + Sync {
    async fn uninstall(&self, request: &ReleaseUninstallRequest) -> Result<(), ReleaseError>;
}

/// [`ReleaseManager`] that drives the `helm` binary.
#[derive(Debug, Clone)]
pub struct HelmReleaseManager {
    binary: PathBuf,
    kube_config: Option<String>,
    kube_context: Option<String>,
}

impl Default for HelmReleaseManager {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_HELM_BINARY),
            kube_config: None,
            kube_context: None,
        }
    }
}

impl HelmReleaseManager {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Default::default()
        }
    }

    pub fn with_kube_config(mut self, kube_config: Option<String>) -> Self {
        self.kube_config = kube_config;

        self
    }

    pub fn with_kube_context(mut self, kube_context: Option<String>) -> Self {
        self.kube_context = kube_context;

        self
    }

    pub fn uninstall_args(&self, request: &ReleaseUninstallRequest) -> Vec<String> {
        vec![
            "uninstall".to_owned(),
            request.release_name.to_owned(),
            "--namespace".to_owned(),
            request.namespace.to_owned(),
            "--timeout".to_owned(),
            format!("{}s", request.timeout.as_secs()),
        ]
        .and_if(request.wait, |args: Vec<String>| with_flag(args, "--wait"))
        .and_if_some(
            || request.propagation,
            |args: Vec<String>, propagation: DeletionPropagation| {
                with_value(args, "--cascade", propagation)
            },
        )
        .and_if(request.dry_run, |args: Vec<String>| {
            with_flag(args, "--dry-run")
        })
        .and_if_some(
            || self.kube_context.as_deref(),
            |args: Vec<String>, context: &str| with_value(args, "--kube-context", context),
        )
        .and_if_some(
            || self.kube_config.as_deref(),
            |args: Vec<String>, config: &str| with_value(args, "--kubeconfig", config),
        )
    }
}

fn with_flag(mut args: Vec<String>, flag: &str) -> Vec<String> {
    args.push(flag.to_owned());

    args
}

fn with_value(mut args: Vec<String>, flag: &str, value: impl Display) -> Vec<String> {
    args.push(flag.to_owned());
    args.push(value.to_string());

    args
}

fn check_output(release: &str, output: Output) -> Result<(), ReleaseError> {
    if output.status.success() {
        return Ok(());
    }

    Err(ReleaseError::Failed {
        release: release.to_owned(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
    })
}

#[async_trait]
impl ReleaseManager for HelmReleaseManager {
    async fn uninstall(&self, request: &ReleaseUninstallRequest) -> Result<(), ReleaseError> {
        let args = self.uninstall_args(request);
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ReleaseError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{}", stdout.trim());
        }

        check_output(&request.release_name, output)
    }
}
