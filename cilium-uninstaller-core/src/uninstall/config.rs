use std::{path::PathBuf, time::Duration};

use derive_builder::Builder;

pub const DEFAULT_NAMESPACE: &str = "kube-system";
pub const DEFAULT_TEST_NAMESPACE: &str = "cilium-test";
pub const DEFAULT_RELEASE_NAME: &str = "cilium";
pub const DEFAULT_HELM_VALUES_SECRET_NAME: &str = "cilium-cli-helm-values";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_WORKER_COUNT: usize = 1;

/// Parameters of a single uninstall run.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct UninstallConfig {
    /// namespace the release was installed into
    #[builder(default = "DEFAULT_NAMESPACE.to_owned()")]
    pub namespace: String,
    /// namespace holding the connectivity test workloads
    #[builder(default = "DEFAULT_TEST_NAMESPACE.to_owned()")]
    pub test_namespace: String,
    #[builder(default)]
    pub wait: bool,
    #[builder(default = "DEFAULT_TIMEOUT")]
    pub timeout: Duration,
    #[builder(default = "DEFAULT_RELEASE_NAME.to_owned()")]
    pub release_name: String,
    #[builder(default = "DEFAULT_HELM_VALUES_SECRET_NAME.to_owned()")]
    pub helm_values_secret_name: String,
    #[builder(default)]
    pub helm_chart_directory: Option<PathBuf>,
    #[builder(default)]
    pub redact_helm_cert_keys: bool,
    /// upper bound of concurrent node patches
    #[builder(default = "DEFAULT_WORKER_COUNT")]
    pub worker_count: usize,
    #[builder(default)]
    pub dry_run: bool,
    #[builder(default = "DEFAULT_POLL_INTERVAL")]
    pub poll_interval: Duration,
}

impl Default for UninstallConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            test_namespace: DEFAULT_TEST_NAMESPACE.to_owned(),
            wait: false,
            timeout: DEFAULT_TIMEOUT,
            release_name: DEFAULT_RELEASE_NAME.to_owned(),
            helm_values_secret_name: DEFAULT_HELM_VALUES_SECRET_NAME.to_owned(),
            helm_chart_directory: None,
            redact_helm_cert_keys: false,
            worker_count: DEFAULT_WORKER_COUNT,
            dry_run: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl UninstallConfig {
    pub fn worker_count(&self) -> usize {
        self.worker_count.max(1)
    }
}
