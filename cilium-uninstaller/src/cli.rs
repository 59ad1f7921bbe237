use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cilium_uninstaller_core::{
    release::DEFAULT_HELM_BINARY,
    uninstall::config::{
        DEFAULT_HELM_VALUES_SECRET_NAME, DEFAULT_NAMESPACE, DEFAULT_RELEASE_NAME,
        DEFAULT_TEST_NAMESPACE, DEFAULT_WORKER_COUNT,
    },
};

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// kubernetes namespace cilium was installed into
    #[arg(short = 'n', long, global = true, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
    /// override default kubeconfig
    #[arg(long, global = true)]
    pub kube_config: Option<String>,
    /// override default kubeconfig context
    #[arg(long, global = true)]
    pub kube_context: Option<String>,
    /// enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose_logging: bool,
    /// enable trace output (more detailed than verbose, overrides it if present)
    #[arg(long = "trace", global = true)]
    pub trace_logging: bool,
}

impl GlobalArgs {
    pub fn get_log_level(&self) -> LogLevel {
        if self.trace_logging {
            return LogLevel::Trace;
        }

        if self.verbose_logging {
            return LogLevel::Verbose;
        }

        LogLevel::Normal
    }
}

pub enum LogLevel {
    Normal,
    Verbose,
    Trace,
}

#[derive(Debug, Subcommand)]
#[command(arg_required_else_help = true)]
pub enum Commands {
    /// uninstall cilium from the cluster
    #[command(alias = "u")]
    Uninstall(UninstallArgs),
}

#[derive(Debug, Args)]
pub struct UninstallArgs {
    /// namespace used by the connectivity tests
    #[arg(long, default_value = DEFAULT_TEST_NAMESPACE)]
    pub test_namespace: String,
    /// wait for the uninstallation to finish
    #[arg(long)]
    pub wait: bool,
    /// how long to wait for the release and the test namespace to go away (in seconds)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
    /// name of the helm release to uninstall
    #[arg(long, default_value = DEFAULT_RELEASE_NAME)]
    pub release_name: String,
    /// secret holding the helm values used during the install
    #[arg(long, default_value = DEFAULT_HELM_VALUES_SECRET_NAME)]
    pub helm_values_secret_name: String,
    /// local chart directory used during the install
    #[arg(long)]
    pub chart_directory: Option<PathBuf>,
    /// redact certificate keys from the stored helm values
    #[arg(long)]
    pub redact_helm_cert_keys: bool,
    /// how many nodes are patched at the same time
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    pub worker_count: usize,
    /// if set, no action will be taken on the cluster
    #[arg(long)]
    pub dry_run: bool,
    /// helm binary used to remove the release
    #[arg(long, default_value = DEFAULT_HELM_BINARY)]
    pub helm_binary: PathBuf,
}
