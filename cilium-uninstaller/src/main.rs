use anyhow::{anyhow, Context};
use clap::Parser;
use cli::{Commands, GlobalArgs, LogLevel};
use commands::uninstall::uninstall;
use cilium_uninstaller_core::kubernetes::operations::create_local_client;
use env_logger::Target;
use log::LevelFilter;

use crate::cli::Cli;

mod cli;
mod commands;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    configure_logging(&cli.global_args);

    let client = create_local_client(&cli.global_args.kube_config, &cli.global_args.kube_context)
        .await
        .context("Couldn't initialize k8s API client!")?;

    if let Some(command) = cli.command {
        let run = async {
            match command {
                Commands::Uninstall(args) => uninstall(cli.global_args, args, client).await,
            }
        };

        tokio::select! {
            result = run => result?,
            _ = tokio::signal::ctrl_c() => return Err(anyhow!("Interrupted!")),
        }
    }

    Ok(())
}

fn configure_logging(global_args: &GlobalArgs) {
    let log_level = global_args.get_log_level();
    let mut logger = env_logger::builder();

    logger
        .format_timestamp(None)
        .format_module_path(matches!(log_level, LogLevel::Trace))
        .format_target(false)
        .format_level(false)
        .target(Target::Stderr);

    if let LogLevel::Normal = log_level {
        logger.filter(Some("cilium_uninstaller"), LevelFilter::Info);
    }

    if let LogLevel::Verbose = log_level {
        logger.filter(Some("cilium_uninstaller"), LevelFilter::Debug);
    }

    if let LogLevel::Trace = log_level {
        logger.filter(None, LevelFilter::Debug);
    }

    logger.init();
}
