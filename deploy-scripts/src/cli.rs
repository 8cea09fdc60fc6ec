//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, list_records, plan},
    config::DeployConfig,
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIG_PATH, DEFAULT_CONTRACT, DEFAULT_DEPLOYMENTS_PATH,
        DEFAULT_NETWORK,
    },
    deployments::DeploymentsFile,
    errors::DeployError,
};

/// Deploy a contract with the constructor arguments configured for a network
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the deployment configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// The network to deploy to, as named in the configuration file
    #[arg(short, long, env = "DEPLOY_NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Path to the file tracking deployed contracts
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract, recording its address
    Deploy(DeployArgs),
    /// Validate a deployment and print its encoded arguments without sending it
    Plan(TargetArgs),
    /// List the deployments recorded for the network
    Records,
}

impl Command {
    pub async fn run(
        self,
        config: &DeployConfig,
        network: &str,
        deployments: &DeploymentsFile,
    ) -> Result<(), DeployError> {
        match self {
            Command::Deploy(args) => deploy(args, config, network, deployments).await,
            Command::Plan(args) => plan(args, config, network),
            Command::Records => list_records(network, deployments),
        }
    }
}

/// Selects the contract and its constructor arguments
#[derive(Args)]
pub struct TargetArgs {
    /// The contract to deploy, as named in the configuration file
    #[arg(long, default_value = DEFAULT_CONTRACT)]
    pub contract: String,

    /// Constructor arguments, in order, replacing the configured ones.
    /// May be repeated. Without any, the configured arguments are used, so a
    /// configured contract cannot be overridden down to zero arguments.
    #[arg(short, long = "arg")]
    pub args: Vec<String>,

    /// Directory holding the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,
}

/// Deploy a contract
#[derive(Args)]
pub struct DeployArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Private key of the deployer
    // TODO: Support hardware wallets / keystores instead of a raw key
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL, overrides the one in the configuration file
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,
}
