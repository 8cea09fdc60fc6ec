use clap::Parser;
use eyre::Result;
use staking_deploy::{cli::Cli, config::DeployConfig, deployments::DeploymentsFile};

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        config,
        network,
        deployments_path,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let config = DeployConfig::load(&config)?;
    let deployments = DeploymentsFile::new(deployments_path);

    command.run(&config, &network, &deployments).await?;
    Ok(())
}
