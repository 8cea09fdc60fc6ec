//! Implementations of the deploy script commands

use alloy_primitives::keccak256;
use tracing::info;

use crate::{
    artifacts::ArtifactDir,
    cli::{DeployArgs, TargetArgs},
    client::setup_client,
    config::DeployConfig,
    deployer::{plan_deployment, Deployer},
    deployments::DeploymentsFile,
    errors::DeployError,
};

pub async fn deploy(
    args: DeployArgs,
    config: &DeployConfig,
    network: &str,
    deployments: &DeploymentsFile,
) -> Result<(), DeployError> {
    let target = config.target(network, &args.target.contract, &args.target.args)?;
    let artifacts = ArtifactDir::new(&args.target.artifacts_dir);

    // Validate everything before touching the network
    let plan = plan_deployment(
        &target.network,
        &artifacts,
        &target.descriptor,
        &target.constructor_args,
    )?;
    let rpc_url = target.network.rpc_url(args.rpc_url)?;
    deployments.check(&target.network.name)?;

    let client = setup_client(&args.priv_key, &rpc_url, &target.network).await?;
    let deployer = Deployer::new(target.network, artifacts, client);
    let record = deployer.submit_and_record(plan, deployments).await?;

    info!("Contract: {}", record.contract);
    info!("Address: {}", record.address);
    info!("Transaction: {:#x}", record.tx_hash);
    Ok(())
}

pub fn plan(args: TargetArgs, config: &DeployConfig, network: &str) -> Result<(), DeployError> {
    let target = config.target(network, &args.contract, &args.args)?;
    let artifacts = ArtifactDir::new(&args.artifacts_dir);

    let plan = plan_deployment(
        &target.network,
        &artifacts,
        &target.descriptor,
        &target.constructor_args,
    )?;

    info!("Contract: {} on {}", plan.contract, plan.network);
    for (i, (raw, typed)) in plan.raw_args.iter().zip(&plan.args).enumerate() {
        info!("\targ {}: {} => {:?}", i, raw, typed);
    }
    info!(
        "Init code: {} bytes, keccak256 {:#x}",
        plan.init_code.len(),
        keccak256(&plan.init_code)
    );

    Ok(())
}

pub fn list_records(network: &str, deployments: &DeploymentsFile) -> Result<(), DeployError> {
    let records = deployments.records()?;
    let records = records.iter().filter(|r| r.network == network);

    for record in records {
        info!(
            "{} at {} (tx {:#x}, block {})",
            record.contract,
            record.address,
            record.tx_hash,
            record
                .block_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    }

    Ok(())
}
