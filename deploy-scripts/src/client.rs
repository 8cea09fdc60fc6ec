//! The chain client used to submit deployment transactions

use std::{future::Future, str::FromStr};

use alloy::{
    network::{Ethereum, TransactionBuilder},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::{info, warn};

use crate::{
    config::NetworkConfig,
    errors::DeployError,
    types::{DeploymentTx, SubmissionReceipt},
};

/// Signs and broadcasts deployment transactions.
///
/// Implementations submit each transaction exactly once and resolve when it
/// is included or has definitively failed. Retries, if any, are the
/// implementation's concern.
pub trait ChainClient {
    /// Submit a contract creation transaction and wait for its receipt
    fn submit(
        &self,
        tx: DeploymentTx,
    ) -> impl Future<Output = Result<SubmissionReceipt, DeployError>> + Send;
}

/// A [`ChainClient`] signing with a local key and broadcasting over JSON-RPC
#[derive(Clone)]
pub struct RpcChainClient {
    /// The signing provider
    provider: DynProvider<Ethereum>,
    /// The number of confirmations to wait for
    confirmations: u64,
}

impl RpcChainClient {
    /// Wrap an existing provider
    pub fn new(provider: DynProvider<Ethereum>, confirmations: u64) -> Self {
        Self {
            provider,
            confirmations,
        }
    }
}

/// Sets up a signing client for the given network, checking that the RPC
/// endpoint serves the configured chain
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
    network: &NetworkConfig,
) -> Result<RpcChainClient, DeployError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| DeployError::ClientInitialization(e.to_string()))?;
    let url = Url::parse(rpc_url).map_err(|e| DeployError::ClientInitialization(e.to_string()))?;

    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| DeployError::ClientInitialization(e.to_string()))?;

    match network.chain_id {
        Some(expected) if expected != chain_id => {
            return Err(DeployError::ClientInitialization(format!(
                "`{}` expects chain id {}, RPC endpoint serves {}",
                network.name, expected, chain_id
            )));
        }
        Some(_) => {}
        None => warn!(
            "No chain id configured for `{}`, deploying to chain {}",
            network.name, chain_id
        ),
    }

    Ok(RpcChainClient::new(
        DynProvider::new(provider),
        network.confirmations(),
    ))
}

impl ChainClient for RpcChainClient {
    async fn submit(&self, tx: DeploymentTx) -> Result<SubmissionReceipt, DeployError> {
        let request = TransactionRequest::default().with_deploy_code(tx.init_code);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| DeployError::Submission(e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        info!("Sent `{}` deployment in tx {:#x}", tx.contract, tx_hash);

        // Zero confirmations still waits for inclusion
        let receipt = pending
            .with_required_confirmations(self.confirmations.max(1))
            .get_receipt()
            .await
            .map_err(|e| {
                DeployError::Submission(format!("tx {:#x} not confirmed: {}", tx_hash, e))
            })?;

        if !receipt.status() {
            return Err(DeployError::Submission(format!(
                "tx {:#x} reverted",
                tx_hash
            )));
        }

        let contract_address = receipt.contract_address.ok_or_else(|| {
            DeployError::Submission(format!("tx {:#x} created no contract", tx_hash))
        })?;

        Ok(SubmissionReceipt {
            contract_address,
            tx_hash,
            block_number: receipt.block_number,
        })
    }
}
