//! The deployment configuration, keyed by deployment target

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    address::AddressEncoding, constants::DEFAULT_DEPLOY_CONFIRMATIONS, errors::ConfigError,
    types::ContractDescriptor,
};

/// The contents of the deployment configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    /// The networks that can be deployed to, by name
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
    /// The contracts that can be deployed, by name
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractConfig>,
}

/// Settings for a single network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// The network name, filled in from the configuration key
    #[serde(skip)]
    pub name: String,
    /// The JSON-RPC endpoint of the network
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// The chain id the RPC endpoint is expected to report
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// The encoding of addresses on this network
    #[serde(default)]
    pub address_encoding: AddressEncoding,
    /// The number of confirmations to wait for
    #[serde(default)]
    pub confirmations: Option<u64>,
}

impl NetworkConfig {
    /// The number of confirmations to wait for, falling back to the default
    pub fn confirmations(&self) -> u64 {
        self.confirmations.unwrap_or(DEFAULT_DEPLOY_CONFIRMATIONS)
    }

    /// The RPC URL to connect to: `rpc_override` if given, else the
    /// configured one
    pub fn rpc_url(&self, rpc_override: Option<String>) -> Result<String, ConfigError> {
        rpc_override
            .or_else(|| self.rpc_url.clone())
            .ok_or_else(|| ConfigError::MissingRpcUrl(self.name.clone()))
    }
}

/// Settings for a single contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// The artifact name, defaults to the contract name
    #[serde(default)]
    pub artifact: Option<String>,
    /// The ordered constructor arguments, by network
    #[serde(default)]
    pub constructor_args: BTreeMap<String, Vec<String>>,
}

/// Everything needed to deploy one contract to one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    /// The network to deploy to
    pub network: NetworkConfig,
    /// The artifact to deploy
    pub descriptor: ContractDescriptor,
    /// The ordered constructor arguments
    pub constructor_args: Vec<String>,
}

impl DeployConfig {
    /// Read the configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadConfig(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Parse the configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::ReadConfig(e.to_string()))
    }

    /// Look up a network by name
    pub fn network(&self, name: &str) -> Result<NetworkConfig, ConfigError> {
        let mut network = self
            .networks
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))?;
        network.name = name.to_string();

        Ok(network)
    }

    /// Resolve the deployment of `contract` to `network`.
    ///
    /// If `arg_overrides` is non-empty it replaces the configured constructor
    /// arguments entirely.
    pub fn target(
        &self,
        network: &str,
        contract: &str,
        arg_overrides: &[String],
    ) -> Result<DeploymentTarget, ConfigError> {
        let network = self.network(network)?;
        let contract_config = self
            .contracts
            .get(contract)
            .ok_or_else(|| ConfigError::UnknownContract(contract.to_string()))?;

        let constructor_args = if arg_overrides.is_empty() {
            contract_config
                .constructor_args
                .get(&network.name)
                .cloned()
                .ok_or_else(|| ConfigError::MissingArguments {
                    contract: contract.to_string(),
                    network: network.name.clone(),
                })?
        } else {
            arg_overrides.to_vec()
        };

        let artifact = contract_config.artifact.as_deref().unwrap_or(contract);

        Ok(DeploymentTarget {
            network,
            descriptor: ContractDescriptor::new(artifact),
            constructor_args,
        })
    }
}
