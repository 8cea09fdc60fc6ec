//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::{dyn_abi::DynSolValue, json_abi::Param};
use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// Identifies the compiled artifact of the contract to deploy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractDescriptor {
    /// The artifact name, e.g. `Staking` for `Staking.json`
    pub name: String,
}

impl ContractDescriptor {
    /// Create a descriptor for the named artifact
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Display for ContractDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A compiled contract, as resolved from a [`ContractDescriptor`]
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The contract name
    pub name: String,
    /// The creation bytecode
    pub bytecode: Bytes,
    /// The inputs of the contract's constructor, in declaration order
    pub constructor_inputs: Vec<Param>,
}

/// A validated deployment, ready to be submitted
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    /// The contract name
    pub contract: String,
    /// The network name
    pub network: String,
    /// The constructor arguments as supplied
    pub raw_args: Vec<String>,
    /// The constructor arguments, typed against the constructor ABI
    pub args: Vec<DynSolValue>,
    /// The creation bytecode followed by the ABI-encoded arguments
    pub init_code: Bytes,
}

/// The transaction handed to the chain client
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentTx {
    /// The contract name, for logging
    pub contract: String,
    /// The typed constructor arguments, in order
    pub constructor_args: Vec<DynSolValue>,
    /// The creation bytecode followed by the ABI-encoded arguments
    pub init_code: Bytes,
}

impl From<&DeploymentPlan> for DeploymentTx {
    fn from(plan: &DeploymentPlan) -> Self {
        Self {
            contract: plan.contract.clone(),
            constructor_args: plan.args.clone(),
            init_code: plan.init_code.clone(),
        }
    }
}

/// What the chain client reports back for an included deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// The address of the created contract
    pub contract_address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: B256,
    /// The block the transaction was included in, if reported
    pub block_number: Option<u64>,
}

/// The durable result of a successful deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// The contract name
    pub contract: String,
    /// The network the contract was deployed to
    pub network: String,
    /// The contract address, in the network's address encoding
    pub address: String,
    /// The raw contract address
    pub raw_address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: B256,
    /// The block the transaction was included in, if reported
    pub block_number: Option<u64>,
    /// The constructor arguments, exactly as supplied
    pub constructor_args: Vec<String>,
}
