//! Definitions of errors that can occur during deployment of the contracts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::types::DeploymentRecord;

/// Errors in the deployment configuration.
///
/// All of these are detected before any network interaction takes place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Error reading or parsing the configuration file
    ReadConfig(String),
    /// The requested network is not present in the configuration
    UnknownNetwork(String),
    /// The requested contract is not present in the configuration
    UnknownContract(String),
    /// No RPC URL was configured or given for the network
    MissingRpcUrl(String),
    /// The configuration has no constructor arguments for the contract on
    /// the given network
    MissingArguments {
        /// The contract name
        contract: String,
        /// The network name
        network: String,
    },
    /// The descriptor could not be resolved to an artifact
    UnresolvableDescriptor(String),
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// The number of constructor arguments does not match the constructor
    ArityMismatch {
        /// The contract name
        contract: String,
        /// The number of inputs declared by the constructor
        expected: usize,
        /// The number of arguments supplied
        actual: usize,
    },
    /// An argument could not be parsed as the constructor input type
    ParameterType {
        /// Position of the argument
        index: usize,
        /// The Solidity type of the constructor input
        ty: String,
        /// The supplied value
        value: String,
        /// The underlying parse error
        reason: String,
    },
    /// An address argument is not valid in the network's address encoding
    MalformedAddress {
        /// Position of the argument
        index: usize,
        /// The supplied value
        value: String,
        /// The underlying parse error
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadConfig(s) => write!(f, "error reading config: {}", s),
            ConfigError::UnknownNetwork(s) => write!(f, "unknown network: {}", s),
            ConfigError::UnknownContract(s) => write!(f, "unknown contract: {}", s),
            ConfigError::MissingRpcUrl(s) => write!(f, "no RPC URL for network: {}", s),
            ConfigError::MissingArguments { contract, network } => write!(
                f,
                "no constructor arguments for `{}` on network `{}`",
                contract, network
            ),
            ConfigError::UnresolvableDescriptor(s) => {
                write!(f, "could not resolve artifact: {}", s)
            }
            ConfigError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ConfigError::ArityMismatch {
                contract,
                expected,
                actual,
            } => write!(
                f,
                "`{}` constructor takes {} arguments, {} supplied",
                contract, expected, actual
            ),
            ConfigError::ParameterType {
                index,
                ty,
                value,
                reason,
            } => write!(
                f,
                "argument {} (`{}`) is not a valid `{}`: {}",
                index, value, ty, reason
            ),
            ConfigError::MalformedAddress {
                index,
                value,
                reason,
            } => write!(
                f,
                "argument {} (`{}`) is not a valid address: {}",
                index, value, reason
            ),
        }
    }
}

impl Error for ConfigError {}

/// Errors that can occur while deploying a contract
#[derive(Debug)]
pub enum DeployError {
    /// The deployment is misconfigured, nothing was submitted
    Configuration(ConfigError),
    /// Error initializing the RPC client, nothing was submitted
    ClientInitialization(String),
    /// The chain rejected or failed to confirm the deployment transaction
    Submission(String),
    /// Error reading the `deployments.json` file, nothing was submitted
    ReadDeployments(String),
    /// The contract was deployed but the record could not be persisted
    Recording {
        /// The record of the successful deployment
        record: Box<DeploymentRecord>,
        /// The underlying error
        reason: String,
    },
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::Configuration(e) => write!(f, "configuration error: {}", e),
            DeployError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            DeployError::Submission(s) => write!(f, "error submitting deployment: {}", s),
            DeployError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            DeployError::Recording { record, reason } => write!(
                f,
                "`{}` WAS deployed at {} (tx {:#x}) but the record could not be written: {}",
                record.contract, record.address, record.tx_hash, reason
            ),
        }
    }
}

impl Error for DeployError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DeployError::Configuration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for DeployError {
    fn from(e: ConfigError) -> Self {
        DeployError::Configuration(e)
    }
}

impl DeployError {
    /// Whether the error was raised before anything was sent to the chain
    pub fn is_pre_submission(&self) -> bool {
        matches!(
            self,
            DeployError::Configuration(_)
                | DeployError::ClientInitialization(_)
                | DeployError::ReadDeployments(_)
        )
    }
}
