//! Constants used in the deploy scripts

/// The number of bytes in an address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The version byte prepended to addresses on TRON networks
pub const TRON_ADDRESS_PREFIX: u8 = 0x41;

/// The number of confirmations to wait for the contract deployment transaction
/// when the network configuration does not specify one
pub const DEFAULT_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The default path of the deployment configuration file
pub const DEFAULT_CONFIG_PATH: &str = "deploy.json";

/// The default path of the file tracking deployed contracts
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default directory holding compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default network to deploy to
pub const DEFAULT_NETWORK: &str = "tron-mainnet";

/// The default contract to deploy
pub const DEFAULT_CONTRACT: &str = "Staking";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The ABI key in a compiled contract artifact
pub const ARTIFACT_ABI_KEY: &str = "abi";

/// The bytecode key in a compiled contract artifact
pub const ARTIFACT_BYTECODE_KEY: &str = "bytecode";

/// The key of the bytecode hex string when the bytecode is an object,
/// as in Foundry artifacts
pub const ARTIFACT_BYTECODE_OBJECT_KEY: &str = "object";

/// The marker of an unlinked library placeholder in bytecode
pub const UNLINKED_LIBRARY_MARKER: &str = "__";

/// The latest-address key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The deployment history key in the `deployments.json` file
pub const RECORDS_KEY: &str = "records";
