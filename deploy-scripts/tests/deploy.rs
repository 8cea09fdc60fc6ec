use std::sync::Mutex;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, B256};
use eyre::Result;
use staking_deploy::{
    address::AddressEncoding,
    artifacts::{parse_artifact, ArtifactProvider},
    client::ChainClient,
    config::{DeployConfig, NetworkConfig},
    deployer::Deployer,
    deployments::DeploymentsFile,
    errors::{ConfigError, DeployError},
    types::{Artifact, ContractDescriptor, DeploymentTx, SubmissionReceipt},
};

/// USDT on TRON mainnet
const USDT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
/// WBTC on TRON mainnet
const WBTC: &str = "TXpw8XeWYeTUd4quDskoUqeQPowRh4jY65";
/// The third token on TRON mainnet
const WETH: &str = "TNUC9Qb1rRpS5CbWLmNMxXBjyFoydXjWFR";

/// The creation bytecode of the test artifact
const BYTECODE: [u8; 5] = [0x60, 0x80, 0x60, 0x40, 0x52];

// -----------
// | Helpers |
// -----------

/// A chain client that records what it is asked to submit
#[derive(Default)]
struct RecordingClient {
    /// The transactions submitted so far
    submitted: Mutex<Vec<DeploymentTx>>,
    /// Whether to reject every submission
    reject: bool,
}

impl RecordingClient {
    fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }

    fn submitted(&self) -> Vec<DeploymentTx> {
        self.submitted.lock().unwrap().clone()
    }
}

impl ChainClient for &RecordingClient {
    async fn submit(&self, tx: DeploymentTx) -> Result<SubmissionReceipt, DeployError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(tx);
        if self.reject {
            return Err(DeployError::Submission("transaction rejected".to_string()));
        }

        // Each deployment lands at a fresh address
        let n = submitted.len() as u8;
        Ok(SubmissionReceipt {
            contract_address: Address::repeat_byte(n),
            tx_hash: B256::repeat_byte(n),
            block_number: Some(n as u64),
        })
    }
}

/// Serves a single artifact taking three addresses
struct StakingArtifact(Artifact);

impl StakingArtifact {
    fn new() -> Self {
        let json = format!(
            r#"{{
                "abi": [{{
                    "type": "constructor",
                    "inputs": [
                        {{ "name": "_usdt", "type": "address" }},
                        {{ "name": "_wbtc", "type": "address" }},
                        {{ "name": "_weth", "type": "address" }}
                    ],
                    "stateMutability": "nonpayable"
                }}],
                "bytecode": "0x{}"
            }}"#,
            BYTECODE.iter().map(|b| format!("{:02x}", b)).collect::<String>()
        );
        Self(parse_artifact("Staking", &json).unwrap())
    }
}

impl ArtifactProvider for StakingArtifact {
    fn resolve(&self, descriptor: &ContractDescriptor) -> Result<Artifact, ConfigError> {
        if descriptor.name == self.0.name {
            Ok(self.0.clone())
        } else {
            Err(ConfigError::UnresolvableDescriptor(descriptor.name.clone()))
        }
    }
}

fn tron_network() -> NetworkConfig {
    NetworkConfig {
        name: "tron-mainnet".to_string(),
        address_encoding: AddressEncoding::Tron,
        ..Default::default()
    }
}

fn staking() -> ContractDescriptor {
    ContractDescriptor::new("Staking")
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn tron(s: &str) -> Address {
    AddressEncoding::Tron.parse(s).unwrap()
}

// ---------
// | Tests |
// ---------

#[tokio::test]
async fn test_deploy_submits_args_in_order() -> Result<()> {
    let client = RecordingClient::default();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);

    let record = deployer.deploy(&staking(), &args(&[USDT, WBTC, WETH])).await?;

    let submitted = client.submitted();
    assert_eq!(submitted.len(), 1);
    let expected = vec![
        DynSolValue::Address(tron(USDT)),
        DynSolValue::Address(tron(WBTC)),
        DynSolValue::Address(tron(WETH)),
    ];
    assert_eq!(submitted[0].constructor_args, expected);

    // The init code is the bytecode followed by the encoded arguments
    let init_code = &submitted[0].init_code;
    assert_eq!(&init_code[..BYTECODE.len()], &BYTECODE);
    let decoded = DynSolType::Tuple(vec![DynSolType::Address; 3])
        .abi_decode_params(&init_code[BYTECODE.len()..])?;
    assert_eq!(decoded, DynSolValue::Tuple(expected));

    assert_eq!(record.contract, "Staking");
    assert_eq!(record.network, "tron-mainnet");
    assert_eq!(record.raw_address, Address::repeat_byte(1));
    assert_eq!(
        record.address,
        AddressEncoding::Tron.encode(&Address::repeat_byte(1))
    );
    assert!(record.address.starts_with('T'));
    assert_eq!(record.constructor_args, args(&[USDT, WBTC, WETH]));

    Ok(())
}

#[tokio::test]
async fn test_deploy_does_not_reorder() -> Result<()> {
    let client = RecordingClient::default();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);

    deployer.deploy(&staking(), &args(&[WETH, USDT, WBTC])).await?;

    assert_eq!(
        client.submitted()[0].constructor_args,
        vec![
            DynSolValue::Address(tron(WETH)),
            DynSolValue::Address(tron(USDT)),
            DynSolValue::Address(tron(WBTC)),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_wrong_arity_is_not_submitted() {
    let client = RecordingClient::default();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);

    for params in [args(&[USDT, WBTC]), args(&[USDT, WBTC, WETH, USDT]), vec![]] {
        let err = deployer.deploy(&staking(), &params).await.unwrap_err();
        match err {
            DeployError::Configuration(ConfigError::ArityMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, params.len());
            }
            e => panic!("unexpected error: {}", e),
        }
    }

    assert!(client.submitted().is_empty());
}

#[tokio::test]
async fn test_malformed_address_is_not_submitted() {
    let client = RecordingClient::default();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);

    // A hex address on a TRON network
    let params = args(&[USDT, "0xa614f803b6fd780986a42c78ec9c7f77e6ded13c", WETH]);
    let err = deployer.deploy(&staking(), &params).await.unwrap_err();

    assert!(err.is_pre_submission());
    assert!(matches!(
        err,
        DeployError::Configuration(ConfigError::MalformedAddress { index: 1, .. })
    ));
    assert!(client.submitted().is_empty());
}

#[tokio::test]
async fn test_unresolvable_descriptor_is_not_submitted() {
    let client = RecordingClient::default();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);

    let err = deployer
        .deploy(&ContractDescriptor::new("Vault"), &args(&[USDT, WBTC, WETH]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::Configuration(ConfigError::UnresolvableDescriptor(_))
    ));
    assert!(client.submitted().is_empty());
}

#[tokio::test]
async fn test_redeploy_creates_new_instance() -> Result<()> {
    let client = RecordingClient::default();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);
    let params = args(&[USDT, WBTC, WETH]);

    let first = deployer.deploy(&staking(), &params).await?;
    let second = deployer.deploy(&staking(), &params).await?;

    assert_ne!(first, second);
    assert_ne!(first.raw_address, second.raw_address);

    let submitted = client.submitted();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0], submitted[1]);
    Ok(())
}

#[tokio::test]
async fn test_rejected_submission() {
    let client = RecordingClient::rejecting();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);

    let res = deployer.deploy(&staking(), &args(&[USDT, WBTC, WETH])).await;

    let err = res.unwrap_err();
    assert!(matches!(err, DeployError::Submission(_)));
    assert!(!err.is_pre_submission());
    assert_eq!(client.submitted().len(), 1);
}

#[tokio::test]
async fn test_configured_deployment_is_recorded() -> Result<()> {
    let config = DeployConfig::from_json(&format!(
        r#"{{
            "networks": {{ "tron-mainnet": {{ "address_encoding": "tron" }} }},
            "contracts": {{ "Staking": {{ "constructor_args": {{ "tron-mainnet": ["{}", "{}", "{}"] }} }} }}
        }}"#,
        USDT, WBTC, WETH
    ))?;
    let target = config.target("tron-mainnet", "Staking", &[])?;

    let client = RecordingClient::default();
    let deployer = Deployer::new(target.network, StakingArtifact::new(), &client);
    let record = deployer
        .deploy(&target.descriptor, &target.constructor_args)
        .await?;

    let path = std::env::temp_dir().join(format!("deployments-{}.json", rand::random::<u64>()));
    let deployments = DeploymentsFile::new(&path);
    deployments.record(&record)?;

    assert_eq!(
        deployments.latest("tron-mainnet", "Staking")?,
        Some(record.address.clone())
    );
    assert_eq!(deployments.records()?, vec![record]);

    std::fs::remove_file(path)?;
    Ok(())
}

/// A deployments file path in the temp dir that does not exist yet
fn deployments_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("deployments-{}.json", rand::random::<u64>()))
}

#[tokio::test]
async fn test_submit_and_record() -> Result<()> {
    let client = RecordingClient::default();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);
    let path = deployments_path();
    let deployments = DeploymentsFile::new(&path);

    let params = args(&[USDT, WBTC, WETH]);
    let first = deployer
        .submit_and_record(deployer.plan(&staking(), &params)?, &deployments)
        .await?;
    let second = deployer
        .submit_and_record(deployer.plan(&staking(), &params)?, &deployments)
        .await?;

    assert_eq!(client.submitted().len(), 2);
    assert_eq!(deployments.records()?, vec![first, second.clone()]);
    assert_eq!(
        deployments.latest("tron-mainnet", "Staking")?,
        Some(second.address)
    );

    std::fs::remove_file(path)?;
    Ok(())
}

#[tokio::test]
async fn test_rejected_submission_is_not_recorded() -> Result<()> {
    let client = RecordingClient::rejecting();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);
    let path = deployments_path();
    let deployments = DeploymentsFile::new(&path);

    let plan = deployer.plan(&staking(), &args(&[USDT, WBTC, WETH]))?;
    let err = deployer
        .submit_and_record(plan, &deployments)
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Submission(_)));
    assert_eq!(client.submitted().len(), 1);
    assert!(!path.exists());
    Ok(())
}

#[tokio::test]
async fn test_unwritable_deployments_file_is_not_submitted() -> Result<()> {
    let client = RecordingClient::default();
    let deployer = Deployer::new(tron_network(), StakingArtifact::new(), &client);
    let path = deployments_path();
    std::fs::write(&path, "[]")?;
    let deployments = DeploymentsFile::new(&path);

    let plan = deployer.plan(&staking(), &args(&[USDT, WBTC, WETH]))?;
    let err = deployer
        .submit_and_record(plan, &deployments)
        .await
        .unwrap_err();

    assert!(err.is_pre_submission());
    assert!(matches!(err, DeployError::ReadDeployments(_)));
    assert!(client.submitted().is_empty());
    assert_eq!(std::fs::read_to_string(&path)?, "[]");

    std::fs::remove_file(path)?;
    Ok(())
}

#[test]
fn test_rpc_url_resolution() -> Result<()> {
    let config = DeployConfig::from_json(
        r#"{
            "networks": {
                "tron-mainnet": { "address_encoding": "tron" },
                "devnet": { "rpc_url": "http://localhost:8545" }
            }
        }"#,
    )?;

    let devnet = config.network("devnet")?;
    assert_eq!(devnet.rpc_url(None)?, "http://localhost:8545");
    assert_eq!(
        devnet.rpc_url(Some("http://node:8545".to_string()))?,
        "http://node:8545"
    );

    let tron = config.network("tron-mainnet")?;
    assert_eq!(
        tron.rpc_url(None).unwrap_err(),
        ConfigError::MissingRpcUrl("tron-mainnet".to_string())
    );
    Ok(())
}
