//! The deployment invoker: validate, encode, submit, record

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, Specifier},
    json_abi::Param,
};
use alloy_primitives::Bytes;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    address::AddressEncoding,
    artifacts::ArtifactProvider,
    client::ChainClient,
    config::NetworkConfig,
    deployments::DeploymentsFile,
    errors::{ConfigError, DeployError},
    types::{ContractDescriptor, DeploymentPlan, DeploymentRecord, DeploymentTx},
};

/// Deploys contracts to a single network.
///
/// Each call to [`Deployer::deploy`] submits one transaction and creates one
/// contract instance; calling it twice with the same inputs deploys twice.
pub struct Deployer<A, C> {
    /// The network being deployed to
    network: NetworkConfig,
    /// The source of contract artifacts
    artifacts: A,
    /// The client submitting transactions
    client: C,
}

impl<A: ArtifactProvider, C: ChainClient> Deployer<A, C> {
    /// Create a deployer for the given network
    pub fn new(network: NetworkConfig, artifacts: A, client: C) -> Self {
        Self {
            network,
            artifacts,
            client,
        }
    }

    /// The network being deployed to
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Validate and encode a deployment without submitting it
    pub fn plan(
        &self,
        descriptor: &ContractDescriptor,
        params: &[String],
    ) -> Result<DeploymentPlan, DeployError> {
        plan_deployment(&self.network, &self.artifacts, descriptor, params)
    }

    /// Deploy the contract with the given ordered constructor parameters.
    ///
    /// Configuration errors are returned before anything is sent. Once the
    /// transaction is submitted, the outcome is either a record of the new
    /// contract or a [`DeployError::Submission`].
    pub async fn deploy(
        &self,
        descriptor: &ContractDescriptor,
        params: &[String],
    ) -> Result<DeploymentRecord, DeployError> {
        let plan = self.plan(descriptor, params)?;
        self.submit_plan(plan).await
    }

    /// Submit a previously validated plan
    pub async fn submit_plan(&self, plan: DeploymentPlan) -> Result<DeploymentRecord, DeployError> {
        info!(
            "Deploying `{}` to `{}` with arguments [{}]",
            plan.contract,
            plan.network,
            plan.raw_args.iter().join(", ")
        );
        let receipt = self.client.submit(DeploymentTx::from(&plan)).await?;

        let record = DeploymentRecord {
            contract: plan.contract,
            network: plan.network,
            address: self
                .network
                .address_encoding
                .encode(&receipt.contract_address),
            raw_address: receipt.contract_address,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            constructor_args: plan.raw_args,
        };
        info!("`{}` deployed at {}", record.contract, record.address);

        Ok(record)
    }

    /// Submit a plan and persist the resulting record.
    ///
    /// The deployments file is checked first, so a file that could not take
    /// the record fails the deployment before anything is sent. Submission
    /// failures leave the file untouched.
    pub async fn submit_and_record(
        &self,
        plan: DeploymentPlan,
        deployments: &DeploymentsFile,
    ) -> Result<DeploymentRecord, DeployError> {
        deployments.check(&self.network.name)?;
        if let Some(previous) = deployments.latest(&self.network.name, &plan.contract)? {
            warn!(
                "`{}` is already deployed on `{}` at {}, deploying a new instance",
                plan.contract, self.network.name, previous
            );
        }

        let record = self.submit_plan(plan).await?;
        deployments.record(&record)?;

        Ok(record)
    }
}

/// Resolve the artifact, check the parameters against its constructor and
/// build the init code
pub fn plan_deployment(
    network: &NetworkConfig,
    artifacts: &impl ArtifactProvider,
    descriptor: &ContractDescriptor,
    params: &[String],
) -> Result<DeploymentPlan, DeployError> {
    let artifact = artifacts.resolve(descriptor)?;

    if artifact.constructor_inputs.len() != params.len() {
        return Err(ConfigError::ArityMismatch {
            contract: artifact.name,
            expected: artifact.constructor_inputs.len(),
            actual: params.len(),
        }
        .into());
    }

    let args = type_constructor_args(
        &artifact.constructor_inputs,
        params,
        network.address_encoding,
    )?;

    let encoded_args = DynSolValue::Tuple(args.clone()).abi_encode_params();
    debug!(
        "Encoded {} constructor arguments into {} bytes",
        args.len(),
        encoded_args.len()
    );
    let init_code = Bytes::from([artifact.bytecode.as_ref(), encoded_args.as_slice()].concat());

    Ok(DeploymentPlan {
        contract: artifact.name,
        network: network.name.clone(),
        raw_args: params.to_vec(),
        args,
        init_code,
    })
}

/// Parse each parameter as the type of the constructor input at the same
/// position
fn type_constructor_args(
    inputs: &[Param],
    params: &[String],
    encoding: AddressEncoding,
) -> Result<Vec<DynSolValue>, ConfigError> {
    inputs
        .iter()
        .zip(params)
        .enumerate()
        .map(|(index, (input, value))| {
            let ty: DynSolType = input
                .resolve()
                .map_err(|e| ConfigError::ArtifactParsing(e.to_string()))?;

            type_value(&ty, value, encoding, index)
        })
        .collect()
}

/// Parse a single value as `ty`.
///
/// Addresses are given in the network's own encoding, including those nested
/// in arrays and tuples, e.g. `[T..., T...]` for an `address[]` on TRON.
fn type_value(
    ty: &DynSolType,
    value: &str,
    encoding: AddressEncoding,
    index: usize,
) -> Result<DynSolValue, ConfigError> {
    let type_error = |reason: String| ConfigError::ParameterType {
        index,
        ty: ty.sol_type_name().to_string(),
        value: value.to_string(),
        reason,
    };

    match ty {
        DynSolType::Address => encoding
            .parse(value)
            .map(DynSolValue::Address)
            .map_err(|reason| ConfigError::MalformedAddress {
                index,
                value: value.to_string(),
                reason,
            }),
        DynSolType::Array(inner) if contains_address(inner) => {
            let items = split_literal(value, '[', ']').map_err(type_error)?;
            items
                .into_iter()
                .map(|item| type_value(inner, item, encoding, index))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Array)
        }
        DynSolType::FixedArray(inner, len) if contains_address(inner) => {
            let items = split_literal(value, '[', ']').map_err(type_error)?;
            if items.len() != *len {
                return Err(type_error(format!(
                    "expected {} elements, got {}",
                    len,
                    items.len()
                )));
            }
            items
                .into_iter()
                .map(|item| type_value(inner, item, encoding, index))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::FixedArray)
        }
        DynSolType::Tuple(types) if types.iter().any(contains_address) => {
            let items = split_literal(value, '(', ')').map_err(type_error)?;
            if items.len() != types.len() {
                return Err(type_error(format!(
                    "expected {} components, got {}",
                    types.len(),
                    items.len()
                )));
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| type_value(ty, item, encoding, index))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        ty => ty.coerce_str(value).map_err(|e| type_error(e.to_string())),
    }
}

/// Whether an address appears anywhere in the type
fn contains_address(ty: &DynSolType) -> bool {
    match ty {
        DynSolType::Address => true,
        DynSolType::Array(inner) | DynSolType::FixedArray(inner, _) => contains_address(inner),
        DynSolType::Tuple(types) => types.iter().any(contains_address),
        _ => false,
    }
}

/// Split a bracketed literal such as `[a, [b, c], "d,e"]` into its top-level
/// elements
fn split_literal(value: &str, open: char, close: char) -> Result<Vec<&str>, String> {
    let inner = value
        .trim()
        .strip_prefix(open)
        .and_then(|s| s.strip_suffix(close))
        .ok_or_else(|| format!("expected a literal enclosed in `{}{}`", open, close))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '[' | '(' if !in_string => depth += 1,
            ']' | ')' if !in_string => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced `{}`", c))?;
            }
            ',' if !in_string && depth == 0 => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || in_string {
        return Err("unterminated literal".to_string());
    }
    items.push(inner[start..].trim());

    Ok(items)
}
