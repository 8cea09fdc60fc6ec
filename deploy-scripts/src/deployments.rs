//! Tracking of deployed contracts in a `deployments.json` file.
//!
//! The file holds the latest address of each contract per network under
//! `deployments`, and every deployment ever recorded under `records`:
//!
//! ```json
//! {
//!     "deployments": { "tron-mainnet": { "Staking": "T..." } },
//!     "records": [ { "contract": "Staking", "network": "tron-mainnet", ... } ]
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing::info;

use crate::{
    constants::{DEPLOYMENTS_KEY, RECORDS_KEY},
    errors::DeployError,
    types::DeploymentRecord,
};

/// A handle on the deployments file
#[derive(Debug, Clone)]
pub struct DeploymentsFile {
    /// The location of the file
    path: PathBuf,
}

impl DeploymentsFile {
    /// A handle on the file at `path`, which need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The location of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the record to the history and make it the latest deployment of
    /// its contract on its network
    pub fn record(&self, record: &DeploymentRecord) -> Result<(), DeployError> {
        self.try_record(record)
            .map_err(|reason| DeployError::Recording {
                record: Box::new(record.clone()),
                reason,
            })?;

        info!(
            "Recorded `{}` deployment in {}",
            record.contract,
            self.path.display()
        );
        Ok(())
    }

    /// Check that a deployment to `network` could be recorded in the file.
    ///
    /// A missing file passes. A file that exists but could not take the record
    /// is a [`DeployError::ReadDeployments`].
    pub fn check(&self, network: &str) -> Result<(), DeployError> {
        let json = self.read_json().map_err(DeployError::ReadDeployments)?;
        check_shape(&json, network).map_err(|e| {
            DeployError::ReadDeployments(format!("{}: {}", self.path.display(), e))
        })
    }

    /// The latest recorded address of `contract` on `network`
    pub fn latest(&self, network: &str, contract: &str) -> Result<Option<String>, DeployError> {
        let json = self.read_json().map_err(DeployError::ReadDeployments)?;

        Ok(json
            .get(DEPLOYMENTS_KEY)
            .and_then(|deployments| deployments.get(network))
            .and_then(|contracts| contracts.get(contract))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Every recorded deployment, oldest first
    pub fn records(&self) -> Result<Vec<DeploymentRecord>, DeployError> {
        let json = self.read_json().map_err(DeployError::ReadDeployments)?;

        match json.get(RECORDS_KEY) {
            Some(records) => serde_json::from_value(records.clone())
                .map_err(|e| DeployError::ReadDeployments(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    /// Read, update and rewrite the file
    fn try_record(&self, record: &DeploymentRecord) -> Result<(), String> {
        let mut json = self.read_json()?;
        insert_record(&mut json, record)?;

        let contents = serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?;

        // Write to a sibling file first so a failed write leaves the old file intact
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(|e| e.to_string())?;
        fs::rename(&tmp_path, &self.path).map_err(|e| e.to_string())
    }

    /// Read the file, treating a missing file as empty
    fn read_json(&self) -> Result<Value, String> {
        if !self.path.exists() {
            return Ok(Value::Object(Map::new()));
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| format!("{}: {}", self.path.display(), e))?;
        serde_json::from_str(&contents).map_err(|e| format!("{}: {}", self.path.display(), e))
    }
}

/// Check that the parsed file has the layout `insert_record` expects for
/// `network`
fn check_shape(json: &Value, network: &str) -> Result<(), String> {
    let root = json
        .as_object()
        .ok_or_else(|| "deployments file is not a JSON object".to_string())?;

    if let Some(deployments) = root.get(DEPLOYMENTS_KEY) {
        let networks = deployments
            .as_object()
            .ok_or_else(|| format!("`{}` is not an object", DEPLOYMENTS_KEY))?;
        if networks.get(network).is_some_and(|n| !n.is_object()) {
            return Err(format!("`{}.{}` is not an object", DEPLOYMENTS_KEY, network));
        }
    }
    if root.get(RECORDS_KEY).is_some_and(|r| !r.is_array()) {
        return Err(format!("`{}` is not an array", RECORDS_KEY));
    }

    Ok(())
}

/// Insert the record into the parsed deployments file
fn insert_record(json: &mut Value, record: &DeploymentRecord) -> Result<(), String> {
    let root = json
        .as_object_mut()
        .ok_or_else(|| "deployments file is not a JSON object".to_string())?;

    let network_deployments = root
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| format!("`{}` is not an object", DEPLOYMENTS_KEY))?
        .entry(record.network.clone())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| format!("`{}.{}` is not an object", DEPLOYMENTS_KEY, record.network))?;
    network_deployments.insert(
        record.contract.clone(),
        Value::String(record.address.clone()),
    );

    let history = root
        .entry(RECORDS_KEY)
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| format!("`{}` is not an array", RECORDS_KEY))?;
    history.push(serde_json::to_value(record).map_err(|e| e.to_string())?);

    Ok(())
}
