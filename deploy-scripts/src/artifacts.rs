//! Resolution of contract descriptors to compiled artifacts

use std::{fs, path::PathBuf, str::FromStr};

use alloy::json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::{
    constants::{
        ARTIFACT_ABI_KEY, ARTIFACT_BYTECODE_KEY, ARTIFACT_BYTECODE_OBJECT_KEY, ARTIFACT_EXTENSION,
        UNLINKED_LIBRARY_MARKER,
    },
    errors::ConfigError,
    types::{Artifact, ContractDescriptor},
};

/// A source of compiled contract artifacts
pub trait ArtifactProvider {
    /// Resolve the descriptor to its artifact
    fn resolve(&self, descriptor: &ContractDescriptor) -> Result<Artifact, ConfigError>;
}

/// Reads `<name>.json` artifacts, as emitted by Truffle or Foundry, from a
/// directory
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    /// The directory holding the artifacts
    dir: PathBuf,
}

impl ArtifactDir {
    /// Create a provider reading from the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The path at which the descriptor's artifact is expected
    fn artifact_path(&self, descriptor: &ContractDescriptor) -> Result<PathBuf, ConfigError> {
        let name = &descriptor.name;
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ConfigError::UnresolvableDescriptor(format!(
                "invalid artifact name `{}`",
                name
            )));
        }

        Ok(self.dir.join(format!("{}.{}", name, ARTIFACT_EXTENSION)))
    }
}

impl ArtifactProvider for ArtifactDir {
    fn resolve(&self, descriptor: &ContractDescriptor) -> Result<Artifact, ConfigError> {
        let path = self.artifact_path(descriptor)?;
        debug!("Reading artifact from {}", path.display());

        let contents = fs::read_to_string(&path).map_err(|e| {
            ConfigError::UnresolvableDescriptor(format!("{}: {}", path.display(), e))
        })?;

        parse_artifact(&descriptor.name, &contents)
    }
}

/// Parse a JSON compilation artifact
pub fn parse_artifact(name: &str, contents: &str) -> Result<Artifact, ConfigError> {
    let json: Value =
        serde_json::from_str(contents).map_err(|e| ConfigError::ArtifactParsing(e.to_string()))?;

    let abi_json = json
        .get(ARTIFACT_ABI_KEY)
        .cloned()
        .ok_or_else(|| ConfigError::ArtifactParsing(format!("`{}` has no ABI", name)))?;
    let abi: JsonAbi =
        serde_json::from_value(abi_json).map_err(|e| ConfigError::ArtifactParsing(e.to_string()))?;

    // Truffle stores the bytecode as a string, Foundry nests it in an object
    let bytecode_hex = match json.get(ARTIFACT_BYTECODE_KEY) {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Object(obj)) => obj
            .get(ARTIFACT_BYTECODE_OBJECT_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default(),
        _ => "",
    };

    if bytecode_hex.contains(UNLINKED_LIBRARY_MARKER) {
        return Err(ConfigError::ArtifactParsing(format!(
            "`{}` bytecode has unlinked libraries",
            name
        )));
    }

    let bytecode =
        Bytes::from_str(bytecode_hex).map_err(|e| ConfigError::ArtifactParsing(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(ConfigError::ArtifactParsing(format!(
            "`{}` has no creation bytecode, is it abstract?",
            name
        )));
    }

    let constructor_inputs = abi
        .constructor
        .map(|constructor| constructor.inputs)
        .unwrap_or_default();

    Ok(Artifact {
        name: name.to_string(),
        bytecode,
        constructor_inputs,
    })
}
