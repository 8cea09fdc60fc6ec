//! Parsing and rendering of addresses in the encodings used by the supported
//! networks

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::{NUM_BYTES_ADDRESS, TRON_ADDRESS_PREFIX};

/// The textual encoding a network uses for account and contract addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressEncoding {
    /// `0x`-prefixed hex, EIP-55 checksummed when mixed case
    #[default]
    Hex,
    /// Base58check over the `0x41`-prefixed address
    Tron,
}

impl Display for AddressEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressEncoding::Hex => write!(f, "hex"),
            AddressEncoding::Tron => write!(f, "tron"),
        }
    }
}

impl AddressEncoding {
    /// Parse an address given in this encoding, validating its checksum
    pub fn parse(&self, s: &str) -> Result<Address, String> {
        match self {
            AddressEncoding::Hex => parse_hex_address(s),
            AddressEncoding::Tron => parse_tron_address(s),
        }
    }

    /// Render an address in this encoding
    pub fn encode(&self, address: &Address) -> String {
        match self {
            AddressEncoding::Hex => address.to_checksum(None /* chain_id */),
            AddressEncoding::Tron => {
                let mut payload = Vec::with_capacity(NUM_BYTES_ADDRESS + 1);
                payload.push(TRON_ADDRESS_PREFIX);
                payload.extend_from_slice(address.as_slice());
                bs58::encode(payload).with_check().into_string()
            }
        }
    }
}

/// Parse a hex address, enforcing the EIP-55 checksum on mixed-case input
fn parse_hex_address(s: &str) -> Result<Address, String> {
    let body = s
        .strip_prefix("0x")
        .ok_or_else(|| "missing `0x` prefix".to_string())?;
    if body.len() != NUM_BYTES_ADDRESS * 2 {
        return Err(format!(
            "expected {} hex digits, got {}",
            NUM_BYTES_ADDRESS * 2,
            body.len()
        ));
    }
    let address = Address::from_str(body).map_err(|e| e.to_string())?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None /* chain_id */) != s {
        return Err("invalid EIP-55 checksum".to_string());
    }

    Ok(address)
}

/// Parse a base58check TRON address
fn parse_tron_address(s: &str) -> Result<Address, String> {
    let payload = bs58::decode(s)
        .with_check(None /* expected_ver */)
        .into_vec()
        .map_err(|e| e.to_string())?;

    if payload.len() != NUM_BYTES_ADDRESS + 1 {
        return Err(format!(
            "expected {} bytes, decoded {}",
            NUM_BYTES_ADDRESS + 1,
            payload.len()
        ));
    }
    if payload[0] != TRON_ADDRESS_PREFIX {
        return Err(format!("unexpected version byte {:#04x}", payload[0]));
    }

    Ok(Address::from_slice(&payload[1..]))
}
