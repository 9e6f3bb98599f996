use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const IDENTITY_HEADER: &str = "x-rh-identity";

#[derive(Debug, Deserialize)]
struct IdentityEnvelope {
    identity: Identity,
}

#[derive(Debug, Deserialize)]
struct Identity {
    #[serde(default)]
    account_number: Option<String>,
}

/// Extracts the external tenant (account number) from an encoded identity
/// header value.
pub fn external_tenant(header_value: &str) -> Result<String> {
    let decoded = STANDARD
        .decode(header_value.trim())
        .map_err(|_| Error::Unauthorized)?;

    let envelope: IdentityEnvelope =
        serde_json::from_slice(&decoded).map_err(|_| Error::Unauthorized)?;

    match envelope.identity.account_number {
        Some(account) if !account.trim().is_empty() => Ok(account),
        _ => Err(Error::Unauthorized),
    }
}

/// Encodes an identity header for an account. Used by clients and tests.
#[must_use]
pub fn encode_identity(account_number: &str) -> String {
    let body = serde_json::json!({
        "identity": {
            "account_number": account_number,
        }
    });
    STANDARD.encode(body.to_string())
}
