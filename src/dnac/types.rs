//! DNA Center API Type Definitions
//!
//! Response bodies for the two endpoints the collector calls.
//!
//! - `POST /dna/system/api/v1/auth/token` → [`AuthResponse`]
//! - `GET /dna/intent/api/v1/interface` → [`InterfaceListResponse`] of [`Interface`]
//!
//! # Design Notes
//!
//! - The controller omits or nulls fields freely depending on device family, so every
//!   [`Interface`] field defaults to an empty string.
//! - Values that are not strings (numbers, lists, mappings) are flattened through
//!   [`normalize_value`](crate::normalize::normalize_value) instead of failing the whole response.
//! - Only the fields the collector indexes are declared; serde ignores the rest.

use crate::error::{CollectorError, Result};
use crate::normalize::to_ascii;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interface type that is indexed; everything else is skipped.
pub const PHYSICAL: &str = "Physical";

/// Body of the token exchange.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "Token", default)]
    pub token: Option<String>,
}

impl AuthResponse {
    /// Extracts the bearer token as ASCII, rejecting a missing one or one that is empty
    /// once normalized.
    pub fn into_token(self) -> Result<String> {
        match self.token.as_deref().map(to_ascii) {
            Some(token) if !token.is_empty() => Ok(token),
            Some(_) => Err(CollectorError::Auth(
                "controller returned an empty Token".to_string(),
            )),
            None => Err(CollectorError::Auth(
                "controller response has no Token field".to_string(),
            )),
        }
    }
}

/// Body of the interface listing.
#[derive(Debug, Deserialize)]
pub struct InterfaceListResponse {
    pub response: Vec<Interface>,
}

/// One element of the interface listing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Interface {
    #[serde(deserialize_with = "lenient_text")]
    pub interface_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub port_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub series: String,
    #[serde(deserialize_with = "lenient_text")]
    pub media_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(deserialize_with = "lenient_text")]
    pub admin_status: String,
    #[serde(deserialize_with = "lenient_text")]
    pub last_updated: String,
    #[serde(deserialize_with = "lenient_text")]
    pub serial_no: String,
    #[serde(deserialize_with = "lenient_text")]
    pub ipv4_address: String,
    #[serde(deserialize_with = "lenient_text")]
    pub pid: String,
    #[serde(deserialize_with = "lenient_text")]
    pub port_mode: String,
}

impl Interface {
    pub fn is_physical(&self) -> bool {
        self.interface_type == PHYSICAL
    }
}

/// Accepts any JSON value. Strings are kept verbatim, `null` becomes empty and
/// everything else is flattened to text.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => crate::normalize::normalize_value(&other),
    })
}
