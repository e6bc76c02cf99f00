//! JSON Web Key (RFC 7517) Kodierung
//!
//! Kanonisches Transport-/Speicherformat fuer alle Schluessel. Die Felder
//! entsprechen dem, was WebCrypto bei `exportKey("jwk", ...)` liefert.

use rsa::BigUint;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::{b64url_decode, b64url_to_uint};
use crate::error::{CryptoError, CryptoResult};
use crate::types::{KeyUsage, SerializedKey};

/// Ein JWK mit den von RSA-OAEP und AES-GCM genutzten Membern.
///
/// Enthaelt ggf. privates Schluesselmaterial und wird beim Drop genullt.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Jwk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,
    pub kty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
}

impl std::fmt::Debug for Jwk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("alg", &self.alg)
            .field("key_ops", &self.key_ops)
            .finish_non_exhaustive()
    }
}

pub(crate) mod sealed {
    use super::Jwk;
    use crate::error::CryptoResult;

    /// Baut den JWK ohne Pruefung der Exportierbarkeit. Ausserhalb des
    /// Crates nicht benennbar, Export laeuft immer ueber `export_jwk`.
    pub trait JwkBuilder {
        fn build_jwk(&self) -> CryptoResult<Jwk>;
    }
}

/// Schluessel-Handles, die sich als JWK exportieren lassen
pub trait JwkExport: sealed::JwkBuilder {
    fn is_extractable(&self) -> bool;

    /// Exportiert als JWK-JSON; schlaegt fehl wenn der Schluessel nicht
    /// exportierbar ist.
    fn export_jwk(&self) -> CryptoResult<SerializedKey> {
        if !self.is_extractable() {
            return Err(CryptoError::Schluessel(
                "Schluessel ist nicht exportierbar".to_string(),
            ));
        }
        self.build_jwk()?.to_json()
    }
}

impl Jwk {
    /// Parst JWK-JSON. Fehlermeldungen nennen nur die Position, nie Inhalte.
    pub fn parse(data: &str) -> CryptoResult<Self> {
        serde_json::from_str(data).map_err(|e| {
            CryptoError::Schluessel(format!(
                "Kein gueltiges JWK-JSON (Zeile {}, Spalte {})",
                e.line(),
                e.column()
            ))
        })
    }

    pub fn to_json(&self) -> CryptoResult<SerializedKey> {
        serde_json::to_string(self)
            .map_err(|e| CryptoError::Schluessel(format!("JWK nicht serialisierbar: {e}")))
    }

    pub fn expect_kty(&self, kty: &str) -> CryptoResult<()> {
        if self.kty != kty {
            return Err(CryptoError::Schluessel(format!(
                "Falscher Schluessel-Typ: erwartet '{kty}', erhalten '{}'",
                self.kty
            )));
        }
        Ok(())
    }

    /// `alg` ist optional; wenn gesetzt, muss es passen.
    pub fn expect_alg(&self, alg: &str) -> CryptoResult<()> {
        match self.alg.as_deref() {
            Some(found) if found != alg => Err(CryptoError::Schluessel(format!(
                "Falscher Algorithmus: erwartet '{alg}', erhalten '{found}'"
            ))),
            _ => Ok(()),
        }
    }

    /// Ermittelt die Verwendungen des Schluessels.
    ///
    /// Ohne `key_ops` gelten alle erlaubten Verwendungen. Mit `key_ops` darf
    /// keine Verwendung ausserhalb von `allowed` stehen und mindestens eine
    /// erlaubte muss enthalten sein.
    pub fn usages_within(&self, allowed: &[KeyUsage]) -> CryptoResult<Vec<KeyUsage>> {
        let Some(ops) = &self.key_ops else {
            return Ok(allowed.to_vec());
        };

        let mut usages = Vec::with_capacity(ops.len());
        for op in ops {
            let usage: KeyUsage = op.parse()?;
            if !allowed.contains(&usage) {
                return Err(CryptoError::Schluessel(format!(
                    "Verwendung '{op}' ist fuer diesen Schluessel nicht erlaubt"
                )));
            }
            if !usages.contains(&usage) {
                usages.push(usage);
            }
        }

        if usages.is_empty() {
            return Err(CryptoError::Schluessel(
                "Schluessel hat keine erlaubte Verwendung".to_string(),
            ));
        }
        Ok(usages)
    }

    /// `ext` fehlt -> exportierbar
    pub fn extractable(&self) -> bool {
        self.ext.unwrap_or(true)
    }

    /// Dekodiert ein Pflicht-Member als Bytes
    pub fn required_bytes(member: &Option<String>, name: &str) -> CryptoResult<Vec<u8>> {
        let value = member
            .as_deref()
            .ok_or_else(|| CryptoError::Schluessel(format!("JWK-Member '{name}' fehlt")))?;
        b64url_decode(value)
            .map_err(|_| CryptoError::Schluessel(format!("JWK-Member '{name}' ist kein Base64url")))
    }

    /// Dekodiert ein Pflicht-Member als vorzeichenlose Ganzzahl
    pub fn required_uint(member: &Option<String>, name: &str) -> CryptoResult<BigUint> {
        let value = member
            .as_deref()
            .ok_or_else(|| CryptoError::Schluessel(format!("JWK-Member '{name}' fehlt")))?;
        b64url_to_uint(value)
            .map_err(|_| CryptoError::Schluessel(format!("JWK-Member '{name}' ist kein Base64url")))
    }
}

pub(crate) fn usage_strings(usages: &[KeyUsage]) -> Vec<String> {
    usages.iter().map(|u| u.as_str().to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
