//! Gemeinsame Typen fuer das Kryptografie-Subsystem

use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// JWK-kodierter Schluessel als UTF-8 JSON-String
pub type SerializedKey = String;

/// RSA-Modulus in Bit (fest)
pub const RSA_MODULUS_BITS: usize = 2048;
/// AES-256 Schluessel-Laenge in Bytes
pub const AES_KEY_LEN: usize = 32;
/// AES-GCM Nonce-Laenge in Bytes
pub const NONCE_LEN: usize = 12;
/// Laenge des angehaengten Auth-Tags in Bytes
pub const AUTH_TAG_LEN: usize = 16;

/// Erlaubte Verwendung eines Schluessels (WebCrypto `key_ops`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    WrapKey,
    UnwrapKey,
}

impl KeyUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::WrapKey => "wrapKey",
            Self::UnwrapKey => "unwrapKey",
        }
    }
}

impl std::str::FromStr for KeyUsage {
    type Err = CryptoError;

    fn from_str(s: &str) -> CryptoResult<Self> {
        match s {
            "encrypt" => Ok(Self::Encrypt),
            "decrypt" => Ok(Self::Decrypt),
            "wrapKey" => Ok(Self::WrapKey),
            "unwrapKey" => Ok(Self::UnwrapKey),
            other => Err(CryptoError::Schluessel(format!(
                "Unbekannte Schluessel-Verwendung '{other}'"
            ))),
        }
    }
}

/// Sicherer Schluessel-Container (wird beim Drop genullt)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED] {} bytes)", self.0.len())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Oeffentlicher RSA-OAEP-Schluessel (nur encrypt/wrapKey)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) inner: RsaPublicKey,
    pub(crate) extractable: bool,
    pub(crate) usages: Vec<KeyUsage>,
}

impl PublicKey {
    pub(crate) fn new(inner: RsaPublicKey, extractable: bool, usages: Vec<KeyUsage>) -> Self {
        Self {
            inner,
            extractable,
            usages,
        }
    }

    pub fn is_extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    pub fn allows(&self, usage: KeyUsage) -> bool {
        self.usages.contains(&usage)
    }

    /// Laenge des Modulus in Bit
    pub fn modulus_bits(&self) -> usize {
        self.inner.size() * 8
    }
}

/// Privater RSA-OAEP-Schluessel (nur decrypt/unwrapKey)
#[derive(Clone)]
pub struct PrivateKey {
    pub(crate) inner: RsaPrivateKey,
    pub(crate) extractable: bool,
    pub(crate) usages: Vec<KeyUsage>,
}

impl PrivateKey {
    pub(crate) fn new(inner: RsaPrivateKey, extractable: bool, usages: Vec<KeyUsage>) -> Self {
        Self {
            inner,
            extractable,
            usages,
        }
    }

    pub fn is_extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    pub fn allows(&self, usage: KeyUsage) -> bool {
        self.usages.contains(&usage)
    }

    pub fn modulus_bits(&self) -> usize {
        self.inner.size() * 8
    }

    /// Leitet den passenden oeffentlichen Schluessel ab (exportierbar,
    /// encrypt/wrapKey).
    pub fn to_public_key(&self) -> PublicKey {
        PublicKey::new(
            self.inner.to_public_key(),
            true,
            vec![KeyUsage::Encrypt, KeyUsage::WrapKey],
        )
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("modulus_bits", &self.modulus_bits())
            .field("extractable", &self.extractable)
            .field("usages", &self.usages)
            .finish_non_exhaustive()
    }
}

/// Langlebiges Schluessel-Paar einer Identitaet
#[derive(Debug, Clone)]
pub struct AsymmetricKeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

/// Ephemerer AES-256-GCM-Schluessel, existiert nur innerhalb eines
/// einzelnen encrypt/decrypt-Aufrufs.
#[derive(Debug, Clone)]
pub struct SymmetricKey {
    pub(crate) bytes: SecretBytes,
    pub(crate) extractable: bool,
    pub(crate) usages: Vec<KeyUsage>,
}

impl SymmetricKey {
    pub(crate) fn new(bytes: SecretBytes, extractable: bool, usages: Vec<KeyUsage>) -> Self {
        Self {
            bytes,
            extractable,
            usages,
        }
    }

    pub fn is_extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    pub fn allows(&self, usage: KeyUsage) -> bool {
        self.usages.contains(&usage)
    }
}

/// Selbsttragender Umschlag: alle drei Felder Standard-Base64.
///
/// ```text
/// { "encryptedContent": "...", "encryptedKey": "...", "iv": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Envelope {
    /// AES-GCM Ciphertext inkl. 16 Bytes Auth-Tag (angehaengt)
    pub encrypted_content: String,
    /// RSA-OAEP-verschluesselter JWK des Einmal-Schluessels
    pub encrypted_key: String,
    /// 12 Bytes Nonce
    pub iv: String,
}

impl Envelope {
    /// Serialisiert in das JSON-Wire-Format
    pub fn to_json(&self) -> CryptoResult<String> {
        serde_json::to_string(self)
            .map_err(|e| CryptoError::Dekodierung(format!("Umschlag nicht serialisierbar: {e}")))
    }

    /// Liest einen Umschlag aus dem JSON-Wire-Format
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            CryptoError::Dekodierung(format!(
                "Ungueltiges Umschlag-JSON (Zeile {}, Spalte {})",
                e.line(),
                e.column()
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
