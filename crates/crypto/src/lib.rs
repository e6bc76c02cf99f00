//! # kuvert-crypto
//!
//! Hybride Umschlag-Verschluesselung fuer Kuvert.
//!
//! Nachrichten zwischen zwei Parteien mit langlebigen RSA-Schluessel-Paaren
//! werden mit einem Einmal-Schluessel (AES-256-GCM) verschluesselt; nur dieser
//! Schluessel wird mit RSA-OAEP(SHA-256) fuer den Empfaenger eingewickelt.
//!
//! ## Module
//! - `keys` - RSA-OAEP Schluessel-Paare und ephemere AES-Schluessel
//! - `envelope` - Umschlag erstellen und oeffnen
//! - `jwk` - JSON Web Key Kodierung
//! - `types` - Gemeinsame Typen (Envelope, Schluessel-Handles, SecretBytes)
//! - `error` - Fehlertypen

mod encoding;
pub mod envelope;
pub mod error;
pub mod jwk;
pub mod keys;
pub mod types;

// Bequeme Re-Exports
pub use envelope::{EnvelopeDecryptor, EnvelopeEncryptor};
pub use error::{CryptoError, CryptoResult};
pub use jwk::{Jwk, JwkExport};
pub use keys::{AsymmetricKey, KeyPairManager, SymmetricKeyManager, AES_GCM_ALG, RSA_OAEP_ALG};
pub use types::{
    AsymmetricKeyPair, Envelope, KeyUsage, PrivateKey, PublicKey, SecretBytes, SerializedKey,
    SymmetricKey,
};

/// Verschluesselt `plaintext` fuer den Empfaenger (siehe [`EnvelopeEncryptor::encrypt`])
pub fn encrypt(plaintext: &str, recipient_public_key: &PublicKey) -> CryptoResult<Envelope> {
    EnvelopeEncryptor::encrypt(plaintext, recipient_public_key)
}

/// Oeffnet einen Umschlag (siehe [`EnvelopeDecryptor::decrypt`])
pub fn decrypt(envelope: &Envelope, recipient_private_key: &PrivateKey) -> CryptoResult<String> {
    EnvelopeDecryptor::decrypt(envelope, recipient_private_key)
}
