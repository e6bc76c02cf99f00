//! Schluessel-Verwaltung
//!
//! - `key_pair` - RSA-OAEP Langzeit-Schluessel-Paare
//! - `symmetric` - ephemere AES-256-GCM Schluessel pro Nachricht

pub mod key_pair;
pub mod symmetric;

pub use key_pair::{AsymmetricKey, KeyPairManager, RSA_OAEP_ALG};
pub use symmetric::{SymmetricKeyManager, AES_GCM_ALG};
