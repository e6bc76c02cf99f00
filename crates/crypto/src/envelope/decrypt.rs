//! Umschlag oeffnen
//!
//! Klartext wird nur zurueckgegeben, wenn sowohl das RSA-Auswickeln als auch
//! die AES-GCM-Authentifizierung gelingen. Kein Teilergebnis bei Fehlern.

use crate::encoding::b64_decode;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::key_pair::unwrap_key;
use crate::keys::symmetric::open;
use crate::keys::SymmetricKeyManager;
use crate::types::{Envelope, PrivateKey, NONCE_LEN};

/// Oeffnet Umschlaege mit dem privaten Schluessel des Empfaengers
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeDecryptor;

impl EnvelopeDecryptor {
    /// Entschluesselt und dekodiert den Inhalt als UTF-8
    pub fn decrypt(envelope: &Envelope, recipient_private_key: &PrivateKey) -> CryptoResult<String> {
        let plaintext = Self::decrypt_bytes(envelope, recipient_private_key)?;
        Ok(String::from_utf8(plaintext)?)
    }

    /// Entschluesselt ohne UTF-8-Dekodierung
    pub fn decrypt_bytes(
        envelope: &Envelope,
        recipient_private_key: &PrivateKey,
    ) -> CryptoResult<Vec<u8>> {
        let encrypted_content = b64_decode(&envelope.encrypted_content)?;
        let encrypted_key = b64_decode(&envelope.encrypted_key)?;
        let iv: [u8; NONCE_LEN] = b64_decode(&envelope.iv)?.try_into().map_err(|iv: Vec<u8>| {
            CryptoError::Dekodierung(format!(
                "Ungueltige Nonce-Laenge: erwartet {NONCE_LEN}, erhalten {}",
                iv.len()
            ))
        })?;

        let serialized_key = unwrap_key(recipient_private_key, &encrypted_key)?;
        let serialized_key = std::str::from_utf8(&serialized_key).map_err(|_| {
            CryptoError::Schluessel("Ausgewickelter Schluessel ist kein UTF-8".to_string())
        })?;
        let content_key = SymmetricKeyManager::import_key(serialized_key)?;

        let plaintext = open(&content_key, &iv, &encrypted_content)?;

        tracing::debug!(
            ciphertext_len = encrypted_content.len(),
            plaintext_len = plaintext.len(),
            "Umschlag geoeffnet"
        );
        Ok(plaintext)
    }

    /// Parst einen Umschlag aus JSON und entschluesselt ihn
    pub fn decrypt_json(json: &str, recipient_private_key: &PrivateKey) -> CryptoResult<String> {
        let envelope = Envelope::from_json(json)?;
        Self::decrypt(&envelope, recipient_private_key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
