//! Umschlag erstellen
//!
//! Der Einmal-Schluessel verlaesst diese Funktion nur RSA-verschluesselt
//! und wird beim Verlassen genullt.

use zeroize::Zeroizing;

use crate::encoding::b64_encode;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::key_pair::wrap_key;
use crate::keys::symmetric::{generate_nonce, seal};
use crate::keys::SymmetricKeyManager;
use crate::types::{Envelope, PublicKey};

/// Erstellt Umschlaege fuer einen Empfaenger
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeEncryptor;

impl EnvelopeEncryptor {
    /// Verschluesselt UTF-8-Text fuer `recipient_public_key`
    pub fn encrypt(plaintext: &str, recipient_public_key: &PublicKey) -> CryptoResult<Envelope> {
        Self::encrypt_bytes(plaintext.as_bytes(), recipient_public_key)
    }

    /// Verschluesselt beliebige Bytes fuer `recipient_public_key`
    pub fn encrypt_bytes(
        plaintext: &[u8],
        recipient_public_key: &PublicKey,
    ) -> CryptoResult<Envelope> {
        let content_key = SymmetricKeyManager::generate_key().map_err(als_verschluesselung)?;
        let iv = generate_nonce()?;

        let encrypted_content = seal(&content_key, &iv, plaintext)?;

        let serialized_key = Zeroizing::new(
            SymmetricKeyManager::export_key(&content_key).map_err(als_verschluesselung)?,
        );
        let encrypted_key = wrap_key(recipient_public_key, serialized_key.as_bytes())?;

        tracing::debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = encrypted_content.len(),
            wrapped_key_len = encrypted_key.len(),
            "Umschlag erstellt"
        );

        Ok(Envelope {
            encrypted_content: b64_encode(&encrypted_content),
            encrypted_key: b64_encode(&encrypted_key),
            iv: b64_encode(&iv),
        })
    }
}

/// Fehler der Schluessel-Primitive beim Verschluesseln sind Verschluesselungsfehler
fn als_verschluesselung(err: CryptoError) -> CryptoError {
    match err {
        CryptoError::Verschluesselung(_) => err,
        other => CryptoError::Verschluesselung(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::b64_decode;
    use crate::keys::KeyPairManager;
    use crate::types::{AsymmetricKeyPair, KeyUsage, AUTH_TAG_LEN, NONCE_LEN};
    use std::sync::OnceLock;

    fn paar() -> &'static AsymmetricKeyPair {
        static PAAR: OnceLock<AsymmetricKeyPair> = OnceLock::new();
        PAAR.get_or_init(|| KeyPairManager::generate_key_pair().unwrap())
    }

    #[test]
    fn umschlag_struktur() {
        let envelope = EnvelopeEncryptor::encrypt("hello world", &paar().public_key).unwrap();

        assert_eq!(b64_decode(&envelope.iv).unwrap().len(), NONCE_LEN);
        assert_eq!(
            b64_decode(&envelope.encrypted_content).unwrap().len(),
            "hello world".len() + AUTH_TAG_LEN
        );
        // RSA-2048 Ciphertext ist immer 256 Bytes
        assert_eq!(b64_decode(&envelope.encrypted_key).unwrap().len(), 256);
    }

    #[test]
    fn frische_nonce_und_schluessel_pro_aufruf() {
        let a = EnvelopeEncryptor::encrypt("gleich", &paar().public_key).unwrap();
        let b = EnvelopeEncryptor::encrypt("gleich", &paar().public_key).unwrap();

        assert_ne!(a.iv, b.iv);
        assert_ne!(a.encrypted_key, b.encrypted_key);
        assert_ne!(a.encrypted_content, b.encrypted_content);
    }

    #[test]
    fn leerer_klartext() {
        let envelope = EnvelopeEncryptor::encrypt("", &paar().public_key).unwrap();
        assert_eq!(
            b64_decode(&envelope.encrypted_content).unwrap().len(),
            AUTH_TAG_LEN
        );
    }

    #[test]
    fn schluessel_ohne_encrypt_verwendung_schlaegt_fehl() {
        let mut public = paar().public_key.clone();
        public.usages = vec![];
        assert!(!public.allows(KeyUsage::Encrypt));

        let result = EnvelopeEncryptor::encrypt("x", &public);
        assert!(matches!(result, Err(CryptoError::Verschluesselung(_))));
    }

    #[test]
    fn schluesselfehler_wird_verschluesselungsfehler() {
        let err = als_verschluesselung(CryptoError::Schluessel(
            "Zufallsquelle nicht verfuegbar".to_string(),
        ));
        match err {
            CryptoError::Verschluesselung(msg) => assert!(msg.contains("Zufallsquelle")),
            other => panic!("Falscher Fehler: {other:?}"),
        }

        let err = als_verschluesselung(CryptoError::Verschluesselung("RSA-OAEP".to_string()));
        assert!(matches!(err, CryptoError::Verschluesselung(msg) if msg == "RSA-OAEP"));
    }
}
