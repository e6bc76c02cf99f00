//! Ephemere AES-256-GCM Schluessel
//!
//! Pro Nachricht wird ein frischer Schluessel erzeugt, genau einmal benutzt
//! und danach verworfen. Die Nonce ist 12 Bytes lang und zufaellig.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce as AesNonce,
};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::encoding::b64url_encode;
use crate::error::{CryptoError, CryptoResult};
use crate::jwk::sealed::JwkBuilder;
use crate::jwk::{usage_strings, Jwk, JwkExport};
use crate::types::{KeyUsage, SecretBytes, SerializedKey, SymmetricKey, AES_KEY_LEN, NONCE_LEN};

/// JWK-Algorithmus fuer AES-256-GCM
pub const AES_GCM_ALG: &str = "A256GCM";

const SYMMETRIC_USAGES: [KeyUsage; 2] = [KeyUsage::Encrypt, KeyUsage::Decrypt];

/// Erzeugt, exportiert und importiert AES-256-GCM-Schluessel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricKeyManager;

impl SymmetricKeyManager {
    /// Generiert einen neuen, exportierbaren Schluessel (encrypt/decrypt)
    pub fn generate_key() -> CryptoResult<SymmetricKey> {
        let mut key_bytes = vec![0u8; AES_KEY_LEN];
        OsRng.try_fill_bytes(&mut key_bytes).map_err(|e| {
            CryptoError::Schluessel(format!("Zufallsquelle nicht verfuegbar: {e}"))
        })?;

        Ok(SymmetricKey::new(
            SecretBytes::new(key_bytes),
            true,
            SYMMETRIC_USAGES.to_vec(),
        ))
    }

    pub fn export_key(key: &SymmetricKey) -> CryptoResult<SerializedKey> {
        key.export_jwk()
    }

    pub fn import_key(data: &str) -> CryptoResult<SymmetricKey> {
        let jwk = Jwk::parse(data)?;
        jwk.expect_kty("oct")?;
        jwk.expect_alg(AES_GCM_ALG)?;
        let usages = jwk.usages_within(&SYMMETRIC_USAGES)?;

        let key_bytes = SecretBytes::new(Jwk::required_bytes(&jwk.k, "k")?);
        if key_bytes.len() != AES_KEY_LEN {
            return Err(CryptoError::Schluessel(format!(
                "Ungueltige Schluessel-Laenge: erwartet {AES_KEY_LEN}, erhalten {}",
                key_bytes.len()
            )));
        }

        Ok(SymmetricKey::new(key_bytes, jwk.extractable(), usages))
    }
}

impl JwkExport for SymmetricKey {
    fn is_extractable(&self) -> bool {
        self.extractable
    }
}

impl JwkBuilder for SymmetricKey {
    fn build_jwk(&self) -> CryptoResult<Jwk> {
        Ok(Jwk {
            alg: Some(AES_GCM_ALG.to_string()),
            d: None,
            dp: None,
            dq: None,
            e: None,
            ext: Some(self.extractable),
            k: Some(b64url_encode(self.bytes.as_bytes())),
            key_ops: Some(usage_strings(&self.usages)),
            kty: "oct".to_string(),
            n: None,
            p: None,
            q: None,
            qi: None,
        })
    }
}

/// Zieht eine frische 12-Byte-Nonce aus der Zufallsquelle
pub(crate) fn generate_nonce() -> CryptoResult<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::Verschluesselung(format!("Zufallsquelle nicht verfuegbar: {e}")))?;
    Ok(nonce)
}

fn cipher(key: &SymmetricKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.bytes.as_bytes()))
}

/// AES-256-GCM: Ausgabe ist Ciphertext mit angehaengtem 16-Byte-Auth-Tag
pub(crate) fn seal(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    if !key.allows(KeyUsage::Encrypt) {
        return Err(CryptoError::Verschluesselung(
            "Schluessel erlaubt keine Verschluesselung".to_string(),
        ));
    }

    cipher(key)
        .encrypt(AesNonce::from_slice(nonce), plaintext)
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))
}

/// Entschluesselt und verifiziert den Auth-Tag
pub(crate) fn open(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    if !key.allows(KeyUsage::Decrypt) {
        return Err(CryptoError::Schluessel(
            "Schluessel erlaubt keine Entschluesselung".to_string(),
        ));
    }

    cipher(key)
        .decrypt(AesNonce::from_slice(nonce), ciphertext)
        .map_err(|_| {
            tracing::warn!(
                ciphertext_len = ciphertext.len(),
                "AES-GCM Auth-Tag-Pruefung fehlgeschlagen"
            );
            CryptoError::Authentifizierung
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AUTH_TAG_LEN;

    #[test]
    fn schluessel_generieren() {
        let key = SymmetricKeyManager::generate_key().unwrap();
        assert_eq!(key.bytes.len(), 32);
        assert!(key.is_extractable());
        assert_eq!(key.usages(), &SYMMETRIC_USAGES);
    }

    #[test]
    fn zwei_schluessel_sind_verschieden() {
        let k1 = SymmetricKeyManager::generate_key().unwrap();
        let k2 = SymmetricKeyManager::generate_key().unwrap();
        assert_ne!(k1.bytes.as_bytes(), k2.bytes.as_bytes());
    }

    #[test]
    fn jwk_format() {
        let key = SymmetricKeyManager::generate_key().unwrap();
        let json = SymmetricKeyManager::export_key(&key).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kty"], "oct");
        assert_eq!(value["alg"], "A256GCM");
        assert_eq!(value["ext"], true);
        assert_eq!(value["key_ops"], serde_json::json!(["encrypt", "decrypt"]));
        // 32 Bytes -> 43 Zeichen Base64url ohne Padding
        assert_eq!(value["k"].as_str().unwrap().len(), 43);
    }

    #[test]
    fn export_import_roundtrip() {
        let key = SymmetricKeyManager::generate_key().unwrap();
        let json = SymmetricKeyManager::export_key(&key).unwrap();
        let imported = SymmetricKeyManager::import_key(&json).unwrap();

        assert_eq!(imported.bytes.as_bytes(), key.bytes.as_bytes());
        assert_eq!(SymmetricKeyManager::export_key(&imported).unwrap(), json);

        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&key, &nonce, b"Hallo").unwrap();
        assert_eq!(open(&imported, &nonce, &ciphertext).unwrap(), b"Hallo");
    }

    #[test]
    fn ciphertext_hat_auth_tag() {
        let key = SymmetricKeyManager::generate_key().unwrap();
        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&key, &nonce, b"1234567890").unwrap();
        assert_eq!(ciphertext.len(), 10 + AUTH_TAG_LEN);
    }

    #[test]
    fn manipulierter_ciphertext_schlaegt_fehl() {
        let key = SymmetricKeyManager::generate_key().unwrap();
        let nonce = generate_nonce().unwrap();
        let mut ciphertext = seal(&key, &nonce, b"Original").unwrap();
        ciphertext[0] ^= 0x01;

        assert!(matches!(
            open(&key, &nonce, &ciphertext),
            Err(CryptoError::Authentifizierung)
        ));
    }

    #[test]
    fn falsche_laenge_schlaegt_fehl() {
        let json = r#"{"alg":"A256GCM","k":"AAAAAAAAAAAAAAAAAAAAAA","kty":"oct"}"#;
        assert!(matches!(
            SymmetricKeyManager::import_key(json),
            Err(CryptoError::Schluessel(_))
        ));
    }

    #[test]
    fn falscher_algorithmus_schlaegt_fehl() {
        let key = SymmetricKeyManager::generate_key().unwrap();
        let json = SymmetricKeyManager::export_key(&key)
            .unwrap()
            .replace("A256GCM", "A256CBC");
        assert!(SymmetricKeyManager::import_key(&json).is_err());
    }

    #[test]
    fn rsa_jwk_wird_abgelehnt() {
        let json = r#"{"alg":"RSA-OAEP-256","e":"AQAB","kty":"RSA","n":"AQAB"}"#;
        assert!(matches!(
            SymmetricKeyManager::import_key(json),
            Err(CryptoError::Schluessel(_))
        ));
    }

    #[test]
    fn nur_encrypt_verwendung_kann_nicht_entschluesseln() {
        let key = SymmetricKeyManager::generate_key().unwrap();
        let json = SymmetricKeyManager::export_key(&key)
            .unwrap()
            .replace(r#"["encrypt","decrypt"]"#, r#"["encrypt"]"#);
        let encrypt_only = SymmetricKeyManager::import_key(&json).unwrap();

        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&encrypt_only, &nonce, b"x").unwrap();
        assert!(matches!(
            open(&encrypt_only, &nonce, &ciphertext),
            Err(CryptoError::Schluessel(_))
        ));
    }

    #[test]
    fn nicht_exportierbar() {
        let key = SymmetricKeyManager::generate_key().unwrap();
        let json = SymmetricKeyManager::export_key(&key)
            .unwrap()
            .replace(r#""ext":true"#, r#""ext":false"#);
        let key = SymmetricKeyManager::import_key(&json).unwrap();
        assert!(SymmetricKeyManager::export_key(&key).is_err());
    }
}
