//! RSA-OAEP Schluessel-Paare (Langzeit-Identitaet)
//!
//! Feste Parameter: 2048-Bit-Modulus, Exponent 65537, OAEP mit SHA-256.
//! Oeffentliche Schluessel duerfen nur verschluesseln (encrypt/wrapKey),
//! private nur entschluesseln (decrypt/unwrapKey).

use rand::rngs::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::encoding::{b64url_encode, uint_to_b64url};
use crate::error::{CryptoError, CryptoResult};
use crate::jwk::sealed::JwkBuilder;
use crate::jwk::{usage_strings, Jwk, JwkExport};
use crate::types::{
    AsymmetricKeyPair, KeyUsage, PrivateKey, PublicKey, SerializedKey, RSA_MODULUS_BITS,
};

/// JWK-Algorithmus fuer RSA-OAEP mit SHA-256
pub const RSA_OAEP_ALG: &str = "RSA-OAEP-256";

const PUBLIC_USAGES: [KeyUsage; 2] = [KeyUsage::Encrypt, KeyUsage::WrapKey];
const PRIVATE_USAGES: [KeyUsage; 2] = [KeyUsage::Decrypt, KeyUsage::UnwrapKey];

/// Marker fuer RSA-Schluessel-Handles
pub trait AsymmetricKey: JwkExport {}

impl AsymmetricKey for PublicKey {}
impl AsymmetricKey for PrivateKey {}

/// Erzeugt, exportiert und importiert RSA-OAEP-Schluessel-Paare.
///
/// Zustandslos; alle Funktionen nehmen ihre Eingaben explizit.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPairManager;

impl KeyPairManager {
    /// Generiert ein neues, exportierbares Schluessel-Paar
    pub fn generate_key_pair() -> CryptoResult<AsymmetricKeyPair> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_MODULUS_BITS).map_err(|e| {
            CryptoError::Schluessel(format!("RSA-Schluessel-Generierung fehlgeschlagen: {e}"))
        })?;
        let public = RsaPublicKey::from(&private);

        tracing::debug!(bits = RSA_MODULUS_BITS, alg = RSA_OAEP_ALG, "Schluessel-Paar generiert");

        Ok(AsymmetricKeyPair {
            public_key: PublicKey::new(public, true, PUBLIC_USAGES.to_vec()),
            private_key: PrivateKey::new(private, true, PRIVATE_USAGES.to_vec()),
        })
    }

    /// Exportiert einen oeffentlichen oder privaten Schluessel als JWK-JSON
    pub fn export_key<K: AsymmetricKey>(key: &K) -> CryptoResult<SerializedKey> {
        key.export_jwk()
    }

    /// Exportiert beide Haelften: `(oeffentlich, privat)`
    pub fn export_key_pair(pair: &AsymmetricKeyPair) -> CryptoResult<(SerializedKey, SerializedKey)> {
        Ok((
            Self::export_key(&pair.public_key)?,
            Self::export_key(&pair.private_key)?,
        ))
    }

    /// Importiert einen oeffentlichen Schluessel (nur encrypt/wrapKey)
    pub fn import_public_key(data: &str) -> CryptoResult<PublicKey> {
        let jwk = Jwk::parse(data)?;
        jwk.expect_kty("RSA")?;
        jwk.expect_alg(RSA_OAEP_ALG)?;
        if jwk.d.is_some() {
            return Err(CryptoError::Schluessel(
                "Privater Schluessel kann nicht als oeffentlicher importiert werden".to_string(),
            ));
        }
        let usages = jwk.usages_within(&PUBLIC_USAGES)?;

        let n = Jwk::required_uint(&jwk.n, "n")?;
        let e = Jwk::required_uint(&jwk.e, "e")?;
        let inner = RsaPublicKey::new(n, e)
            .map_err(|e| CryptoError::Schluessel(format!("Ungueltiger RSA-Schluessel: {e}")))?;

        tracing::debug!(bits = inner.size() * 8, "Oeffentlicher Schluessel importiert");
        Ok(PublicKey::new(inner, jwk.extractable(), usages))
    }

    /// Importiert einen privaten Schluessel (nur decrypt/unwrapKey)
    pub fn import_private_key(data: &str) -> CryptoResult<PrivateKey> {
        let jwk = Jwk::parse(data)?;
        jwk.expect_kty("RSA")?;
        jwk.expect_alg(RSA_OAEP_ALG)?;
        let usages = jwk.usages_within(&PRIVATE_USAGES)?;

        let n = Jwk::required_uint(&jwk.n, "n")?;
        let e = Jwk::required_uint(&jwk.e, "e")?;
        let d = Jwk::required_uint(&jwk.d, "d")?;
        let p = Jwk::required_uint(&jwk.p, "p")?;
        let q = Jwk::required_uint(&jwk.q, "q")?;
        let inner = RsaPrivateKey::from_components(n, e, d, vec![p, q])
            .map_err(|e| CryptoError::Schluessel(format!("Ungueltiger RSA-Schluessel: {e}")))?;

        tracing::debug!(bits = inner.size() * 8, "Privater Schluessel importiert");
        Ok(PrivateKey::new(inner, jwk.extractable(), usages))
    }
}

impl JwkExport for PublicKey {
    fn is_extractable(&self) -> bool {
        self.extractable
    }
}

impl JwkBuilder for PublicKey {
    fn build_jwk(&self) -> CryptoResult<Jwk> {
        Ok(Jwk {
            alg: Some(RSA_OAEP_ALG.to_string()),
            d: None,
            dp: None,
            dq: None,
            e: Some(uint_to_b64url(self.inner.e())),
            ext: Some(self.extractable),
            k: None,
            key_ops: Some(usage_strings(&self.usages)),
            kty: "RSA".to_string(),
            n: Some(uint_to_b64url(self.inner.n())),
            p: None,
            q: None,
            qi: None,
        })
    }
}

impl JwkExport for PrivateKey {
    fn is_extractable(&self) -> bool {
        self.extractable
    }
}

impl JwkBuilder for PrivateKey {
    fn build_jwk(&self) -> CryptoResult<Jwk> {
        let fehlt = |name: &str| {
            CryptoError::Schluessel(format!("RSA-Schluessel ohne vorberechnetes '{name}'"))
        };

        let [p, q] = self.inner.primes() else {
            return Err(CryptoError::Schluessel(
                "Nur RSA mit zwei Primfaktoren wird unterstuetzt".to_string(),
            ));
        };
        let dp = self.inner.dp().ok_or_else(|| fehlt("dp"))?;
        let dq = self.inner.dq().ok_or_else(|| fehlt("dq"))?;
        // qinv ist nach der Vorberechnung im Bereich [0, p)
        let (_, qi) = self.inner.qinv().ok_or_else(|| fehlt("qi"))?.to_bytes_be();

        Ok(Jwk {
            alg: Some(RSA_OAEP_ALG.to_string()),
            d: Some(uint_to_b64url(self.inner.d())),
            dp: Some(uint_to_b64url(dp)),
            dq: Some(uint_to_b64url(dq)),
            e: Some(uint_to_b64url(self.inner.e())),
            ext: Some(self.extractable),
            k: None,
            key_ops: Some(usage_strings(&self.usages)),
            kty: "RSA".to_string(),
            n: Some(uint_to_b64url(self.inner.n())),
            p: Some(uint_to_b64url(p)),
            q: Some(uint_to_b64url(q)),
            qi: Some(b64url_encode(&qi)),
        })
    }
}

/// RSA-OAEP(SHA-256)-Verschluesselung kleiner Daten (Einmal-Schluessel)
pub(crate) fn wrap_key(recipient: &PublicKey, data: &[u8]) -> CryptoResult<Vec<u8>> {
    if !(recipient.allows(KeyUsage::Encrypt) || recipient.allows(KeyUsage::WrapKey)) {
        return Err(CryptoError::Verschluesselung(
            "Empfaenger-Schluessel erlaubt keine Verschluesselung".to_string(),
        ));
    }

    recipient
        .inner
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), data)
        .map_err(|e| CryptoError::Verschluesselung(format!("RSA-OAEP: {e}")))
}

/// Gegenstueck zu [`wrap_key`]. Jeder RSA-Fehler wird als [`CryptoError::KeyMismatch`]
/// gemeldet, da OAEP falschen Schluessel und Manipulation nicht unterscheidet.
pub(crate) fn unwrap_key(recipient: &PrivateKey, wrapped: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
    if !(recipient.allows(KeyUsage::Decrypt) || recipient.allows(KeyUsage::UnwrapKey)) {
        return Err(CryptoError::Schluessel(
            "Privater Schluessel erlaubt keine Entschluesselung".to_string(),
        ));
    }

    recipient
        .inner
        .decrypt(Oaep::new::<Sha256>(), wrapped)
        .map(Zeroizing::new)
        .map_err(|_| {
            tracing::warn!(
                wrapped_len = wrapped.len(),
                "RSA-OAEP-Entschluesselung fehlgeschlagen (falscher Schluessel oder manipuliert)"
            );
            CryptoError::KeyMismatch
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn paar() -> &'static AsymmetricKeyPair {
        static PAAR: OnceLock<AsymmetricKeyPair> = OnceLock::new();
        PAAR.get_or_init(|| KeyPairManager::generate_key_pair().unwrap())
    }

    #[test]
    fn schluessel_paar_parameter() {
        let pair = paar();
        assert_eq!(pair.public_key.modulus_bits(), 2048);
        assert_eq!(pair.private_key.modulus_bits(), 2048);
        assert!(pair.public_key.is_extractable());
        assert!(pair.private_key.is_extractable());
        assert_eq!(pair.public_key.usages(), &PUBLIC_USAGES);
        assert_eq!(pair.private_key.usages(), &PRIVATE_USAGES);
    }

    #[test]
    fn oeffentlicher_jwk_format() {
        let json = KeyPairManager::export_key(&paar().public_key).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kty"], "RSA");
        assert_eq!(value["alg"], "RSA-OAEP-256");
        assert_eq!(value["e"], "AQAB");
        assert_eq!(value["ext"], true);
        assert_eq!(value["key_ops"], serde_json::json!(["encrypt", "wrapKey"]));
        assert!(value.get("d").is_none());
    }

    #[test]
    fn privater_jwk_format() {
        let json = KeyPairManager::export_key(&paar().private_key).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for member in ["n", "e", "d", "p", "q", "dp", "dq", "qi"] {
            assert!(value[member].is_string(), "Member {member} fehlt");
        }
        assert_eq!(value["key_ops"], serde_json::json!(["decrypt", "unwrapKey"]));
    }

    #[test]
    fn export_import_roundtrip() {
        let (public_json, private_json) = KeyPairManager::export_key_pair(paar()).unwrap();

        let public = KeyPairManager::import_public_key(&public_json).unwrap();
        let private = KeyPairManager::import_private_key(&private_json).unwrap();
        assert_eq!(public, paar().public_key);

        // Re-Export ist identisch
        assert_eq!(KeyPairManager::export_key(&public).unwrap(), public_json);
        assert_eq!(KeyPairManager::export_key(&private).unwrap(), private_json);

        let wrapped = wrap_key(&public, b"einmal-schluessel").unwrap();
        assert_eq!(unwrap_key(&private, &wrapped).unwrap().as_slice(), b"einmal-schluessel");
    }

    #[test]
    fn privater_als_oeffentlicher_import_schlaegt_fehl() {
        let private_json = KeyPairManager::export_key(&paar().private_key).unwrap();
        let result = KeyPairManager::import_public_key(&private_json);
        assert!(matches!(result, Err(CryptoError::Schluessel(_))));
    }

    #[test]
    fn oeffentlicher_als_privater_import_schlaegt_fehl() {
        let public_json = KeyPairManager::export_key(&paar().public_key).unwrap();
        let result = KeyPairManager::import_private_key(&public_json);
        assert!(matches!(result, Err(CryptoError::Schluessel(_))));
    }

    #[test]
    fn falscher_algorithmus_schlaegt_fehl() {
        let json = KeyPairManager::export_key(&paar().public_key).unwrap();
        let json = json.replace("RSA-OAEP-256", "RSA-OAEP");
        assert!(matches!(
            KeyPairManager::import_public_key(&json),
            Err(CryptoError::Schluessel(_))
        ));
    }

    #[test]
    fn falsche_verwendung_schlaegt_fehl() {
        let json = KeyPairManager::export_key(&paar().public_key).unwrap();
        let json = json.replace(r#"["encrypt","wrapKey"]"#, r#"["verify"]"#);
        assert!(KeyPairManager::import_public_key(&json).is_err());

        let json = KeyPairManager::export_key(&paar().private_key).unwrap();
        let json = json.replace(r#"["decrypt","unwrapKey"]"#, r#"["encrypt"]"#);
        assert!(KeyPairManager::import_private_key(&json).is_err());
    }

    #[test]
    fn kaputtes_json_schlaegt_fehl() {
        assert!(matches!(
            KeyPairManager::import_public_key("kein json"),
            Err(CryptoError::Schluessel(_))
        ));
        assert!(matches!(
            KeyPairManager::import_private_key(r#"{"kty":"oct","k":"AAAA"}"#),
            Err(CryptoError::Schluessel(_))
        ));
    }

    #[test]
    fn nicht_exportierbarer_schluessel() {
        let json = KeyPairManager::export_key(&paar().private_key).unwrap();
        let json = json.replace(r#""ext":true"#, r#""ext":false"#);
        let private = KeyPairManager::import_private_key(&json).unwrap();
        assert!(!private.is_extractable());
        assert!(matches!(
            KeyPairManager::export_key(&private),
            Err(CryptoError::Schluessel(_))
        ));
    }

    #[test]
    fn abgeleiteter_oeffentlicher_schluessel() {
        let derived = paar().private_key.to_public_key();
        assert_eq!(derived, paar().public_key);
    }

    #[test]
    fn falscher_private_key_ergibt_key_mismatch() {
        let other = KeyPairManager::generate_key_pair().unwrap();
        let wrapped = wrap_key(&paar().public_key, b"daten").unwrap();
        assert!(matches!(
            unwrap_key(&other.private_key, &wrapped),
            Err(CryptoError::KeyMismatch)
        ));
    }

    #[test]
    fn nur_unwrap_key_verwendung_reicht() {
        let json = KeyPairManager::export_key(&paar().private_key).unwrap();
        let json = json.replace(r#"["decrypt","unwrapKey"]"#, r#"["unwrapKey"]"#);
        let private = KeyPairManager::import_private_key(&json).unwrap();
        let wrapped = wrap_key(&paar().public_key, b"x").unwrap();
        assert_eq!(unwrap_key(&private, &wrapped).unwrap().as_slice(), b"x");
    }
}
