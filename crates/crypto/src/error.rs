//! Fehlertypen fuer den Umschlag-Kern
//!
//! Jede Variante entspricht einer Fehlerkategorie, auf die Aufrufer
//! unterschiedlich reagieren koennen. Keine Fehlermeldung enthaelt
//! Schluesselmaterial oder Klartext.

use thiserror::Error;

/// Fehler im Kryptografie-Subsystem
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Schluesselmaterial ist fehlerhaft, hat den falschen Algorithmus
    /// oder die falsche Verwendung.
    #[error("Ungueltiger Schluessel: {0}")]
    Schluessel(String),

    /// Der private Schluessel gehoert nicht zum oeffentlichen Schluessel,
    /// mit dem der Umschlag erstellt wurde. RSA-OAEP unterscheidet das nicht
    /// von einem manipulierten `encryptedKey`.
    #[error("Schluessel passt nicht zum Umschlag")]
    KeyMismatch,

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    /// Auth-Tag-Pruefung von AES-GCM fehlgeschlagen
    #[error("Authentifizierung fehlgeschlagen: Auth-Tag ungueltig")]
    Authentifizierung,

    #[error("Dekodierung fehlgeschlagen: {0}")]
    Dekodierung(String),
}

impl CryptoError {
    /// Sicherheitsrelevante Fehler (Manipulation oder falscher Schluessel)
    pub fn is_security_relevant(&self) -> bool {
        matches!(self, Self::KeyMismatch | Self::Authentifizierung)
    }
}

impl From<base64::DecodeError> for CryptoError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Dekodierung(format!("Base64: {e}"))
    }
}

impl From<std::string::FromUtf8Error> for CryptoError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Dekodierung(format!("UTF-8: {e}"))
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;
