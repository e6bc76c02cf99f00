//! Umschlag-Verschluesselung (hybrid)
//!
//! ## Ablauf
//! 1. Frischer AES-256-GCM-Schluessel + 12-Byte-Nonce pro Nachricht
//! 2. Nutzdaten mit AES-256-GCM verschluesseln (Auth-Tag angehaengt)
//! 3. Einmal-Schluessel als JWK exportieren und mit RSA-OAEP(SHA-256)
//!    fuer den Empfaenger einwickeln
//! 4. Alle drei Teile Base64-kodiert im [`Envelope`](crate::types::Envelope)
//!
//! Kein Zustand zwischen Aufrufen; alles ist parallel aufrufbar.

pub mod decrypt;
pub mod encrypt;

pub use decrypt::EnvelopeDecryptor;
pub use encrypt::EnvelopeEncryptor;
