//! Base64-Hilfsfunktionen
//!
//! Der Umschlag nutzt Standard-Base64 mit Padding, JWK-Member nutzen
//! Base64url ohne Padding (RFC 7515).

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rsa::BigUint;

use crate::error::CryptoResult;

pub(crate) fn b64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn b64_decode(data: &str) -> CryptoResult<Vec<u8>> {
    Ok(STANDARD.decode(data)?)
}

pub(crate) fn b64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn b64url_decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(data)
}

/// Vorzeichenlose Big-Endian-Ganzzahl -> Base64url
pub(crate) fn uint_to_b64url(value: &BigUint) -> String {
    b64url_encode(&value.to_bytes_be())
}

pub(crate) fn b64url_to_uint(data: &str) -> Result<BigUint, base64::DecodeError> {
    Ok(BigUint::from_bytes_be(&b64url_decode(data)?))
}
