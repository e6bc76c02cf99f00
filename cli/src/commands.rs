//! Ausfuehrung der CLI-Befehle
//!
//! Die Befehle lesen und schreiben nur Dateien bzw. stdin/stdout; die
//! Kryptografie liegt vollstaendig in `kuvert-crypto`.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use kuvert_crypto::{Envelope, EnvelopeDecryptor, EnvelopeEncryptor, KeyPairManager};

use crate::args::Befehl;
use crate::config::KuvertConfig;

/// Fuehrt einen geparsten Befehl aus
pub fn ausfuehren(befehl: Befehl, config: &KuvertConfig) -> Result<()> {
    match befehl {
        Befehl::Keygen { dir, force } => {
            let verzeichnis = dir.unwrap_or_else(|| config.schluessel.verzeichnis.clone());
            let (oeffentlich, privat) = keygen(
                &verzeichnis.join(&config.schluessel.oeffentlich),
                &verzeichnis.join(&config.schluessel.privat),
                force,
            )?;
            eprintln!("Oeffentlicher Schluessel: {}", oeffentlich.display());
            eprintln!("Privater Schluessel:      {}", privat.display());
        }
        Befehl::Encrypt {
            public_key,
            input,
            output,
        } => {
            let schluessel = public_key.unwrap_or_else(|| config.oeffentlicher_pfad());
            let klartext = eingabe_lesen(input.as_deref())?;
            let umschlag = encrypt(&schluessel, &klartext)?;
            ausgabe_schreiben(output.as_deref(), umschlag.as_bytes())?;
        }
        Befehl::Decrypt {
            private_key,
            input,
            output,
        } => {
            let schluessel = private_key.unwrap_or_else(|| config.privater_pfad());
            let umschlag = eingabe_lesen(input.as_deref())?;
            let umschlag = String::from_utf8(umschlag).context("Umschlag ist kein UTF-8")?;
            let klartext = decrypt(&schluessel, &umschlag)?;
            ausgabe_schreiben(output.as_deref(), &klartext)?;
        }
    }
    Ok(())
}

/// Erzeugt ein Schluessel-Paar und schreibt beide JWK-Dateien
pub fn keygen(oeffentlich: &Path, privat: &Path, force: bool) -> Result<(PathBuf, PathBuf)> {
    if !force {
        for pfad in [oeffentlich, privat] {
            if pfad.exists() {
                bail!(
                    "'{}' existiert bereits (--force zum Ueberschreiben)",
                    pfad.display()
                );
            }
        }
    }

    let pair = KeyPairManager::generate_key_pair()?;
    let (public_json, private_json) = KeyPairManager::export_key_pair(&pair)?;

    if let Some(parent) = privat.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Verzeichnis '{}' nicht anlegbar", parent.display()))?;
    }
    if let Some(parent) = oeffentlich.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Verzeichnis '{}' nicht anlegbar", parent.display()))?;
    }

    std::fs::write(oeffentlich, public_json)
        .with_context(|| format!("'{}' nicht schreibbar", oeffentlich.display()))?;
    privat_schreiben(privat, private_json.as_bytes())?;

    tracing::info!(
        oeffentlich = %oeffentlich.display(),
        privat = %privat.display(),
        "Schluessel-Paar gespeichert"
    );
    Ok((oeffentlich.to_path_buf(), privat.to_path_buf()))
}

/// Verschluesselt `klartext` fuer den JWK in `public_key` und liefert das
/// Umschlag-JSON
pub fn encrypt(public_key: &Path, klartext: &[u8]) -> Result<String> {
    let jwk = std::fs::read_to_string(public_key)
        .with_context(|| format!("Schluessel '{}' nicht lesbar", public_key.display()))?;
    let recipient = KeyPairManager::import_public_key(&jwk)
        .with_context(|| format!("'{}' ist kein oeffentlicher RSA-OAEP-JWK", public_key.display()))?;

    let umschlag = EnvelopeEncryptor::encrypt_bytes(klartext, &recipient)?;
    Ok(umschlag.to_json()?)
}

/// Oeffnet ein Umschlag-JSON mit dem JWK in `private_key`
pub fn decrypt(private_key: &Path, umschlag_json: &str) -> Result<Vec<u8>> {
    let jwk = std::fs::read_to_string(private_key)
        .with_context(|| format!("Schluessel '{}' nicht lesbar", private_key.display()))?;
    let recipient = KeyPairManager::import_private_key(&jwk)
        .with_context(|| format!("'{}' ist kein privater RSA-OAEP-JWK", private_key.display()))?;

    let umschlag = Envelope::from_json(umschlag_json.trim())?;
    let klartext = EnvelopeDecryptor::decrypt_bytes(&umschlag, &recipient).map_err(|e| {
        if e.is_security_relevant() {
            tracing::warn!(fehler = %e, "Umschlag abgelehnt");
        }
        e
    })?;
    Ok(klartext)
}

fn eingabe_lesen(pfad: Option<&Path>) -> Result<Vec<u8>> {
    match pfad {
        Some(pfad) => {
            std::fs::read(pfad).with_context(|| format!("'{}' nicht lesbar", pfad.display()))
        }
        None => {
            let mut puffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut puffer)
                .context("stdin nicht lesbar")?;
            Ok(puffer)
        }
    }
}

fn ausgabe_schreiben(pfad: Option<&Path>, daten: &[u8]) -> Result<()> {
    match pfad {
        Some(pfad) => {
            std::fs::write(pfad, daten).with_context(|| format!("'{}' nicht schreibbar", pfad.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(daten).context("stdout nicht schreibbar")?;
            stdout.flush().context("stdout nicht schreibbar")
        }
    }
}

#[cfg(unix)]
fn privat_schreiben(pfad: &Path, daten: &[u8]) -> Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut datei = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(pfad)
        .with_context(|| format!("'{}' nicht schreibbar", pfad.display()))?;
    datei
        .write_all(daten)
        .with_context(|| format!("'{}' nicht schreibbar", pfad.display()))
}

#[cfg(not(unix))]
fn privat_schreiben(pfad: &Path, daten: &[u8]) -> Result<()> {
    std::fs::write(pfad, daten).with_context(|| format!("'{}' nicht schreibbar", pfad.display()))
}
