//! CLI-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass `kuvert` ohne Konfigurationsdatei
//! lauffaehig ist.

use std::path::{Path, PathBuf};

use anyhow::bail;
use kuvert_observability::{log_format_gueltig, log_level_gueltig};
use serde::{Deserialize, Serialize};

/// Vollstaendige Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KuvertConfig {
    /// Ablage der JWK-Dateien
    pub schluessel: SchluesselEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Wo `keygen` schreibt und `encrypt`/`decrypt` standardmaessig lesen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchluesselEinstellungen {
    /// Verzeichnis fuer die Schluessel-Dateien
    pub verzeichnis: PathBuf,
    /// Dateiname des oeffentlichen JWK
    pub oeffentlich: String,
    /// Dateiname des privaten JWK
    pub privat: String,
}

impl Default for SchluesselEinstellungen {
    fn default() -> Self {
        Self {
            verzeichnis: PathBuf::from("."),
            oeffentlich: "public.jwk.json".into(),
            privat: "private.jwk.json".into(),
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl KuvertConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt).map_err(|e| {
                    anyhow::anyhow!("Konfigurationsfehler in '{}': {e}", pfad.display())
                })?;
                config.validieren()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = %pfad.display(),
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{}' nicht lesbar: {e}",
                pfad.display()
            )),
        }
    }

    /// Prueft Werte, die serde nicht abfangen kann. Ein unbekannter Level
    /// wuerde sonst als Target-Direktive gelesen und alle Warnungen schlucken.
    pub fn validieren(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.logging.level) {
            bail!(
                "Ungueltiger Log-Level '{}' (erlaubt: trace, debug, info, warn, error)",
                self.logging.level
            );
        }
        if !log_format_gueltig(&self.logging.format) {
            bail!(
                "Ungueltiges Log-Format '{}' (erlaubt: text, json)",
                self.logging.format
            );
        }
        Ok(())
    }

    /// Pfad des oeffentlichen Schluessels im Schluessel-Verzeichnis
    pub fn oeffentlicher_pfad(&self) -> PathBuf {
        self.schluessel.verzeichnis.join(&self.schluessel.oeffentlich)
    }

    /// Pfad des privaten Schluessels im Schluessel-Verzeichnis
    pub fn privater_pfad(&self) -> PathBuf {
        self.schluessel.verzeichnis.join(&self.schluessel.privat)
    }
}
