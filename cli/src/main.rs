//! Kuvert CLI – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und fuehrt den
//! Befehl aus.

use anyhow::Result;
use kuvert_cli::{args::Parser, commands, Args, KuvertConfig};
use kuvert_observability::logging_initialisieren;

fn main() -> Result<()> {
    let args = Args::parse();

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let config = KuvertConfig::laden(&args.config)?;

    logging_initialisieren(&config.logging.level, &config.logging.format)?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "Kuvert gestartet"
    );

    commands::ausfuehren(args.command, &config)
}
