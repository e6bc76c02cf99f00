pub use clap::Parser;

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "kuvert", version)]
#[command(about = "Hybride Umschlag-Verschluesselung (RSA-OAEP + AES-256-GCM)")]
pub struct Args {
    /// Pfad zur Konfigurationsdatei
    #[arg(long, global = true, env = "KUVERT_CONFIG", default_value = "kuvert.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Befehl,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Befehl {
    /// Erzeugt ein neues RSA-OAEP-Schluessel-Paar als JWK-Dateien
    Keygen {
        /// Zielverzeichnis (Standard: aus der Konfiguration)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Vorhandene Schluessel-Dateien ueberschreiben
        #[arg(long)]
        force: bool,
    },

    /// Verschluesselt eine Nachricht fuer einen Empfaenger
    Encrypt {
        /// Oeffentlicher JWK des Empfaengers
        #[arg(long)]
        public_key: Option<PathBuf>,

        /// Eingabedatei (Standard: stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Ausgabedatei fuer das Umschlag-JSON (Standard: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Oeffnet einen Umschlag mit dem eigenen privaten Schluessel
    Decrypt {
        /// Eigener privater JWK
        #[arg(long)]
        private_key: Option<PathBuf>,

        /// Umschlag-JSON (Standard: stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Ausgabedatei fuer den Klartext (Standard: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
