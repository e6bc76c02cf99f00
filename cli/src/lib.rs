//! kuvert-cli – Bibliotheks-Root
//!
//! Deklariert die CLI-Module und stellt die Befehle fuer Integrationstests
//! bereit.

pub mod args;
pub mod commands;
pub mod config;

pub use args::{Args, Befehl};
pub use config::KuvertConfig;
