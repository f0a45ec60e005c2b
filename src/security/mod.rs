// src/security/mod.rs
//! Handling of sensitive material: zeroizing buffers and log redaction.

pub mod secret;

// Secret buffer alias re-export
pub use secret::{SecretString, SecretVec};

// Redaction helpers to avoid accidental secret prints
pub mod redaction;
pub use redaction::{redact_mnemonic, short_address};
