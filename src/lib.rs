// src/lib.rs
//! Self-custodial EVM HD wallet core: BIP39 phrases, BIP32/BIP44 derivation of one
//! account per supported chain, and transactional SQLite persistence.

pub mod cli;
pub mod core;
pub mod security;
pub mod storage;
