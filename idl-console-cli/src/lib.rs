//! Generic IDL-driven console for Anchor-style Solana programs.
//!
//! Provides:
//! - Type coercion of raw operator text into typed argument values
//! - Invocation assembly: ordered arguments plus resolved accounts
//!   (supplied, fixed, well-known, or PDA-derived)
//! - Borsh serialization behind the Anchor instruction discriminator
//! - A session with ticketed submissions so stale results are dropped
//! - An append-only narrator of lifecycle events
//! - A signer seam, with an RPC + keypair implementation
//!
//! Use this as a library to drive programs from other tools, or use the
//! `idl-console` binary for one-shot commands and an interactive session.

pub mod address;
pub mod coerce;
pub mod form;
pub mod serialize;
pub mod pda;
pub mod assemble;
pub mod tx;
pub mod signer;
pub mod narrator;
pub mod session;
pub mod console;
pub mod loader;
pub mod config;
pub mod cli;
pub mod repl;
