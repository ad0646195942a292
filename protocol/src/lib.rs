// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # canonsig: Deterministic Transaction Signing
//!
//! Given a transfer's four fields and a signing key, produce byte-exact
//! canonical bytes and an Ed25519 signature over them, such that any other
//! implementation of the same encoding produces the same bytes and accepts
//! the same signature.
//!
//! ## Architecture
//!
//! - **crypto**: key normalization (32-byte seed or 64-byte expanded secret
//!   key, hex with optional `0x`), Ed25519 sign and fail-closed verify.
//! - **transaction**: the fixed `{from, to, amount, nonce}` record, its
//!   canonical JSON encoding, and signing and verification over it.
//! - **config**: wire constants and the validated [`config::SignerConfig`].
//!
//! ```text
//! key hex      ──normalize_key──▶ Keypair
//! Transaction  ──canonical_bytes──▶ CanonicalBytes
//! (Keypair, CanonicalBytes) ──sign──▶ TxSignature
//! (PublicKey, CanonicalBytes, TxSignature) ──verify──▶ bool
//! ```
//!
//! ## Design Philosophy
//!
//! 1. The encoding is the contract. Field order, whitespace and number
//!    formatting are pinned by tests against fixed byte strings.
//! 2. Every function is pure: no I/O, no global state, no clocks.
//! 3. Verification answers yes or no and never panics on malformed input.
//! 4. Secret bytes are zeroized on drop and never logged.

pub mod config;
pub mod crypto;
pub mod transaction;
