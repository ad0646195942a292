//! # Transaction Module
//!
//! The fixed four-field transfer record, its canonical encoding, and signing
//! and verification over that encoding.
//!
//! ## Architecture
//!
//! ```text
//! types.rs       : Transaction and SignedTransaction
//! canonical.rs   : the byte-exact encoding a signature covers
//! signing.rs     : sign a Transaction with a normalized keypair
//! verification.rs: check a SignedTransaction against a public key
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`Transaction::new`], or [`Transaction::from_json`] to strip a
//!    richer record down to its signable fields.
//! 2. **Sign**: [`sign_transaction`] with a [`Keypair`](crate::crypto::Keypair),
//!    or [`sign_with_config`] straight from a
//!    [`SignerConfig`](crate::config::SignerConfig).
//! 3. **Verify**: [`verify_transaction`] against a known key, or
//!    [`verify_transaction_from_sender`] against the `from` field.
//!
//! ## Design Decisions
//!
//! - The canonical form is compact JSON with a fixed key order, so it can be
//!   reproduced by a few lines of JavaScript (`JSON.stringify` of an object
//!   literal built in that order) as well as by this crate.
//! - All amounts and nonces are `u64`. No floating point.
//! - A transaction never contains its own signature. `SignedTransaction` holds
//!   both side by side.

pub mod canonical;
pub mod signing;
pub mod types;
pub mod verification;

pub use canonical::{canonical_bytes, CanonicalBytes};
pub use signing::{sign_transaction, sign_with_config};
pub use types::{SignedTransaction, Transaction};
pub use verification::{
    check_transaction, check_transaction_from_sender, verify_transaction,
    verify_transaction_from_sender, TransactionError,
};
