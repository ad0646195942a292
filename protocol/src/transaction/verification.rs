//! Transaction verification.
//!
//! Verification re-encodes the embedded [`Transaction`](super::Transaction)
//! canonically and checks the detached signature over those bytes. The
//! `sig` field is never part of the message.
//!
//! The boolean functions are what validators should call. They fail closed.
//! [`check_transaction`] returns a [`TransactionError`] for tooling that
//! wants to explain a rejection.

use thiserror::Error;

use super::types::SignedTransaction;
use crate::crypto::keys::{PublicKey, PublicKeyId};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a signed transaction was rejected.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The `from` field is not a usable public key identifier.
    #[error("invalid sender {address}: {reason}")]
    InvalidSender { address: String, reason: String },

    /// The signature does not verify against the key it was checked with.
    #[error("invalid signature: does not verify against {public_key}")]
    InvalidSignature { public_key: String },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Check `signed` against an explicit public key.
pub fn verify_transaction(signed: &SignedTransaction, public_key: &PublicKey) -> bool {
    check_transaction(signed, public_key).is_ok()
}

/// Check `signed` against the public key named in its own `from` field.
///
/// Returns `false` when `from` is not a valid public key identifier.
pub fn verify_transaction_from_sender(signed: &SignedTransaction) -> bool {
    check_transaction_from_sender(signed).is_ok()
}

/// Diagnostic variant of [`verify_transaction`].
pub fn check_transaction(
    signed: &SignedTransaction,
    public_key: &PublicKey,
) -> Result<(), TransactionError> {
    let canonical = signed.transaction().canonical_bytes();
    if !public_key.verify(canonical.as_bytes(), signed.signature()) {
        return Err(TransactionError::InvalidSignature {
            public_key: public_key.to_hex(),
        });
    }
    Ok(())
}

/// Diagnostic variant of [`verify_transaction_from_sender`].
pub fn check_transaction_from_sender(signed: &SignedTransaction) -> Result<(), TransactionError> {
    let address = signed.transaction().sender();
    let sender = PublicKeyId::parse(address).map_err(|e| TransactionError::InvalidSender {
        address: address.to_string(),
        reason: e.to_string(),
    })?;
    check_transaction(signed, sender.public_key())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
