//! Transaction records.
//!
//! A [`Transaction`] is the four signable fields and nothing else. A
//! [`SignedTransaction`] pairs one with its detached signature. Neither can
//! be mutated after construction; re-signing means building a new value.

use serde::{Deserialize, Serialize};

use super::canonical::{canonical_bytes, CanonicalBytes};
use crate::crypto::keys::{PublicKey, TxSignature};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An unsigned transfer: `from` pays `amount` to `to`, sequenced by `nonce`.
///
/// `from` and `to` are public key identifiers (hex). The encoder treats them
/// as opaque text, so two spellings of the same key (`AB..` vs `ab..`) sign
/// differently. Use [`PublicKeyId`](crate::crypto::keys::PublicKeyId) to
/// normalize before building when that matters.
///
/// Deserializing ignores unknown keys, which is how richer upstream records
/// (memos, fees, an existing `sig`) get reduced to the signable core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    from: String,
    to: String,
    amount: u64,
    nonce: u64,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: u64, nonce: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            nonce,
        }
    }

    /// The `from` identifier.
    pub fn sender(&self) -> &str {
        &self.from
    }

    /// The `to` identifier.
    pub fn recipient(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The exact bytes a signature covers.
    pub fn canonical_bytes(&self) -> CanonicalBytes {
        canonical_bytes(self)
    }

    /// Parse a JSON object, keeping only the four transaction fields.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A transaction together with its detached signature.
///
/// Serializes as the four transaction fields followed by `sig` (base64).
/// That layout is a storage convenience; verification always re-encodes the
/// embedded [`Transaction`] canonically and never looks at `sig`'s position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    transaction: Transaction,
    sig: TxSignature,
}

impl SignedTransaction {
    /// Only the signer pairs a transaction with a signature.
    pub(crate) fn new(transaction: Transaction, sig: TxSignature) -> Self {
        Self { transaction, sig }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn signature(&self) -> &TxSignature {
        &self.sig
    }

    /// Split back into the unsigned record and the signature.
    pub fn into_parts(self) -> (Transaction, TxSignature) {
        (self.transaction, self.sig)
    }

    /// Check the signature against `public_key`. Fails closed.
    pub fn verify_with(&self, public_key: &PublicKey) -> bool {
        super::verification::verify_transaction(self, public_key)
    }

    /// Parse the signed JSON document. Rejects a missing or malformed `sig`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Two-space indented JSON, the on-disk layout wallets write.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
