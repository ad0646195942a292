//! Canonical transaction encoding.
//!
//! The bytes a signature covers are the compact JSON object
//!
//! ```text
//! {"from":"<hex>","to":"<hex>","amount":<int>,"nonce":<int>}
//! ```
//!
//! with the keys in exactly that order, no whitespace, integers in plain
//! base-10 and strings carrying only JSON's mandatory escapes. This is the
//! wire contract every signer and verifier has to reproduce byte-for-byte.
//!
//! Ordering comes from the declaration order of `CanonicalView`'s fields,
//! which `serde_json` follows for structs. Nothing here goes through a map,
//! so insertion order of some upstream representation cannot leak in.

use serde::Serialize;
use std::fmt;

use super::types::Transaction;

/// The four signable fields, borrowed, in wire order.
#[derive(Serialize)]
struct CanonicalView<'a> {
    from: &'a str,
    to: &'a str,
    amount: u64,
    nonce: u64,
}

/// The canonical encoding of one [`Transaction`]. Always valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for CanonicalBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode a transaction's signable fields.
///
/// ```
/// use canonsig_protocol::transaction::{canonical_bytes, Transaction};
///
/// let tx = Transaction::new("aa", "bb", 100, 1);
/// assert_eq!(
///     canonical_bytes(&tx).as_str(),
///     r#"{"from":"aa","to":"bb","amount":100,"nonce":1}"#
/// );
/// ```
pub fn canonical_bytes(tx: &Transaction) -> CanonicalBytes {
    let view = CanonicalView {
        from: tx.sender(),
        to: tx.recipient(),
        amount: tx.amount(),
        nonce: tx.nonce(),
    };
    // Two strings and two integers: serde_json has no failure path for these.
    let encoded = serde_json::to_string(&view).expect("canonical view is always serializable");
    CanonicalBytes(encoded)
}
