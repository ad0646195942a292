//! # Cryptographic Primitives
//!
//! Ed25519 and nothing else. Everything here is a thin, type-safe wrapper
//! around `ed25519-dalek`:
//!
//! - **keys**: turn key text into a [`Keypair`], plus the public key and
//!   signature types.
//! - **signatures**: sign and verify raw message bytes.

pub mod keys;
pub mod signatures;

pub use keys::{
    normalize_key, KeyError, KeyFallback, KeyMaterial, Keypair, PublicKey, PublicKeyId,
    TxSignature,
};
pub use signatures::{sign, verify, verify_raw, verify_with, SignatureError};
