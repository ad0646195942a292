//! # Signing Configuration & Constants
//!
//! Every fixed size and wire constant in canonsig lives here, together with
//! [`SignerConfig`], the explicit configuration value handed to the signing
//! pipeline by whatever outer layer gathered it (CLI flags, environment,
//! a key-management service).
//!
//! There are no placeholder defaults. A `SignerConfig` either has every
//! required field populated and validated, or it does not exist.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::keys::{KeyError, KeyFallback, PublicKeyId};

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// The one and only signature scheme. Fixed, not negotiated.
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Length of an Ed25519 seed (the compact secret key form).
pub const SEED_LENGTH: usize = 32;

/// Length of an expanded secret key: `seed || public_key`, the layout NaCl
/// and tweetnacl hand out from `crypto_sign_keypair`.
pub const EXPANDED_SECRET_KEY_LENGTH: usize = 64;

/// Public (verifying) key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Every decoded key length the normalizer accepts, in the order error
/// messages list them.
pub const ACCEPTED_KEY_LENGTHS: [usize; 2] = [SEED_LENGTH, EXPANDED_SECRET_KEY_LENGTH];

/// Optional marker in front of hex-encoded keys. Stripped before decoding.
pub const HEX_PREFIX: &str = "0x";

// ---------------------------------------------------------------------------
// Canonical Encoding
// ---------------------------------------------------------------------------

/// Field keys of the canonical transaction object, in wire order.
///
/// Changing this order invalidates every signature ever produced.
pub const CANONICAL_FIELD_ORDER: [&str; 4] = ["from", "to", "amount", "nonce"];

/// Name of the detached signature field in the signed output document.
pub const SIGNATURE_FIELD: &str = "sig";

// ---------------------------------------------------------------------------
// SignerConfig
// ---------------------------------------------------------------------------

/// Errors raised while assembling a [`SignerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field was absent or blank.
    #[error("missing required configuration field `{field}`")]
    MissingField { field: &'static str },

    /// The secret key text does not normalize to a keypair.
    #[error("invalid `{field}`: {source}")]
    InvalidKey {
        field: &'static str,
        #[source]
        source: KeyError,
    },
}

/// Everything the signing pipeline needs to produce a transfer from one
/// configured sender to one configured recipient.
///
/// Constructed through [`SignerConfig::new`], which validates the required
/// fields up front. The secret key stays as text and is only decoded for the
/// duration of a signing call.
#[derive(Clone)]
pub struct SignerConfig {
    secret_key_hex: Zeroizing<String>,
    recipient: PublicKeyId,
    sender: Option<PublicKeyId>,
    fallback: KeyFallback,
}

impl SignerConfig {
    /// Builds a config from the required values and validates them.
    ///
    /// The secret key is test-normalized under `fallback` so that a bad key
    /// fails here rather than in the middle of a signing run.
    pub fn new(
        secret_key_hex: &str,
        recipient: &str,
        fallback: KeyFallback,
    ) -> Result<Self, ConfigError> {
        let secret_key_hex = required("secret_key", secret_key_hex)?;
        let recipient = required("recipient", recipient)?;

        let recipient = PublicKeyId::parse(&recipient).map_err(|source| {
            ConfigError::InvalidKey {
                field: "recipient",
                source,
            }
        })?;

        crate::crypto::keys::normalize_key(&secret_key_hex, fallback).map_err(|source| {
            ConfigError::InvalidKey {
                field: "secret_key",
                source,
            }
        })?;

        Ok(Self {
            secret_key_hex: Zeroizing::new(secret_key_hex),
            recipient,
            sender: None,
            fallback,
        })
    }

    /// Pins the `from` identifier. When absent, the public key derived from
    /// the secret key is used.
    pub fn with_sender(mut self, sender: &str) -> Result<Self, ConfigError> {
        let sender = required("sender", sender)?;
        let sender = PublicKeyId::parse(&sender).map_err(|source| ConfigError::InvalidKey {
            field: "sender",
            source,
        })?;
        self.sender = Some(sender);
        Ok(self)
    }

    /// Hex text of the secret key. Decode it with
    /// [`normalize_key`](crate::crypto::keys::normalize_key) only when needed.
    pub fn secret_key_hex(&self) -> &str {
        &self.secret_key_hex
    }

    /// The validated recipient.
    pub fn recipient(&self) -> &PublicKeyId {
        &self.recipient
    }

    /// The pinned sender, if any.
    pub fn sender(&self) -> Option<&PublicKeyId> {
        self.sender.as_ref()
    }

    /// The configured malformed-key policy.
    pub fn fallback(&self) -> KeyFallback {
        self.fallback
    }
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig")
            .field("secret_key_hex", &"[REDACTED]")
            .field("recipient", &self.recipient)
            .field("sender", &self.sender)
            .field("fallback", &self.fallback)
            .finish()
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    Ok(trimmed.to_string())
}
