//! # Key Material
//!
//! Turns key text of ambiguous shape into an Ed25519 keypair, and defines the
//! public key and signature types the rest of the crate passes around.
//!
//! Callers hand us hex. After decoding, the length decides what it is:
//!
//! - **32 bytes**: a seed. Expanded with the standard Ed25519 derivation.
//! - **64 bytes**: an expanded secret key, `seed || public_key`, the layout
//!   NaCl and tweetnacl produce. The trailing public key must match the one
//!   derived from the seed.
//! - anything else: rejected with [`KeyError::InvalidKeyLength`].
//!
//! The decision is made once, at the boundary, and recorded in
//! [`KeyMaterial`]. What happens when a 64-byte key fails its consistency
//! check is a policy ([`KeyFallback`]) chosen by the caller, never a silent
//! downgrade.
//!
//! ## Security considerations
//!
//! - `SigningKey` zeroizes itself on drop (ed25519-dalek's `zeroize`
//!   feature). Decoded buffers are wrapped in [`Zeroizing`].
//! - Key bytes are never logged and never appear in error messages. Public
//!   keys may be logged.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;
use zeroize::Zeroizing;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::signatures::SignatureError;
use crate::config::{
    ACCEPTED_KEY_LENGTHS, EXPANDED_SECRET_KEY_LENGTH, HEX_PREFIX, PUBLIC_KEY_LENGTH, SEED_LENGTH,
    SIGNATURE_LENGTH,
};

/// Errors that can occur while turning key text into usable keys.
///
/// Messages say which rule was broken and what was expected. They never
/// echo key material, not even a single character of it.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error(
        "invalid key length: got {actual} bytes, expected 32 (seed) or 64 (expanded secret key)"
    )]
    InvalidKeyLength { actual: usize, expected: [usize; 2] },

    #[error("key is not valid hex: {0}")]
    KeyDecodeError(String),

    #[error("malformed 64-byte secret key: public half does not match the seed")]
    MalformedSecretKey,

    #[error("invalid public key: {reason}")]
    InvalidPublicKey { reason: String },
}

/// What to do when a 64-byte secret key fails its consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFallback {
    /// Surface [`KeyError::MalformedSecretKey`].
    #[default]
    Reject,
    /// Treat the first 32 bytes as a seed and derive a fresh keypair from
    /// them. The resulting public key will differ from the trailing 32 bytes
    /// the caller supplied, so this is logged at `warn`.
    SeedPrefix,
}

// ---------------------------------------------------------------------------
// KeyMaterial
// ---------------------------------------------------------------------------

/// Decoded secret key material, classified by length.
pub enum KeyMaterial {
    /// A 32-byte Ed25519 seed.
    Seed(Zeroizing<[u8; SEED_LENGTH]>),
    /// A 64-byte `seed || public_key` expanded secret key.
    Expanded(Zeroizing<[u8; EXPANDED_SECRET_KEY_LENGTH]>),
}

impl KeyMaterial {
    /// Decode hex key text. Surrounding whitespace and a leading `0x` are
    /// ignored.
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix(HEX_PREFIX).unwrap_or(trimmed);
        let bytes = Zeroizing::new(hex::decode(digits).map_err(describe_hex_error)?);
        Self::from_bytes(&bytes)
    }

    /// Classify raw key bytes by length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        match bytes.len() {
            SEED_LENGTH => {
                let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
                seed.copy_from_slice(bytes);
                Ok(Self::Seed(seed))
            }
            EXPANDED_SECRET_KEY_LENGTH => {
                let mut expanded = Zeroizing::new([0u8; EXPANDED_SECRET_KEY_LENGTH]);
                expanded.copy_from_slice(bytes);
                Ok(Self::Expanded(expanded))
            }
            actual => Err(KeyError::InvalidKeyLength {
                actual,
                expected: ACCEPTED_KEY_LENGTHS,
            }),
        }
    }

    /// Decoded length in bytes.
    pub fn decoded_len(&self) -> usize {
        match self {
            Self::Seed(_) => SEED_LENGTH,
            Self::Expanded(_) => EXPANDED_SECRET_KEY_LENGTH,
        }
    }

    /// Resolve into a keypair under the given fallback policy.
    pub fn into_keypair(self, fallback: KeyFallback) -> Result<Keypair, KeyError> {
        match self {
            Self::Seed(seed) => Ok(Keypair::from_seed(&seed)),
            Self::Expanded(expanded) => match Keypair::from_expanded(&expanded) {
                Err(KeyError::MalformedSecretKey) if fallback == KeyFallback::SeedPrefix => {
                    let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
                    seed.copy_from_slice(&expanded[..SEED_LENGTH]);
                    let keypair = Keypair::from_seed(&seed);
                    tracing::warn!(
                        public_key = %keypair.public_key(),
                        "64-byte secret key failed its consistency check; \
                         re-derived keypair from its first 32 bytes"
                    );
                    Ok(keypair)
                }
                other => other,
            },
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seed(_) => write!(f, "KeyMaterial::Seed([REDACTED])"),
            Self::Expanded(_) => write!(f, "KeyMaterial::Expanded([REDACTED])"),
        }
    }
}

/// Decode, classify and resolve key text in one step.
///
/// This is the normalizer entry point most callers want.
///
/// ```
/// use canonsig_protocol::crypto::keys::{normalize_key, KeyFallback};
///
/// let kp = normalize_key(
///     "0x9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
///     KeyFallback::Reject,
/// )
/// .unwrap();
/// assert_eq!(
///     kp.public_key().to_hex(),
///     "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
/// );
/// ```
pub fn normalize_key(text: &str, fallback: KeyFallback) -> Result<Keypair, KeyError> {
    KeyMaterial::from_hex(text)?.into_keypair(fallback)
}

fn describe_hex_error(err: hex::FromHexError) -> KeyError {
    let reason = match err {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            format!("non-hex character at position {}", index)
        }
        hex::FromHexError::OddLength => "odd number of hex digits".to_string(),
        hex::FromHexError::InvalidStringLength => "unexpected string length".to_string(),
    };
    KeyError::KeyDecodeError(reason)
}

// ---------------------------------------------------------------------------
// Keypair
// ---------------------------------------------------------------------------

/// A normalized Ed25519 signing keypair.
///
/// Not `Serialize`. Secret material leaves only through
/// [`Keypair::seed_bytes`] or [`Keypair::to_expanded_bytes`].
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Derive a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Build a keypair from a 64-byte `seed || public_key` secret key.
    ///
    /// Fails with [`KeyError::MalformedSecretKey`] when the trailing 32 bytes
    /// are not the public key of the leading 32.
    pub fn from_expanded(bytes: &[u8; EXPANDED_SECRET_KEY_LENGTH]) -> Result<Self, KeyError> {
        let signing_key =
            SigningKey::from_keypair_bytes(bytes).map_err(|_| KeyError::MalformedSecretKey)?;
        Ok(Self { signing_key })
    }

    /// The public half.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// The 32-byte seed. Handle with care.
    pub fn seed_bytes(&self) -> Zeroizing<[u8; SEED_LENGTH]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// The 64-byte `seed || public_key` form. Handle with care.
    pub fn to_expanded_bytes(&self) -> Zeroizing<[u8; EXPANDED_SECRET_KEY_LENGTH]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// Produce a deterministic detached signature over `message`.
    pub fn sign(&self, message: &[u8]) -> TxSignature {
        TxSignature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }

    /// Verify against this keypair's own public key.
    pub fn verify(&self, message: &[u8], signature: &TxSignature) -> bool {
        self.public_key().verify(message, signature)
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.seed_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for Keypair {
    /// Compares public keys only.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Keypair {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A 32-byte Ed25519 public key that decompresses to a curve point.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    /// Validate a byte slice as a public key.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidPublicKey {
                reason: format!("expected {} bytes, got {}", PUBLIC_KEY_LENGTH, slice.len()),
            })?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey {
            reason: "not a valid Ed25519 point".to_string(),
        })?;
        Ok(Self { bytes })
    }

    /// Parse hex text (optional `0x`, case-insensitive).
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix(HEX_PREFIX).unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| KeyError::InvalidPublicKey {
            reason: e.to_string(),
        })?;
        Self::try_from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Base58 rendering, the address form wallets display.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.bytes).into_string()
    }

    /// Check a signature. Fails closed: any malformed input is `false`.
    pub fn verify(&self, message: &[u8], signature: &TxSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// PublicKeyId
// ---------------------------------------------------------------------------

/// The textual identifier of a public key, as it appears in the `from` and
/// `to` fields: lowercase hex of a valid 32-byte Ed25519 point.
///
/// Parsing normalizes case and strips `0x`, so two spellings of the same key
/// produce the same identifier (and thus the same canonical bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKeyId {
    key: PublicKey,
}

impl PublicKeyId {
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        Ok(Self {
            key: PublicKey::from_hex(text)?,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }

    pub fn to_hex(&self) -> String {
        self.key.to_hex()
    }
}

impl From<PublicKey> for PublicKeyId {
    fn from(key: PublicKey) -> Self {
        Self { key }
    }
}

impl fmt::Display for PublicKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl fmt::Debug for PublicKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyId({})", self.key.to_hex())
    }
}

// ---------------------------------------------------------------------------
// TxSignature
// ---------------------------------------------------------------------------

/// A 64-byte detached Ed25519 signature.
///
/// Travels as standard (padded) base64. Serde goes through the same text
/// form, and deserializing rejects anything that is not exactly 64 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TxSignature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl TxSignature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Validate a byte slice as a signature.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, SignatureError> {
        let bytes: [u8; SIGNATURE_LENGTH] =
            slice
                .try_into()
                .map_err(|_| SignatureError::InvalidSignatureLength {
                    actual: slice.len(),
                })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// The transport encoding.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }

    pub fn from_base64(text: &str) -> Result<Self, SignatureError> {
        let bytes = BASE64
            .decode(text.trim())
            .map_err(|_| SignatureError::InvalidSignatureEncoding)?;
        Self::try_from_slice(&bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl fmt::Debug for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "TxSignature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}

impl Serialize for TxSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for TxSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base64(&text).map_err(de::Error::custom)
    }
}
