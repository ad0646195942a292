//! # Digital Signatures
//!
//! Ed25519 signing and verification over arbitrary message bytes.
//!
//! [`verify`] is the function almost everyone should call. It takes the
//! public key and signature as plain byte slices, exactly as they come off
//! disk or out of a decoder, and answers yes or no. Anything structurally
//! wrong (a 31-byte key, a 65-byte signature, a key that is not a curve
//! point) is a "no". There is no error for a careless caller to swallow.
//!
//! [`verify_raw`] is the diagnostic variant for tooling that wants to tell
//! the user *why* a check failed.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use thiserror::Error;

use super::keys::{Keypair, PublicKey, TxSignature};
use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Reasons a signature check or signature decode can fail.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid signature length: expected 64 bytes, got {actual}")]
    InvalidSignatureLength { actual: usize },

    #[error("invalid signature encoding: expected base64")]
    InvalidSignatureEncoding,

    #[error("invalid public key: expected a 32-byte Ed25519 point")]
    InvalidPublicKey,
}

/// Sign `message` with `keypair`.
///
/// Deterministic (RFC 8032): the same key and message always give the same
/// 64 bytes.
///
/// ```
/// use canonsig_protocol::crypto::{normalize_key, sign, verify, KeyFallback};
///
/// let kp = normalize_key(&"11".repeat(32), KeyFallback::Reject).unwrap();
/// let sig = sign(&kp, b"hello");
/// assert!(verify(kp.public_key().as_bytes(), b"hello", sig.as_bytes()));
/// ```
pub fn sign(keypair: &Keypair, message: &[u8]) -> TxSignature {
    keypair.sign(message)
}

/// Check a detached signature. Fails closed.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(public_key) = <&[u8; PUBLIC_KEY_LENGTH]>::try_from(public_key) else {
        return false;
    };
    let Ok(signature) = <&[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
        return false;
    };
    verify_raw(public_key, message, signature).is_ok()
}

/// Typed-key variant of [`verify`].
pub fn verify_with(public_key: &PublicKey, message: &[u8], signature: &TxSignature) -> bool {
    public_key.verify(message, signature)
}

/// Check a detached signature and report why it failed.
pub fn verify_raw(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    message: &[u8],
    signature: &[u8; SIGNATURE_LENGTH],
) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key).map_err(|_| SignatureError::InvalidPublicKey)?;

    let signature = DalekSignature::from_bytes(signature);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{normalize_key, KeyFallback};

    const RFC_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC_EMPTY_SIG: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    fn rfc_keypair() -> Keypair {
        normalize_key(RFC_SEED, KeyFallback::Reject).unwrap()
    }

    #[test]
    fn rfc8032_test_1_vector() {
        let kp = rfc_keypair();
        let sig = sign(&kp, b"");
        assert_eq!(sig.to_hex(), RFC_EMPTY_SIG);
        assert!(verify(kp.public_key().as_bytes(), b"", sig.as_bytes()));
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = rfc_keypair();
        let msg = b"hello, world";
        let sig = sign(&kp, msg);
        assert!(verify(kp.public_key().as_bytes(), msg, sig.as_bytes()));
        assert!(verify_with(&kp.public_key(), msg, &sig));
    }

    #[test]
    fn test_wrong_message_fails() {
        let kp = rfc_keypair();
        let sig = sign(&kp, b"correct message");
        assert!(!verify(kp.public_key().as_bytes(), b"wrong message", sig.as_bytes()));
    }

    #[test]
    fn test_wrong_key_fails() {
        let kp1 = rfc_keypair();
        let kp2 = Keypair::from_seed(&[9u8; 32]);
        let sig = sign(&kp1, b"test message");
        assert!(!verify(kp2.public_key().as_bytes(), b"test message", sig.as_bytes()));
    }

    #[test]
    fn test_deterministic_signatures() {
        let kp = rfc_keypair();
        assert_eq!(sign(&kp, b"same"), sign(&kp, b"same"));
    }

    #[test]
    fn every_single_bit_flip_of_the_signature_is_rejected() {
        let kp = rfc_keypair();
        let msg = b"flip me";
        let sig = sign(&kp, msg);
        let pk = kp.public_key();
        for byte in 0..SIGNATURE_LENGTH {
            for bit in 0..8 {
                let mut bad = *sig.as_bytes();
                bad[byte] ^= 1 << bit;
                assert!(
                    !verify(pk.as_bytes(), msg, &bad),
                    "flip of byte {} bit {} was accepted",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn every_single_bit_flip_of_the_message_is_rejected() {
        let kp = rfc_keypair();
        let msg = b"{\"from\":\"aa\",\"to\":\"bb\",\"amount\":100,\"nonce\":1}".to_vec();
        let sig = sign(&kp, &msg);
        let pk = kp.public_key();
        for byte in 0..msg.len() {
            for bit in 0..8 {
                let mut bad = msg.clone();
                bad[byte] ^= 1 << bit;
                assert!(!verify(pk.as_bytes(), &bad, sig.as_bytes()));
            }
        }
    }

    #[test]
    fn structural_anomalies_fail_closed() {
        let kp = rfc_keypair();
        let msg = b"anything";
        let sig = sign(&kp, msg);
        let pk = kp.public_key();

        assert!(!verify(&pk.as_bytes()[..31], msg, sig.as_bytes()));
        assert!(!verify(&[], msg, sig.as_bytes()));
        assert!(!verify(pk.as_bytes(), msg, &sig.as_bytes()[..63]));
        let mut long = sig.as_bytes().to_vec();
        long.push(0);
        assert!(!verify(pk.as_bytes(), msg, &long));
        assert!(!verify(pk.as_bytes(), msg, &[]));
    }

    #[test]
    fn verify_raw_reports_non_point_key() {
        let mut not_a_point = [0u8; 32];
        not_a_point[0] = 2;
        let err = verify_raw(&not_a_point, b"m", &[0u8; 64]).unwrap_err();
        assert!(matches!(err, SignatureError::InvalidPublicKey));
        assert!(!verify(&not_a_point, b"m", &[0u8; 64]));
    }

    #[test]
    fn verify_raw_reports_bad_signature() {
        let kp = rfc_keypair();
        let err = verify_raw(kp.public_key().as_bytes(), b"m", &[0u8; 64]).unwrap_err();
        assert!(matches!(err, SignatureError::VerificationFailed));
    }

    #[test]
    fn test_large_message() {
        let kp = rfc_keypair();
        let msg = vec![0xAB; 1_000_000];
        let sig = sign(&kp, &msg);
        assert!(verify(kp.public_key().as_bytes(), &msg, sig.as_bytes()));
    }
}
