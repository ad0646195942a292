//! Transaction signing.
//!
//! The signature covers [`Transaction::canonical_bytes`] and nothing else.
//! Signing consumes the unsigned transaction and returns a new
//! [`SignedTransaction`]; there is no way to attach a signature afterwards.

use super::types::{SignedTransaction, Transaction};
use crate::config::SignerConfig;
use crate::crypto::keys::{normalize_key, KeyError, Keypair, PublicKeyId};

/// Sign `tx` with `keypair`.
///
/// The caller is responsible for `keypair` actually belonging to
/// `tx.sender()`; a mismatch produces a signature nobody will accept.
///
/// ```
/// use canonsig_protocol::crypto::Keypair;
/// use canonsig_protocol::transaction::{sign_transaction, Transaction};
///
/// let kp = Keypair::from_seed(&[7u8; 32]);
/// let from = kp.public_key().to_hex();
/// let signed = sign_transaction(Transaction::new(from, "bb", 10, 1), &kp);
/// assert!(signed.verify_with(&kp.public_key()));
/// ```
pub fn sign_transaction(tx: Transaction, keypair: &Keypair) -> SignedTransaction {
    let canonical = tx.canonical_bytes();
    let sig = keypair.sign(canonical.as_bytes());
    tracing::debug!(
        from = %tx.sender(),
        to = %tx.recipient(),
        nonce = tx.nonce(),
        "signed transaction"
    );
    SignedTransaction::new(tx, sig)
}

/// Build and sign a transfer described by `config`.
///
/// The secret key is decoded for the duration of this call only. When the
/// config pins a sender that differs from the key's own public key, the
/// transaction is still signed as asked, but a warning is logged because the
/// result will not verify against `from`.
pub fn sign_with_config(
    config: &SignerConfig,
    amount: u64,
    nonce: u64,
) -> Result<SignedTransaction, KeyError> {
    let keypair = normalize_key(config.secret_key_hex(), config.fallback())?;
    let derived = PublicKeyId::from(keypair.public_key());

    let from = match config.sender() {
        Some(pinned) => {
            if pinned != &derived {
                tracing::warn!(
                    pinned = %pinned,
                    derived = %derived,
                    "configured sender does not match the signing key"
                );
            }
            pinned.to_hex()
        }
        None => derived.to_hex(),
    };

    let tx = Transaction::new(from, config.recipient().to_hex(), amount, nonce);
    Ok(sign_transaction(tx, &keypair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyFallback;

    const RFC_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RECIPIENT: &str = "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c";
    const GOLDEN_SIG: &str =
        "mekiIsfxBG2vvheZPbw/J++SZBeR3eMTJvADKy+qJM3c9dwJlxuvWv+syPEH2NHQrCPruRs2TrgOkTlBdLYDBg==";

    fn rfc_keypair() -> Keypair {
        normalize_key(RFC_SEED, KeyFallback::Reject).unwrap()
    }

    #[test]
    fn golden_signature() {
        let signed = sign_transaction(Transaction::new("aa", "bb", 100, 1), &rfc_keypair());
        assert_eq!(signed.signature().to_base64(), GOLDEN_SIG);
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = rfc_keypair();
        let a = sign_transaction(Transaction::new("aa", "bb", 100, 1), &kp);
        let b = sign_transaction(Transaction::new("aa", "bb", 100, 1), &kp);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn different_keypairs_produce_different_signatures() {
        let a = sign_transaction(Transaction::new("aa", "bb", 100, 1), &rfc_keypair());
        let b = sign_transaction(
            Transaction::new("aa", "bb", 100, 1),
            &Keypair::from_seed(&[3u8; 32]),
        );
        assert_ne!(a.signature(), b.signature());
    }

    #[test]
    fn signature_covers_only_canonical_bytes() {
        let kp = rfc_keypair();
        let tx = Transaction::new("aa", "bb", 100, 1);
        let direct = kp.sign(tx.canonical_bytes().as_bytes());
        let signed = sign_transaction(tx, &kp);
        assert_eq!(signed.signature(), &direct);
    }

    #[test]
    fn config_defaults_sender_to_derived_key() {
        let config = SignerConfig::new(RFC_SEED, RECIPIENT, KeyFallback::Reject).unwrap();
        let signed = sign_with_config(&config, 1000, 7).unwrap();
        assert_eq!(signed.transaction().sender(), RFC_PUBLIC);
        assert_eq!(signed.transaction().recipient(), RECIPIENT);
        assert_eq!(
            signed.signature().to_base64(),
            "Xs/Ai1QBIS8Xd+ZgxlOx8lITMRnigy/43lKx+r9lF/KDBEQotBXCtDrUda9G7mdtbl3UiAv7Gg4yDzXynup7Dw=="
        );
    }

    #[test]
    fn config_pinned_sender_is_used_verbatim() {
        let config = SignerConfig::new(RFC_SEED, RECIPIENT, KeyFallback::Reject)
            .unwrap()
            .with_sender(RECIPIENT)
            .unwrap();
        let signed = sign_with_config(&config, 1, 1).unwrap();
        assert_eq!(signed.transaction().sender(), RECIPIENT);
        // Signed by RFC_SEED, so it does not verify against the pinned sender.
        assert!(!crate::transaction::verify_transaction_from_sender(&signed));
    }
}
