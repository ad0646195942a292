// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # canonsig Wallet
//!
//! Entry point for the `canonsig-wallet` binary. Parses CLI arguments,
//! initializes logging, and runs one of four subcommands:
//!
//! - `sign`: build and sign a transfer, write the signed document
//! - `verify`: check a signed document against its sender or a given key
//! - `canonical`: print the exact bytes a signature covers
//! - `pubkey`: print the public key of a secret key
//!
//! Results go to stdout. Logs go to stderr. Any failure, including a rejected
//! signature, exits non-zero.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

use canonsig_protocol::config::{SignerConfig, SIGNING_ALGORITHM};
use canonsig_protocol::crypto::keys::{normalize_key, KeyFallback, PublicKeyId};
use canonsig_protocol::transaction::{
    check_transaction, check_transaction_from_sender, sign_with_config, SignedTransaction,
    Transaction,
};

use cli::{CanonicalArgs, Commands, KeyArgs, PubkeyArgs, SignArgs, VerifyArgs, WalletCli};

fn main() -> Result<()> {
    let cli = WalletCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, cli.log_format);

    match cli.command {
        Commands::Sign(args) => {
            let out = args.out.clone();
            let document = sign(args)?;
            match out {
                Some(path) => {
                    fs::write(&path, format!("{}\n", document)).with_context(|| {
                        format!("failed to write signed transaction to {}", path.display())
                    })?;
                    tracing::info!(path = %path.display(), "signed transaction written");
                }
                None => println!("{}", document),
            }
            Ok(())
        }
        Commands::Verify(args) => {
            let sender = verify(&args)?;
            println!("OK: signature valid for {}", sender);
            Ok(())
        }
        Commands::Canonical(args) => {
            println!("{}", canonical(&args)?);
            Ok(())
        }
        Commands::Pubkey(args) => {
            println!("{}", pubkey(args)?);
            Ok(())
        }
    }
}

fn fallback_policy(key: &KeyArgs) -> KeyFallback {
    if key.allow_seed_fallback {
        KeyFallback::SeedPrefix
    } else {
        KeyFallback::Reject
    }
}

/// Signs the requested transfer and returns the pretty-printed document.
fn sign(args: SignArgs) -> Result<String> {
    let fallback = fallback_policy(&args.key);
    let secret = Zeroizing::new(args.key.secret_key);

    let mut config =
        SignerConfig::new(&secret, &args.to, fallback).context("invalid signer configuration")?;
    if let Some(from) = args.from.as_deref() {
        config = config
            .with_sender(from)
            .context("invalid sender public key")?;
    }

    let signed = sign_with_config(&config, args.amount, args.nonce)
        .context("failed to normalize the secret key")?;

    tracing::info!(
        algorithm = SIGNING_ALGORITHM,
        canonical = %signed.transaction().canonical_bytes(),
        sig = %signed.signature().to_base64(),
        "transaction signed"
    );

    signed
        .to_json_pretty()
        .context("failed to serialize signed transaction")
}

/// Verifies a signed document and returns the identifier it verified against.
fn verify(args: &VerifyArgs) -> Result<String> {
    let signed = read_signed(&args.path)?;

    match args.public_key.as_deref() {
        Some(key) => {
            let id = PublicKeyId::parse(key).context("invalid --public-key")?;
            check_transaction(&signed, id.public_key()).context("signature rejected")?;
            Ok(id.to_hex())
        }
        None => {
            check_transaction_from_sender(&signed).context("signature rejected")?;
            Ok(signed.transaction().sender().to_string())
        }
    }
}

/// Canonical bytes of the transaction in a document, as text.
fn canonical(args: &CanonicalArgs) -> Result<String> {
    let text = read_text(&args.path)?;
    let tx = Transaction::from_json(&text)
        .with_context(|| format!("{} is not a transaction document", args.path.display()))?;
    Ok(tx.canonical_bytes().as_str().to_string())
}

/// Public key of the given secret key, in hex and base58.
fn pubkey(args: PubkeyArgs) -> Result<String> {
    let fallback = fallback_policy(&args.key);
    let secret = Zeroizing::new(args.key.secret_key);
    let keypair = normalize_key(&secret, fallback).context("failed to normalize the secret key")?;
    let public_key = keypair.public_key();
    Ok(format!(
        "hex:    {}\nbase58: {}",
        public_key.to_hex(),
        public_key.to_base58()
    ))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_signed(path: &Path) -> Result<SignedTransaction> {
    let text = read_text(path)?;
    SignedTransaction::from_json(&text)
        .with_context(|| format!("{} is not a signed transaction document", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RECIPIENT: &str = "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c";
    const CONFIG_SIG: &str =
        "Xs/Ai1QBIS8Xd+ZgxlOx8lITMRnigy/43lKx+r9lF/KDBEQotBXCtDrUda9G7mdtbl3UiAv7Gg4yDzXynup7Dw==";

    fn key_args(secret_key: &str) -> KeyArgs {
        KeyArgs {
            secret_key: secret_key.to_string(),
            allow_seed_fallback: false,
        }
    }

    fn sign_args(secret_key: &str) -> SignArgs {
        SignArgs {
            key: key_args(secret_key),
            to: RECIPIENT.to_string(),
            amount: 1000,
            nonce: 7,
            from: None,
            out: None,
        }
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn verify_args(path: PathBuf, public_key: Option<&str>) -> VerifyArgs {
        VerifyArgs {
            path,
            public_key: public_key.map(str::to_string),
        }
    }

    #[test]
    fn sign_produces_expected_document() {
        let document = sign(sign_args(SEED)).unwrap();
        let signed = SignedTransaction::from_json(&document).unwrap();
        assert_eq!(signed.transaction().sender(), PUBLIC);
        assert_eq!(signed.transaction().recipient(), RECIPIENT);
        assert_eq!(signed.signature().to_base64(), CONFIG_SIG);
        assert!(document.starts_with("{\n  \"from\": "));
    }

    #[test]
    fn sign_rejects_blank_key() {
        let err = sign(sign_args("   ")).unwrap_err();
        assert!(format!("{:#}", err).contains("secret_key"));
    }

    #[test]
    fn sign_error_never_echoes_key() {
        let bad = format!("{}zz", &SEED[..62]);
        let err = sign(sign_args(&bad)).unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(!rendered.contains(&SEED[..16]));
    }

    #[test]
    fn signed_document_round_trips_through_verify() {
        let document = sign(sign_args(SEED)).unwrap();
        let file = write_temp(&document);

        let by_sender = verify(&verify_args(file.path().to_path_buf(), None)).unwrap();
        assert_eq!(by_sender, PUBLIC);

        let by_key = verify(&verify_args(file.path().to_path_buf(), Some(PUBLIC))).unwrap();
        assert_eq!(by_key, PUBLIC);
    }

    #[test]
    fn verify_rejects_wrong_key_and_tampering() {
        let document = sign(sign_args(SEED)).unwrap();
        let file = write_temp(&document);
        assert!(verify(&verify_args(file.path().to_path_buf(), Some(RECIPIENT))).is_err());

        let tampered = write_temp(&document.replace("\"amount\": 1000", "\"amount\": 1001"));
        let err = verify(&verify_args(tampered.path().to_path_buf(), None)).unwrap_err();
        assert!(format!("{}", err).contains("signature rejected"));
    }

    #[test]
    fn verify_reports_missing_file() {
        let err = verify(&verify_args(PathBuf::from("/nonexistent/tx.json"), None)).unwrap_err();
        assert!(format!("{}", err).contains("failed to read"));
    }

    #[test]
    fn canonical_drops_extra_fields() {
        let file = write_temp(
            r#"{"nonce":1,"memo":"x","amount":100,"to":"bb","from":"aa","sig":"ignored"}"#,
        );
        let out = canonical(&CanonicalArgs {
            path: file.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(out, r#"{"from":"aa","to":"bb","amount":100,"nonce":1}"#);
    }

    #[test]
    fn pubkey_prints_hex_and_base58() {
        let out = pubkey(PubkeyArgs {
            key: key_args(&format!("0x{}", SEED)),
        })
        .unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next().unwrap(), format!("hex:    {}", PUBLIC));
        let base58 = lines.next().unwrap().trim_start_matches("base58: ");
        assert!(!base58.is_empty());
        assert!(base58.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn pubkey_fallback_is_opt_in() {
        let malformed = format!("{}{}", SEED, RECIPIENT);
        assert!(pubkey(PubkeyArgs {
            key: key_args(&malformed),
        })
        .is_err());

        let out = pubkey(PubkeyArgs {
            key: KeyArgs {
                secret_key: malformed,
                allow_seed_fallback: true,
            },
        })
        .unwrap();
        assert!(out.contains(PUBLIC));
    }
}
