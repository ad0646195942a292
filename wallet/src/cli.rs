//! # CLI Interface
//!
//! Command-line structure for `canonsig-wallet`, built with `clap` derive.
//! Secret and address arguments can also come from the environment so keys
//! never need to appear in shell history.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Sign and verify canonical transfer records with Ed25519.
#[derive(Parser, Debug)]
#[command(
    name = "canonsig-wallet",
    about = "Sign and verify canonical transfer records",
    version,
    propagate_version = true
)]
pub struct WalletCli {
    /// Log output format. Logs go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build, sign and write a SignedTransaction document.
    Sign(SignArgs),
    /// Check the signature of a SignedTransaction document.
    Verify(VerifyArgs),
    /// Print the canonical bytes of a transaction document.
    Canonical(CanonicalArgs),
    /// Print the public key derived from a secret key.
    Pubkey(PubkeyArgs),
}

/// Where the secret key comes from, shared by `sign` and `pubkey`.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex secret key: a 32-byte seed or a 64-byte `seed || public key`.
    /// An optional `0x` prefix is accepted.
    #[arg(long = "key", env = "SENDER_PRIVATE_HEX", hide_env_values = true)]
    pub secret_key: String,

    /// When a 64-byte key's public half does not match its seed, derive a
    /// new keypair from the first 32 bytes instead of failing.
    #[arg(long)]
    pub allow_seed_fallback: bool,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Recipient public key, 64 hex characters.
    #[arg(long, env = "RECIPIENT_PUBLIC_HEX")]
    pub to: String,

    /// Amount in the smallest unit.
    #[arg(long)]
    pub amount: u64,

    /// Sender sequence number.
    #[arg(long)]
    pub nonce: u64,

    /// Sender public key. Defaults to the key derived from `--key`.
    #[arg(long, env = "SENDER_PUBLIC_HEX")]
    pub from: Option<String>,

    /// Write the signed document here instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to a SignedTransaction JSON document.
    pub path: PathBuf,

    /// Verify against this public key instead of the document's `from` field.
    #[arg(long)]
    pub public_key: Option<String>,
}

#[derive(Args, Debug)]
pub struct CanonicalArgs {
    /// Path to a transaction JSON document. Extra fields, `sig` included, are
    /// ignored.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct PubkeyArgs {
    #[command(flatten)]
    pub key: KeyArgs,
}
