//! CLI Module
//!
//! Command-line interface for signing and verifying audio files.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::buffer::ByteOrder;

/// Wavseal - hide Ed25519 signatures in the LSBs of WAV audio
#[derive(Parser, Debug)]
#[command(name = "wavseal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Sample byte that carries the hidden bit: little, big or native
    #[arg(long, global = true)]
    pub byte_order: Option<ByteOrder>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new signing key pair
    #[command(name = "generate-keys")]
    GenerateKeys {
        /// Where to write the private signing key
        #[arg(long)]
        signing_key: Option<PathBuf>,

        /// Where to write the public verifying key
        #[arg(long)]
        verifying_key: Option<PathBuf>,
    },

    /// Print the verifying key as base64 text
    #[command(name = "export-public")]
    ExportPublic {
        /// Verifying key file
        #[arg(long)]
        verifying_key: Option<PathBuf>,
    },

    /// Sign a WAV file by embedding a signature in its samples
    #[command(name = "sign")]
    Sign {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file (defaults to signing in place)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Private signing key file
        #[arg(long)]
        signing_key: Option<PathBuf>,
    },

    /// Verify the signature embedded in a WAV file
    #[command(name = "verify")]
    Verify {
        /// Signed WAV file
        input: PathBuf,

        /// Verifying key as base64 text
        #[arg(short, long, conflicts_with = "verifying_key")]
        key: Option<String>,

        /// Verifying key file
        #[arg(long)]
        verifying_key: Option<PathBuf>,
    },

    /// Hide a text message in a WAV file
    #[command(name = "embed")]
    Embed {
        /// Cover WAV file
        input: PathBuf,

        /// Message to hide
        message: String,

        /// Output WAV file (defaults to modifying in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reveal a text message hidden with `embed`
    #[command(name = "extract")]
    Extract {
        /// WAV file carrying a message
        input: PathBuf,
    },
}
