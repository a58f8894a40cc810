//! # Check Subcommand
//!
//! Offline validation of single values:
//!
//! ```text
//! pix check document 123.456.789-01
//! pix check email someone@email.com
//! pix check pix-key --type phone 5511999999999
//! ```

use anyhow::Context;
use clap::{Args, Subcommand};

use pix_core::{Document, Email, PixKey, ValidationError};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(subcommand)]
    pub target: CheckTarget,
}

/// The value to check.
#[derive(Subcommand, Debug)]
pub enum CheckTarget {
    /// A CPF or CNPJ.
    Document { raw: String },
    /// An email address.
    Email { raw: String },
    /// A PIX key of the given type.
    PixKey {
        /// cnpj, cpf, email, phone or random (case-insensitive).
        #[arg(long = "type")]
        key_type: String,
        value: String,
    },
}

/// Classify a value, returning a one-line description on success.
pub fn check(target: &CheckTarget) -> Result<String, ValidationError> {
    match target {
        CheckTarget::Document { raw } => {
            let document = Document::new(raw.as_str())?;
            Ok(format!("{} {document}", document.kind_name()))
        }
        CheckTarget::Email { raw } => {
            let email = Email::new(raw.as_str())?;
            Ok(format!("email {email}"))
        }
        CheckTarget::PixKey { key_type, value } => {
            let key = PixKey::new(value.as_str(), key_type)?;
            Ok(format!("pix key {key}"))
        }
    }
}

/// Run the check subcommand, printing the classification.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<()> {
    let summary = check(&args.target).context("check failed")?;
    println!("ok: {summary}");
    Ok(())
}
