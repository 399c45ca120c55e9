//! Key management commands.
//!
//! `bookstore keys generate` - Generate a new Ed25519 signing key pair.

use anyhow::Context;
use bookstore_token::KeyMaterial;
use std::fs;
use std::path::PathBuf;

/// Generate a new signing key pair.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let keys = KeyMaterial::generate()?;

    let Some(output_dir) = output else {
        // Without an output directory only the public half is shown; the
        // private key never goes to stdout.
        println!("Public key:");
        println!("{}", keys.public_key_hex());
        println!();
        println!("Use --output <dir> to save the key pair to files.");
        return Ok(());
    };

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let private_path = output_dir.join("private.key");
    let public_path = output_dir.join("public.key");
    keys.save_to_files(&private_path, &public_path)
        .context("Failed to write key files")?;

    println!("Wrote {} and {}", private_path.display(), public_path.display());
    println!(
        "The server reads them through keys.private_key_file / keys.public_key_file \
         in bookstore.yaml, or from BOOKSTORE_PRIVATE_KEY / BOOKSTORE_PUBLIC_KEY."
    );
    println!("{} signs tokens and must stay out of version control.", private_path.display());

    Ok(())
}
