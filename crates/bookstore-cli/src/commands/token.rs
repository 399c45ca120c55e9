//! Token management commands.
//!
//! `bookstore token mint` - Mint an access token for a subject.
//! `bookstore token inspect` - Inspect a token's contents.
//! `bookstore token verify` - Verify a token is valid.

use anyhow::Context;
use bookstore_token::keys::{load_public_key_file, load_public_key_hex};
use bookstore_token::{
    ClaimSet, Identity, KeyMaterial, PublicKey, TokenIssuer, TokenValidator, inspect_unverified,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolve a private key from either a file path or a hex-encoded string.
///
/// The key string can be:
/// - A path to a file containing a hex-encoded private key
/// - A hex-encoded private key directly (e.g., from BOOKSTORE_PRIVATE_KEY env var)
fn resolve_private_key(key: Option<String>) -> anyhow::Result<KeyMaterial> {
    let key_str = key.context(
        "Private key not provided. Either pass --key <path> or set BOOKSTORE_PRIVATE_KEY env var",
    )?;

    let path = Path::new(&key_str);
    if path.exists() {
        return KeyMaterial::load_from_file(path)
            .with_context(|| format!("Failed to load private key from file: {}", path.display()));
    }

    KeyMaterial::from_private_key_hex(key_str.trim())
        .context("Failed to parse private key. Expected hex-encoded Ed25519 private key")
}

/// Resolve a public key from either a file path or a hex-encoded string.
fn resolve_public_key(key: Option<String>) -> anyhow::Result<PublicKey> {
    let key_str = key.context(
        "Public key not provided. Either pass --key <path> or set BOOKSTORE_PUBLIC_KEY env var",
    )?;

    let path = Path::new(&key_str);
    if path.exists() {
        return load_public_key_file(path)
            .with_context(|| format!("Failed to load public key from file: {}", path.display()));
    }

    load_public_key_hex(key_str.trim())
        .context("Failed to parse public key. Expected hex-encoded Ed25519 public key")
}

/// Read a token given inline or as a path to a file holding it.
fn read_token(token: String) -> anyhow::Result<String> {
    if Path::new(&token).exists() {
        let content = fs::read_to_string(&token)
            .with_context(|| format!("Failed to read token file: {}", token))?;
        return Ok(content.trim().to_string());
    }
    Ok(token.trim().to_string())
}

/// Parse `name=value` custom claim arguments.
fn parse_claims(claims: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    claims
        .iter()
        .map(|claim| {
            let (name, value) = claim
                .split_once('=')
                .with_context(|| format!("Invalid claim '{}': expected name=value", claim))?;
            let name = name.trim();
            anyhow::ensure!(!name.is_empty(), "Invalid claim '{}': empty name", claim);
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Arguments of `token mint`.
#[derive(Debug)]
pub struct MintArgs {
    pub private_key: Option<String>,
    pub subject: String,
    pub roles: Vec<String>,
    pub claims: Vec<String>,
    pub lifetime: String,
    pub output: Option<PathBuf>,
}

/// Mint a new access token.
pub fn mint(args: MintArgs) -> anyhow::Result<()> {
    let keys = resolve_private_key(args.private_key)?;
    let lifetime = humantime::parse_duration(args.lifetime.trim())
        .with_context(|| format!("Invalid lifetime '{}'", args.lifetime))?;
    let issuer = TokenIssuer::new(Arc::new(keys), lifetime)?;

    let identity = Identity::new(args.subject.trim())
        .with_roles(args.roles.iter().map(|r| r.trim()))
        .with_claims(parse_claims(&args.claims)?);
    let issued = issuer.issue(identity).context("Failed to mint token")?;

    if let Some(output_path) = args.output {
        fs::write(&output_path, issued.token.as_str())
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        println!("✔ Token written to: {}", output_path.display());
        print_claims(&issued.claims);
    } else {
        println!("{}", issued.token);
    }

    Ok(())
}

/// Inspect a token without verification.
pub fn inspect(token: String) -> anyhow::Result<()> {
    let token_str = read_token(token)?;
    let info = inspect_unverified(&token_str)?;

    println!("Token Information (unverified):");
    println!("  Algorithm: {}", info.algorithm);
    println!();
    println!("{}", serde_json::to_string_pretty(&info.payload)?);

    Ok(())
}

/// Verify a token is valid and return its claims.
pub fn verify(public_key: Option<String>, token: String) -> anyhow::Result<ClaimSet> {
    let public_key = resolve_public_key(public_key)?;
    let validator = TokenValidator::new(public_key);
    let token_str = read_token(token)?;

    let claims = validator
        .validate(&token_str)
        .context("✖ Token verification failed")?;

    println!("✔ Token is valid");
    println!();
    print_claims(&claims);
    Ok(claims)
}

fn print_claims(claims: &ClaimSet) {
    let roles: Vec<&str> = claims.roles().iter().map(String::as_str).collect();
    println!("Token Details:");
    println!("  Subject: {}", claims.subject());
    println!("  Roles: {}", roles.join(", "));
    println!("  Issued: {}", claims.issued_at().to_rfc3339());
    println!("  Expires: {}", claims.expires_at().to_rfc3339());
    for (name, value) in claims.custom_claims() {
        println!("  {}: {}", name, value);
    }
}
