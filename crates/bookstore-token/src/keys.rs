//! Key material for signing and verifying access tokens.

use crate::error::SigningError;
use bookstore_core::KeyConfig;
use ed25519_dalek::{PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SigningKey, VerifyingKey};
use rand::RngCore;
use std::fmt;
use std::path::Path;

/// An Ed25519 key pair, loaded once and shared read-only (usually behind an
/// `Arc`) by every token operation.
///
/// The private half has no public accessor: only the issuer in this crate
/// signs with it, and `save_to_files` writes it out for provisioning.
pub struct KeyMaterial {
    signing: SigningKey,
    verifying: VerifyingKey,
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("public_key", &self.public_key_hex())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl KeyMaterial {
    /// Generate a new random key pair.
    pub fn generate() -> Result<Self, SigningError> {
        let mut rng = rand::rng();
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        rng.fill_bytes(&mut bytes);

        Self::from_private_key_bytes(&bytes)
    }

    /// Load a key pair from the 32-byte private key seed.
    pub fn from_private_key_bytes(bytes: &[u8]) -> Result<Self, SigningError> {
        let seed: [u8; SECRET_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            SigningError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        let signing = SigningKey::from_bytes(&seed);
        let verifying = signing.verifying_key();
        Ok(Self { signing, verifying })
    }

    /// Load a key pair from a hex-encoded private key string.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, SigningError> {
        let bytes =
            hex::decode(hex.trim()).map_err(|e| SigningError::InvalidPrivateKey(e.to_string()))?;
        Self::from_private_key_bytes(&bytes)
    }

    /// Load a key pair and check it against an expected public key.
    pub fn from_pair_hex(private_hex: &str, public_hex: &str) -> Result<Self, SigningError> {
        let keys = Self::from_private_key_hex(private_hex)?;
        let expected = load_public_key_hex(public_hex)?;
        if keys.verifying != expected {
            return Err(SigningError::KeyMismatch);
        }
        Ok(keys)
    }

    /// Load the key pair described by configuration.
    ///
    /// A missing private key is an error: the process would not be able to
    /// issue tokens.
    pub fn from_config(config: &KeyConfig) -> Result<Self, SigningError> {
        let private_hex = config.resolve_private_key()?.ok_or_else(|| {
            SigningError::KeyUnavailable(
                "set the private key environment variable or keys.private_key_file".to_string(),
            )
        })?;

        let keys = match config.resolve_public_key()? {
            Some(public_hex) => Self::from_pair_hex(&private_hex, &public_hex)?,
            None => Self::from_private_key_hex(&private_hex)?,
        };

        tracing::info!(public_key = %keys.public_key_hex(), "loaded signing key");
        Ok(keys)
    }

    /// Load a key pair from a private key file.
    pub fn load_from_file(private_key_path: &Path) -> Result<Self, SigningError> {
        let hex = std::fs::read_to_string(private_key_path)?;
        Self::from_private_key_hex(hex.trim())
    }

    /// Save the key pair to files.
    pub fn save_to_files(
        &self,
        private_key_path: &Path,
        public_key_path: &Path,
    ) -> Result<(), SigningError> {
        std::fs::write(private_key_path, hex::encode(self.signing.to_bytes()))?;
        std::fs::write(public_key_path, self.public_key_hex())?;
        Ok(())
    }

    /// Get the public key.
    pub fn public_key(&self) -> VerifyingKey {
        self.verifying
    }

    /// Get the public key as hex string.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying.to_bytes())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing
    }
}

/// Load a public key from hex string (for verification-only scenarios).
pub fn load_public_key_hex(hex: &str) -> Result<VerifyingKey, SigningError> {
    let bytes =
        hex::decode(hex.trim()).map_err(|e| SigningError::InvalidPublicKey(e.to_string()))?;
    let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
        SigningError::InvalidPublicKey(format!(
            "expected {} bytes, got {}",
            PUBLIC_KEY_LENGTH,
            bytes.len()
        ))
    })?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| SigningError::InvalidPublicKey(e.to_string()))
}

/// Load a public key from a file.
pub fn load_public_key_file(path: &Path) -> Result<VerifyingKey, SigningError> {
    let hex = std::fs::read_to_string(path)?;
    load_public_key_hex(hex.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_keypair_generation() {
        let keys = KeyMaterial::generate().unwrap();
        assert_eq!(keys.public_key_hex().len(), 64);
    }

    #[test]
    fn test_keypair_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let private_path = dir.path().join("private.key");
        let public_path = dir.path().join("public.key");

        let keys = KeyMaterial::generate().unwrap();
        keys.save_to_files(&private_path, &public_path).unwrap();

        let loaded = KeyMaterial::load_from_file(&private_path).unwrap();
        assert_eq!(keys.public_key_hex(), loaded.public_key_hex());

        let public = load_public_key_file(&public_path).unwrap();
        assert_eq!(public, keys.public_key());
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let a = KeyMaterial::generate().unwrap();
        let b = KeyMaterial::generate().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let private_path = dir.path().join("private.key");
        a.save_to_files(&private_path, &dir.path().join("public.key"))
            .unwrap();
        let private_hex = std::fs::read_to_string(&private_path).unwrap();

        let result = KeyMaterial::from_pair_hex(&private_hex, &b.public_key_hex());
        assert!(matches!(result, Err(SigningError::KeyMismatch)));

        let ok = KeyMaterial::from_pair_hex(&private_hex, &a.public_key_hex()).unwrap();
        assert_eq!(ok.public_key(), a.public_key());
    }

    #[test]
    fn test_private_key_file_with_trailing_newline() {
        let keys = KeyMaterial::generate().unwrap();
        let dir = tempfile::tempdir().unwrap();
        keys.save_to_files(&dir.path().join("k"), &dir.path().join("k.pub"))
            .unwrap();
        let private_hex = std::fs::read_to_string(dir.path().join("k")).unwrap();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", private_hex).unwrap();

        let loaded = KeyMaterial::load_from_file(file.path()).unwrap();
        assert_eq!(keys.public_key_hex(), loaded.public_key_hex());
    }

    #[test]
    fn test_bad_private_key_hex() {
        assert!(matches!(
            KeyMaterial::from_private_key_hex("not hex"),
            Err(SigningError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            KeyMaterial::from_private_key_hex("abcd"),
            Err(SigningError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_missing_key_config_is_unavailable() {
        let config = KeyConfig {
            public_key_env: None,
            public_key_file: None,
            private_key_env: None,
            private_key_file: None,
        };
        assert!(matches!(
            KeyMaterial::from_config(&config),
            Err(SigningError::KeyUnavailable(_))
        ));
    }

    #[test]
    fn test_key_config_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let private_path = dir.path().join("private.key");
        let public_path = dir.path().join("public.key");
        let keys = KeyMaterial::generate().unwrap();
        keys.save_to_files(&private_path, &public_path).unwrap();

        let config = KeyConfig {
            public_key_env: None,
            public_key_file: Some(public_path),
            private_key_env: None,
            private_key_file: Some(private_path),
        };
        let loaded = KeyMaterial::from_config(&config).unwrap();
        assert_eq!(loaded.public_key(), keys.public_key());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let keys = KeyMaterial::generate().unwrap();
        let debug = format!("{:?}", keys);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&hex::encode(keys.signing_key().to_bytes())));
    }
}
