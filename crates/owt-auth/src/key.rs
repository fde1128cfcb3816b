//! Symmetric signing key
//!
//! Key material is stored as a PEM-style text blob. The `-----BEGIN ...-----`
//! and `-----END ...-----` envelope lines are stripped and the remaining text
//! is used verbatim as the HMAC secret.

use std::path::Path;

use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{OwtError, OwtResult};

/// HMAC-SHA256 secret shared by the issuer and validator
#[derive(Clone)]
pub struct SigningKey {
    secret: SecretString,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl SigningKey {
    /// Derive a key from raw key material
    ///
    /// # Errors
    ///
    /// Returns [`OwtError::KeyMaterial`] if nothing is left once the envelope
    /// lines are removed.
    pub fn from_material(material: &str) -> OwtResult<Self> {
        let body = material
            .lines()
            .filter(|line| !is_envelope_marker(line))
            .collect::<Vec<_>>()
            .join("\n");
        let body = body.trim();

        if body.is_empty() {
            return Err(OwtError::key_material("key material is empty"));
        }

        Ok(Self {
            secret: SecretString::new(body.to_string()),
        })
    }

    /// Read and derive a key from a file
    ///
    /// # Errors
    ///
    /// Returns [`OwtError::KeyMaterial`] if the file cannot be read or holds
    /// no usable material.
    pub fn load(path: impl AsRef<Path>) -> OwtResult<Self> {
        let path = path.as_ref();
        let material = std::fs::read_to_string(path)
            .map_err(|e| OwtError::key_material_at(format!("cannot read key file: {e}"), path))?;

        Self::from_material(&material).map_err(|e| match e {
            OwtError::KeyMaterial { message, .. } => OwtError::key_material_at(message, path),
            other => other,
        })
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }
}

fn is_envelope_marker(line: &str) -> bool {
    let line = line.trim();
    (line.starts_with("-----BEGIN ") || line.starts_with("-----END ")) && line.ends_with("-----")
}
