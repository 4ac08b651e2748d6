//! Operator signing keypair: generation and request signing.
//!
//! The warden itself only verifies; signing lives here for the keygen
//! tool, the client side, and tests.

use crate::{canonical_message, AuthError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use k256::ecdsa::{signature::Signer, Signature, SigningKey};
use zeroize::Zeroize;

/// secp256k1 ECDSA keypair for control-plane authentication.
pub struct AuthKeyPair {
    signing_key: SigningKey,
}

impl AuthKeyPair {
    /// Generate a random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Restore from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, AuthError> {
        let signing_key =
            SigningKey::from_bytes(bytes.into()).map_err(|_| AuthError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Restore from a hex-encoded secret key. Intermediate copies of the
    /// key material are wiped; the key itself zeroizes on drop inside
    /// `k256`.
    pub fn from_hex(hex_key: &str) -> Result<Self, AuthError> {
        let mut raw = hex::decode(hex_key.trim()).map_err(|_| AuthError::InvalidPrivateKey)?;
        let result = <&[u8; 32]>::try_from(raw.as_slice())
            .map_err(|_| AuthError::InvalidPrivateKey)
            .and_then(Self::from_bytes);
        raw.zeroize();
        result
    }

    /// Compressed public key (33 bytes) as lowercase hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_sec1_bytes())
    }

    /// Secret key as lowercase hex (for the keygen tool's output files).
    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Sign a request, producing the `x-auth` header value: a base64
    /// compact signature over the raw SHA-256 digest of the canonical
    /// message. Deterministic per RFC 6979.
    pub fn sign_request(&self, method: &str, path_with_query: &str, body: &[u8]) -> String {
        let message = canonical_message(method, path_with_query, body);
        let signature: Signature = self.signing_key.sign(&message);
        BASE64.encode(signature.to_bytes())
    }
}
