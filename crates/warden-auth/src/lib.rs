//! # Request Authentication
//!
//! Signature-based authentication for the control-plane API. Every
//! operator request is signed with a private key held by the operator;
//! the warden verifies against the single public key configured at
//! startup. A forged request could whitelist an attacker, so nothing
//! reaches a handler without passing verification.
//!
//! ## Scheme
//!
//! - Canonical message: `METHOD ++ PATH_WITH_QUERY ++ BODY_JSON_OR_"{}"`,
//!   exact byte concatenation, no separators. Deliberately brittle: both
//!   sides must canonicalize identically.
//! - Hash: SHA-256; the raw 32-byte digest is the signing input.
//! - Signature: 64-byte compact ECDSA (secp256k1, RFC6979 deterministic),
//!   transported base64 in the `x-auth` header.

pub mod authenticator;
pub mod keypair;

pub use authenticator::RequestAuthenticator;
pub use keypair::AuthKeyPair;

use thiserror::Error;

/// The header carrying the request signature.
pub const AUTH_HEADER: &str = "x-auth";

/// Key-material errors. Verification itself never errors; it denies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Configured public key is not a valid 33-byte compressed point.
    #[error("Invalid authentication public key")]
    InvalidPublicKey,

    /// Private key bytes are not a valid scalar.
    #[error("Invalid authentication private key")]
    InvalidPrivateKey,
}

/// Build the canonical signing message for a request.
pub fn canonical_message(method: &str, path_with_query: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(method.len() + path_with_query.len() + body.len().max(2));
    message.extend_from_slice(method.as_bytes());
    message.extend_from_slice(path_with_query.as_bytes());
    if body.is_empty() {
        message.extend_from_slice(b"{}");
    } else {
        message.extend_from_slice(body);
    }
    message
}
