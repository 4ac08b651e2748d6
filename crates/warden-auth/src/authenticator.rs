//! Request verification against the configured operator key.

use crate::{canonical_message, AuthError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use k256::ecdsa::{signature::Verifier, Signature, VerifyingKey};
use tracing::warn;

/// Verifies signed control-plane requests.
///
/// Holds the single public key configured at startup; rotation requires a
/// restart. Constructed explicitly and passed by reference so tests can
/// inject independent instances.
pub struct RequestAuthenticator {
    key: VerifyingKey,
}

impl RequestAuthenticator {
    /// Parse and validate the configured key: 33-byte compressed hex.
    pub fn new(pubkey_hex: &str) -> Result<Self, AuthError> {
        let raw = hex::decode(pubkey_hex.trim()).map_err(|_| AuthError::InvalidPublicKey)?;
        if raw.len() != 33 {
            return Err(AuthError::InvalidPublicKey);
        }
        let key = VerifyingKey::from_sec1_bytes(&raw).map_err(|_| AuthError::InvalidPublicKey)?;
        Ok(Self { key })
    }

    /// Decide whether a request was produced by the holder of the
    /// configured private key.
    ///
    /// Any failure while decoding or verifying is a deny, never an error
    /// that could bypass the check. Failures are logged; throttling of
    /// repeated failures belongs to an outer layer.
    pub fn authenticate(
        &self,
        method: &str,
        path_with_query: &str,
        body: &[u8],
        signature_header: &str,
    ) -> bool {
        let Ok(raw_sig) = BASE64.decode(signature_header) else {
            warn!(method, path = path_with_query, "Rejecting request: signature header is not base64");
            return false;
        };
        let Ok(signature) = Signature::from_slice(&raw_sig) else {
            warn!(method, path = path_with_query, "Rejecting request: malformed signature");
            return false;
        };

        let message = canonical_message(method, path_with_query, body);
        match self.key.verify(&message, &signature) {
            Ok(()) => true,
            Err(_) => {
                warn!(method, path = path_with_query, "Rejecting request: signature verification failed");
                false
            }
        }
    }
}
