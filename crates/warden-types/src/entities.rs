//! # Domain Entities
//!
//! Core value types: peer identities, reject messages, and log records.

use crate::constants::REJECT_MESSAGE_SIZE_LIMIT;
use crate::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A peer's public identity: a 33-byte compressed secp256k1 key.
///
/// Constructed only from plain lowercase-or-uppercase hex (66 characters).
/// A `0x` prefix is rejected, never stripped.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerPubKey([u8; 33]);

impl PeerPubKey {
    /// Parse a peer identity from hex. Exactly 33 bytes once decoded.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        if s.len() != 66 {
            return Err(ValidationError::InvalidPubKey);
        }
        let raw = hex::decode(s).map_err(|_| ValidationError::InvalidPubKey)?;
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }

    /// Raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Lowercase hex rendering; this is the store key for whitelist rows.
    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PeerPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl fmt::Debug for PeerPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerPubKey({})", self.as_hex())
    }
}

impl Serialize for PeerPubKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for PeerPubKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A validated channel-reject message (1..=500 characters).
///
/// The length limit comes from the downstream node's protocol and is
/// enforced here, at write time, not when a rejection is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectMessage(String);

impl RejectMessage {
    pub fn new(message: impl Into<String>) -> Result<Self, ValidationError> {
        let message = message.into();
        if message.is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        let len = message.chars().count();
        if len > REJECT_MESSAGE_SIZE_LIMIT {
            return Err(ValidationError::MessageTooLong {
                len,
                limit: REJECT_MESSAGE_SIZE_LIMIT,
            });
        }
        Ok(Self(message))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RejectMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Log severity, rendered lowercase in store keys and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted operational log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub severity: Severity,
    /// Epoch milliseconds.
    pub timestamp: u64,
    pub message: String,
}

impl LogRecord {
    pub fn new(severity: Severity, timestamp: u64, message: impl Into<String>) -> Self {
        Self {
            severity,
            timestamp,
            message: message.into(),
        }
    }

    /// Fixed-width key segment for an epoch-millisecond value. Padding
    /// to 13 digits keeps lexicographic order equal to time order for
    /// any millisecond value, so range bounds built from arbitrary
    /// dates compare correctly against stored keys.
    pub fn timestamp_key(timestamp: u64) -> String {
        format!("{timestamp:013}")
    }

    /// Store key: `{epoch_ms:013}_{severity}`.
    pub fn key(&self) -> String {
        format!("{}_{}", Self::timestamp_key(self.timestamp), self.severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_HEX: &str = "02a1633cafcc01ebfb6d78e39f687a1f0995c62fc95f51ead10a02ee0be551b5dc";

    #[test]
    fn test_pubkey_accepts_valid_hex() {
        let key = PeerPubKey::from_hex(VALID_HEX).unwrap();
        assert_eq!(key.as_hex(), VALID_HEX);
        assert_eq!(key.as_bytes().len(), 33);
    }

    #[test]
    fn test_pubkey_accepts_mixed_case_and_renders_lowercase() {
        let upper = VALID_HEX.to_uppercase();
        let key = PeerPubKey::from_hex(&upper).unwrap();
        assert_eq!(key.as_hex(), VALID_HEX);
    }

    #[test]
    fn test_pubkey_rejects_0x_prefix() {
        let prefixed = format!("0x{}", &VALID_HEX[2..]);
        assert_eq!(prefixed.len(), 66);
        assert!(PeerPubKey::from_hex(&prefixed).is_err());
    }

    #[test]
    fn test_pubkey_rejects_wrong_lengths() {
        assert!(PeerPubKey::from_hex(&VALID_HEX[..64]).is_err()); // 32 bytes
        let long = format!("{}ab", VALID_HEX); // 34 bytes
        assert!(PeerPubKey::from_hex(&long).is_err());
        assert!(PeerPubKey::from_hex(&VALID_HEX[..65]).is_err()); // odd length
        assert!(PeerPubKey::from_hex("").is_err());
    }

    #[test]
    fn test_pubkey_rejects_non_hex() {
        let bad = format!("zz{}", &VALID_HEX[2..]);
        assert!(PeerPubKey::from_hex(&bad).is_err());
    }

    #[test]
    fn test_pubkey_serde_roundtrip() {
        let key = PeerPubKey::from_hex(VALID_HEX).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", VALID_HEX));
        let back: PeerPubKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_reject_message_boundaries() {
        assert!(matches!(
            RejectMessage::new(""),
            Err(ValidationError::MissingMessage)
        ));
        assert!(RejectMessage::new("a".repeat(500)).is_ok());
        assert!(matches!(
            RejectMessage::new("a".repeat(501)),
            Err(ValidationError::MessageTooLong { len: 501, .. })
        ));
    }

    #[test]
    fn test_log_record_key_orders_by_time() {
        let a = LogRecord::new(Severity::Info, 1_700_000_000_000, "first");
        let b = LogRecord::new(Severity::Error, 1_700_000_000_001, "second");
        assert!(a.key() < b.key());
        assert_eq!(a.key(), "1700000000000_info");
    }

    #[test]
    fn test_log_record_key_pads_short_timestamps() {
        let small = LogRecord::new(Severity::Info, 999, "early");
        let big = LogRecord::new(Severity::Info, 1_000, "later");
        assert_eq!(small.key(), "0000000000999_info");
        assert!(small.key() < big.key());
        // A pre-2001 bound still sorts below present-day keys
        let bound = LogRecord::timestamp_key(946_684_800_000);
        let recent = LogRecord::new(Severity::Info, 1_700_000_000_000, "now");
        assert!(bound < recent.key());
        assert!(bound > big.key());
    }
}
