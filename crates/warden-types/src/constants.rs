//! Protocol constants shared between the control plane and the interceptor.

use std::time::Duration;

/// Sentinel key in the policy collection holding the custom reject message.
pub const REJECT_MESSAGE_KEY: &str = "channelRejectMsg";

/// Built-in reject message used when no custom message is stored.
pub const DEFAULT_REJECT_MESSAGE: &str = "Please contact this node's admin to open a channel.";

/// Maximum reject message length, imposed by the downstream node's
/// channel-open protocol.
pub const REJECT_MESSAGE_SIZE_LIMIT: usize = 500;

/// Fixed reply when deciding a request fails unexpectedly. The peer always
/// receives exactly one response.
pub const UNKNOWN_ERROR_REJECT_MESSAGE: &str =
    "Unknown error occurred. Please contact the node operator.";

/// Delay between resubscription attempts after the node stream drops.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Rolling retention window for persisted log records (14 days).
/// A window of 0 disables log persistence entirely.
pub const DEFAULT_LOG_WINDOW_MS: u64 = 14 * 24 * 60 * 60 * 1000;
