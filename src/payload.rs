//! The broadcast message request body.
//!
//! Each [`BroadcastMessageRequest`] is built fresh for a single POST, serialized to JSON
//! and then dropped. Nothing about the server's response is kept.
//!
//! ```rust
//! use broadcast_loadtest::payload::{self, BROADCAST_ACTION};
//! use broadcast_loadtest::source::SystemSource;
//!
//! let request = payload::generate(&mut SystemSource::new());
//! assert_eq!(request.action, BROADCAST_ACTION);
//! assert_eq!(request.message.message_id.len(), 26);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::PayloadSource;

/// Value of the `action` field on every request.
pub const BROADCAST_ACTION: &str = "broadcastmessage";

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`. `%.3f` truncates to milliseconds, it never rounds.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Top level body of a `POST /messages` request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastMessageRequest {
    /// Always [`BROADCAST_ACTION`].
    pub action: String,
    pub message: BroadcastMessage,
}

/// The message a simulated user broadcasts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BroadcastMessage {
    /// Canonical 26 character ULID.
    pub message_id: String,
    /// Hyphenated UUID v4, a different sender on every request.
    pub user_id: String,
    pub user_name: String,
    pub user_message: String,
    /// UTC, millisecond precision, see [`format_timestamp`].
    pub timestamp: String,
}

/// Build one broadcast message request from the given source.
pub fn generate<S: PayloadSource + ?Sized>(source: &mut S) -> BroadcastMessageRequest {
    let message_id = source.new_time_ordered_id().to_string();
    let user_id = source.new_random_id().hyphenated().to_string();
    let timestamp = format_timestamp(&source.current_utc_time());
    let user_name = source.fake_name();
    let user_message = source.fake_sentence();

    BroadcastMessageRequest {
        action: BROADCAST_ACTION.to_string(),
        message: BroadcastMessage {
            message_id,
            user_id,
            user_name,
            user_message,
            timestamp,
        },
    }
}

/// Format a UTC instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`, truncating sub-millisecond digits.
///
/// ```rust
/// use broadcast_loadtest::payload::format_timestamp;
/// use chrono::{DateTime, Utc};
///
/// let instant = "2024-01-15T10:30:00.1239999Z".parse::<DateTime<Utc>>().unwrap();
/// assert_eq!(format_timestamp(&instant), "2024-01-15T10:30:00.123Z");
/// ```
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}
