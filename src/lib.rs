//! # Broadcast load test
//!
//! A [Goose](https://docs.rs/goose/) load test that floods a chat service with synthetic
//! broadcast messages.
//!
//! Every simulated user repeatedly POSTs a JSON body to `/messages`, pausing a random
//! 1 to 3 seconds between messages. Each body carries a fresh
//! [ULID](https://github.com/ulid/spec) message id, a fresh UUID v4 sender id, a fake
//! name, a fake sentence and a millisecond precision UTC timestamp:
//!
//! ```json
//! {
//!   "action": "broadcastmessage",
//!   "message": {
//!     "messageId": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
//!     "userId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!     "userName": "Jane Doe",
//!     "userMessage": "Lorem ipsum dolor sit amet.",
//!     "timestamp": "2024-01-15T10:30:00.123Z"
//!   }
//! }
//! ```
//!
//! Goose does the rest: launching users, pacing, the HTTP client, metrics, reports and
//! logging. Responses are never inspected here, Goose records them.
//!
//! ## Running
//!
//! ```bash
//! cargo run --release -- --host https://chat.example.com --users 50 --hatch-rate 5 --run-time 10m
//! ```
//!
//! All of Goose's run-time options are available, for example `-v` or `--log-file` to
//! control logging and `--report-file` to write an HTML report.
//!
//! ## Building the request body
//!
//! [`payload::generate`] builds one request. It reads time and entropy only through a
//! [`source::PayloadSource`], so tests can freeze the clock and seed the generator:
//!
//! ```rust
//! use broadcast_loadtest::payload;
//! use broadcast_loadtest::source::{FixedClock, SeededSource};
//!
//! let instant = "2024-01-15T10:30:00.123456Z".parse().unwrap();
//! let mut source = SeededSource::seeded(1, FixedClock::new(instant));
//! let request = payload::generate(&mut source);
//!
//! assert_eq!(request.message.timestamp, "2024-01-15T10:30:00.123Z");
//! ```
//!
//! ## Custom load tests
//!
//! [`loadtest::BroadcastConfig`] changes the path, names and pacing, and
//! [`loadtest::register`] adds the resulting scenario to any [`GooseAttack`]:
//!
//! ```rust,no_run
//! use broadcast_loadtest::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LoadtestError> {
//!     let config = BroadcastConfig::default()
//!         .set_path("/prod/messages")
//!         .set_wait_time(Duration::from_millis(500), Duration::from_secs(2));
//!
//!     loadtest::register(GooseAttack::initialize()?, &config)?
//!         .set_default(GooseDefault::Host, "https://chat.example.com")?
//!         .execute()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate log;

pub mod loadtest;
pub mod payload;
pub mod prelude;
pub mod source;

use goose::GooseError;
use std::fmt;
use std::time::Duration;

/// An enumeration of all errors a broadcast load test can return.
///
/// All of them happen while building or starting the load test. Failed requests are
/// recorded by Goose and never surface here.
#[derive(Debug)]
pub enum LoadtestError {
    /// Wraps a [`GooseError`](https://docs.rs/goose/*/goose/enum.GooseError.html).
    Goose(GooseError),
    /// Invalid pause between messages.
    InvalidWaitTime {
        /// The specified minimum wait time.
        min_wait: Duration,
        /// The specified maximum wait time.
        max_wait: Duration,
        /// An optional explanation of the error.
        detail: String,
    },
    /// Invalid request path.
    InvalidPath {
        /// The invalid path.
        path: String,
        /// An optional explanation of the error.
        detail: String,
    },
}
/// Implement a helper to provide a text description of all possible types of errors.
impl LoadtestError {
    fn describe(&self) -> &str {
        match *self {
            LoadtestError::Goose(_) => "goose::GooseError",
            LoadtestError::InvalidWaitTime { .. } => "invalid wait time",
            LoadtestError::InvalidPath { .. } => "invalid path",
        }
    }
}

/// Implement format trait to allow displaying errors.
impl fmt::Display for LoadtestError {
    // Implement display of error with `{}` marker.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LoadtestError::Goose(ref source) => {
                write!(f, "LoadtestError: {} ({})", self.describe(), source)
            }
            LoadtestError::InvalidWaitTime {
                ref min_wait,
                ref max_wait,
                ref detail,
            } => write!(
                f,
                "LoadtestError: {} ({:?} to {:?}: {})",
                self.describe(),
                min_wait,
                max_wait,
                detail
            ),
            LoadtestError::InvalidPath {
                ref path,
                ref detail,
            } => write!(
                f,
                "LoadtestError: {} ({:?}: {})",
                self.describe(),
                path,
                detail
            ),
        }
    }
}

// Define the lower level source of this error, if any.
impl std::error::Error for LoadtestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            LoadtestError::Goose(ref source) => Some(source),
            _ => None,
        }
    }
}

/// Auto-convert Goose errors.
impl From<GooseError> for LoadtestError {
    fn from(err: GooseError) -> LoadtestError {
        LoadtestError::Goose(err)
    }
}
