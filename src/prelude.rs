pub use crate::loadtest::{self, BroadcastConfig, MESSAGES_PATH};
pub use crate::payload::{BroadcastMessage, BroadcastMessageRequest};
pub use crate::source::{Clock, FixedClock, PayloadSource, SeededSource, SystemClock, SystemSource};
pub use crate::LoadtestError;
pub use goose::prelude::*;
