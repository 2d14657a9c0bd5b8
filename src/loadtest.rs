//! Wiring the broadcast message generator into a Goose load test.
//!
//! Goose owns everything about running the test: how many users, how they are launched,
//! the pause between transactions, the HTTP client, metrics and reports. This module only
//! hands Goose a [`Scenario`] containing one transaction that POSTs a freshly generated
//! [`BroadcastMessageRequest`](../payload/struct.BroadcastMessageRequest.html).
//!
//! ```rust,no_run
//! use broadcast_loadtest::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LoadtestError> {
//!     let attack = GooseAttack::initialize()?;
//!     loadtest::register(attack, &BroadcastConfig::default())?
//!         .execute()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

use goose::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use crate::payload;
use crate::source::SystemSource;
use crate::LoadtestError;

/// Path the target service accepts broadcast messages on.
pub const MESSAGES_PATH: &str = "/messages";
/// Name of the scenario, shown in Goose metrics.
pub const SCENARIO_NAME: &str = "SendMessageUser";
/// Name of the transaction, shown in Goose metrics.
pub const TRANSACTION_NAME: &str = "send message";
/// Default minimum pause between two messages from the same user.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(1);
/// Default maximum pause between two messages from the same user.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(3);

/// Shape of the broadcast load test.
///
/// Host, user count, run time and logging are configured through Goose itself, either on
/// the command line or with [`GooseDefault`].
#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastConfig {
    /// Scenario name shown in Goose metrics.
    pub scenario_name: String,
    /// Transaction name, Goose also names the request metrics after it.
    pub transaction_name: String,
    /// Request path, must start with `/`.
    pub path: String,
    /// Shortest pause a user takes after sending a message.
    pub min_wait: Duration,
    /// Longest pause a user takes after sending a message.
    pub max_wait: Duration,
}
impl Default for BroadcastConfig {
    fn default() -> Self {
        BroadcastConfig {
            scenario_name: SCENARIO_NAME.to_string(),
            transaction_name: TRANSACTION_NAME.to_string(),
            path: MESSAGES_PATH.to_string(),
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}
impl BroadcastConfig {
    pub fn set_scenario_name(mut self, name: &str) -> Self {
        self.scenario_name = name.to_string();
        self
    }

    pub fn set_transaction_name(mut self, name: &str) -> Self {
        self.transaction_name = name.to_string();
        self
    }

    pub fn set_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn set_wait_time(mut self, min_wait: Duration, max_wait: Duration) -> Self {
        self.min_wait = min_wait;
        self.max_wait = max_wait;
        self
    }

    /// Confirm the configuration can be turned into a scenario.
    pub fn validate(&self) -> Result<(), LoadtestError> {
        if self.min_wait > self.max_wait {
            return Err(LoadtestError::InvalidWaitTime {
                min_wait: self.min_wait,
                max_wait: self.max_wait,
                detail: "min_wait can't be larger than max_wait".to_string(),
            });
        }
        if !self.path.starts_with('/') {
            return Err(LoadtestError::InvalidPath {
                path: self.path.clone(),
                detail: "path must start with '/'".to_string(),
            });
        }

        Ok(())
    }
}

/// Generate a broadcast message and POST it to `path`.
///
/// The response is left entirely to Goose: it records status codes, failures and timing.
pub async fn post_broadcast(user: &mut GooseUser, path: &str) -> TransactionResult {
    // The source holds a thread-local RNG, so it must be gone before the next await.
    let request = payload::generate(&mut SystemSource::new());
    debug!(
        "user {} broadcasting message {}",
        user.weighted_users_index, request.message.message_id
    );
    if log_enabled!(log::Level::Trace) {
        if let Ok(body) = serde_json::to_string(&request) {
            trace!("POST {}: {}", path, body);
        }
    }

    let _goose = user.post_json(path, &request).await?;

    Ok(())
}

/// Send one broadcast message to [`MESSAGES_PATH`].
pub async fn send_message(user: &mut GooseUser) -> TransactionResult {
    post_broadcast(user, MESSAGES_PATH).await
}

/// Build the scenario every simulated user runs.
pub fn broadcast_scenario(config: &BroadcastConfig) -> Result<Scenario, LoadtestError> {
    config.validate()?;

    let transaction = if config.path == MESSAGES_PATH {
        transaction!(send_message)
    } else {
        let path = config.path.clone();
        let closure: TransactionFunction = Arc::new(move |user| {
            let path = path.clone();
            Box::pin(async move { post_broadcast(user, &path).await })
        });
        Transaction::new(closure)
    };

    let scenario = Scenario::new(&config.scenario_name)
        .set_wait_time(config.min_wait, config.max_wait)?
        .register_transaction(transaction.set_name(&config.transaction_name));

    Ok(scenario)
}

/// Register the broadcast scenario on a Goose attack.
pub fn register(
    goose_attack: GooseAttack,
    config: &BroadcastConfig,
) -> Result<GooseAttack, LoadtestError> {
    let scenario = broadcast_scenario(config)?;
    info!(
        "registering scenario {:?}: POST {} every {:?} to {:?}",
        config.scenario_name, config.path, config.min_wait, config.max_wait
    );

    Ok(goose_attack.register_scenario(scenario))
}
