use broadcast_loadtest::prelude::*;

/// Every user POSTs a generated broadcast message to `/messages`, then sleeps 1 to 3
/// seconds. Host, users, run time and logging come from the Goose command line.
#[tokio::main]
async fn main() -> Result<(), LoadtestError> {
    loadtest::register(GooseAttack::initialize()?, &BroadcastConfig::default())?
        .execute()
        .await?;

    Ok(())
}
