use gumdrop::Options;
use httpmock::MockServer;

use broadcast_loadtest::loadtest::{self, BroadcastConfig};
use goose::config::GooseConfiguration;
use goose::metrics::GooseMetrics;
use goose::GooseAttack;

/// The following options are configured by default, if not set to a custom value:
///  --host <mock-server>
///  --users 1
///  --hatch-rate 1
///  --run-time 2
///  --quiet
pub fn build_configuration(server: &MockServer, custom: Vec<&str>) -> GooseConfiguration {
    // Start with an empty configuration.
    let mut configuration: Vec<&str> = vec![];
    // Declare server_url here no matter what, so its lifetime is sufficient when needed.
    let server_url = server.base_url();

    // Merge in all custom options first.
    configuration.extend_from_slice(&custom);

    // Default to using mock server if not otherwise configured.
    if !configuration.contains(&"--host") {
        configuration.extend_from_slice(&["--host", &server_url]);
    }

    // Default to testing with 1 user if not otherwise configured.
    if !configuration.contains(&"--users") {
        configuration.extend_from_slice(&["--users", "1"]);
    }

    // Default to hatch 1 user per second if not otherwise configured.
    if !configuration.contains(&"--hatch-rate") {
        configuration.extend_from_slice(&["--hatch-rate", "1"]);
    }

    // Default to running for 2 seconds if not otherwise configured.
    if !configuration.contains(&"--run-time") {
        configuration.extend_from_slice(&["--run-time", "2"]);
    }

    // Keep the test output readable.
    if !configuration.contains(&"--quiet") {
        configuration.push("--quiet");
    }

    // Parse these options to generate a GooseConfiguration.
    GooseConfiguration::parse_args_default(&configuration)
        .expect("failed to parse options and generate a configuration")
}

/// Create a GooseAttack object from the configuration with the broadcast scenario registered.
pub fn build_load_test(
    configuration: GooseConfiguration,
    config: &BroadcastConfig,
) -> GooseAttack {
    let goose_attack = GooseAttack::initialize_with_config(configuration)
        .expect("failed to initialize GooseAttack");

    loadtest::register(goose_attack, config).expect("failed to register broadcast scenario")
}

/// Run the actual load test, returning the GooseMetrics.
pub async fn run_load_test(goose_attack: GooseAttack) -> GooseMetrics {
    goose_attack
        .execute()
        .await
        .expect("failed to execute load test")
}
