//! Common functions used across test cases.

use std::time::Duration;

use axum_test_helper::TestClient;
use product_data_configuration::values::PoolSettings;
use product_data_configuration::Configuration;
use product_data_service::{routes, state};

/// Nothing listens here; requests that reach the database fail.
pub const UNREACHABLE_DATABASE: &str = "postgres://postgres@127.0.0.1:1/products";

pub const BODY_LIMIT: usize = 1024;

/// Creates a client for a router whose pool never connects.
pub fn create_client() -> TestClient {
    let _ = env_logger::builder().is_test(true).try_init();

    let configuration = Configuration {
        connection_uri: UNREACHABLE_DATABASE.to_string(),
        pool_settings: PoolSettings::default(),
        response_limit: 100,
        body_limit: BODY_LIMIT,
        query_timeout: Duration::from_millis(500),
    };
    let pool = state::pool_options(&configuration.pool_settings)
        .connect_lazy(&configuration.connection_uri)
        .unwrap();
    let state = state::ServerState::new(pool, &configuration).unwrap();

    TestClient::new(routes::create_router(state, configuration.body_limit))
}
