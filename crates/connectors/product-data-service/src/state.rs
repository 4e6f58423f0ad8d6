//! Transient state used by the server.
//!
//! This is initialized on startup.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info_span, Instrument};

use product_data_configuration::values::PoolSettings;
use product_data_configuration::Configuration;
use query_engine_execution::database;
use query_engine_execution::error::DatabaseError;
use query_engine_execution::metrics::Metrics;
use query_engine_execution::query::{self, QueryResults};
use query_engine_translation::translation::query::{compile, Options, QueryPlan};

/// State shared by every request.
#[derive(Clone)]
pub struct ServerState {
    pub pool: PgPool,
    pub metrics: Metrics,
    pub registry: prometheus::Registry,
    pub translation_options: Options,
    pub query_timeout: Duration,
}

impl ServerState {
    /// Wrap a pool and register metrics.
    pub fn new(pool: PgPool, configuration: &Configuration) -> Result<ServerState, InitializationError> {
        let mut registry = prometheus::Registry::new();
        let metrics =
            Metrics::initialize(&mut registry).map_err(InitializationError::MetricsError)?;

        Ok(ServerState {
            pool,
            metrics,
            registry,
            translation_options: Options {
                max_top: configuration.response_limit,
            },
            query_timeout: configuration.query_timeout,
        })
    }

    /// The point after which a request started now gives up on the database.
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.query_timeout
    }

    /// Take a pooled connection for one request.
    pub async fn acquire(
        &self,
        deadline: Instant,
    ) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, DatabaseError> {
        database::acquire(&self.pool, deadline)
            .instrument(info_span!("Acquire connection"))
            .await
            .map_err(|err| {
                self.metrics.record_error(err.kind);
                tracing::error!(
                    kind = err.kind.label(),
                    error = %err.message,
                    "could not acquire a connection"
                );
                err
            })
    }

    /// Compile a plan and run it on one connection.
    pub async fn run(&self, plan: &QueryPlan) -> Result<QueryResults, DatabaseError> {
        let execution_plan = compile(plan);
        let deadline = self.deadline();
        let mut connection = self.acquire(deadline).await?;
        query::execute(&mut *connection, &self.metrics, &execution_plan, deadline).await
    }
}

/// Pool options derived from the configured settings.
pub fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.pool_timeout))
        .idle_timeout(settings.idle_timeout.map(Duration::from_secs))
        .max_lifetime(settings.connection_lifetime.map(Duration::from_secs))
}

/// Create a connection pool and wrap it inside the server state.
pub async fn create_state(configuration: &Configuration) -> Result<ServerState, InitializationError> {
    let pool = pool_options(&configuration.pool_settings)
        .connect(&configuration.connection_uri)
        .instrument(info_span!("Create connection pool"))
        .await
        .map_err(InitializationError::UnableToCreatePool)?;

    ServerState::new(pool, configuration)
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("unable to initialize connection pool: {0}")]
    UnableToCreatePool(sqlx::Error),
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
}
