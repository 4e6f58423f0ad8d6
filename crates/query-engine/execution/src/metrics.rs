//! Metrics setup and update for the service.

use std::time::Duration;

use prometheus::core::{AtomicF64, AtomicI64, AtomicU64, GenericCounter, GenericGauge};
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry};

use crate::error::DatabaseErrorKind;

#[derive(Debug, Clone)]
pub struct Metrics {
    pub query_total: GenericCounter<AtomicU64>,
    pub query_errors: IntCounterVec,
    pub query_duration: Histogram,
    pub upload_total: GenericCounter<AtomicU64>,
    pub pool_size: GenericGauge<AtomicI64>,
    pub pool_idle_count: GenericGauge<AtomicI64>,
    pub pool_active_count: GenericGauge<AtomicI64>,
    pub pool_max_connections: GenericGauge<AtomicI64>,
    pub pool_min_connections: GenericGauge<AtomicI64>,
    pub pool_acquire_timeout: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Set up counters and gauges used to produce Prometheus metrics, registering them
    /// with `registry`.
    pub fn initialize(registry: &mut Registry) -> Result<Metrics, prometheus::Error> {
        let query_total = add_int_counter_metric(
            registry,
            "product_data_query_total",
            "Total successful queries.",
        )?;

        let query_errors = IntCounterVec::new(
            Opts::new(
                "product_data_query_errors_total",
                "Failed database calls, by kind of failure.",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(query_errors.clone()))?;

        let query_duration = Histogram::with_opts(HistogramOpts::new(
            "product_data_query_duration_seconds",
            "Time spent answering a query against the database, in seconds.",
        ))?;
        registry.register(Box::new(query_duration.clone()))?;

        let upload_total = add_int_counter_metric(
            registry,
            "product_data_upload_total",
            "Total SKU records stored.",
        )?;

        let pool_size = add_int_gauge_metric(
            registry,
            "product_data_pool_size",
            "The number of connections currently active. This includes idle connections.",
        )?;

        let pool_idle_count = add_int_gauge_metric(
            registry,
            "product_data_pool_idle",
            "The number of connections active and idle (not in use).",
        )?;

        let pool_active_count = add_int_gauge_metric(
            registry,
            "product_data_pool_active",
            "The number of connections current active. This does not include idle connections.",
        )?;

        let pool_max_connections = add_int_gauge_metric(
            registry,
            "product_data_pool_max_connections",
            "The maximum number of connections that this pool should maintain.",
        )?;

        let pool_min_connections = add_int_gauge_metric(
            registry,
            "product_data_pool_min_connections",
            "The minimum number of connections that this pool should maintain.",
        )?;

        let pool_acquire_timeout = add_gauge_metric(
            registry,
            "product_data_pool_acquire_timeout",
            "Get the maximum amount of time to spend waiting for a connection, in seconds.",
        )?;

        Ok(Metrics {
            query_total,
            query_errors,
            query_duration,
            upload_total,
            pool_size,
            pool_idle_count,
            pool_active_count,
            pool_max_connections,
            pool_min_connections,
            pool_acquire_timeout,
        })
    }

    /// Count a failed database call.
    pub fn record_error(&self, kind: DatabaseErrorKind) {
        self.query_errors.with_label_values(&[kind.label()]).inc();
    }

    /// Refresh the pool gauges.
    pub fn update_pool_metrics(&self, pool: &sqlx::PgPool) {
        let pool_size: i64 = pool.size().into();
        self.pool_size.set(pool_size);

        let pool_idle: i64 = i64::try_from(pool.num_idle()).unwrap_or(i64::MAX);
        self.pool_idle_count.set(pool_idle);

        self.pool_active_count.set(pool_size - pool_idle);

        let pool_options = pool.options();

        let max_connections: i64 = pool_options.get_max_connections().into();
        self.pool_max_connections.set(max_connections);

        let min_connections: i64 = pool_options.get_min_connections().into();
        self.pool_min_connections.set(min_connections);

        let acquire_timeout: Duration = pool_options.get_acquire_timeout();
        self.pool_acquire_timeout.set(acquire_timeout.as_secs_f64());
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, prometheus::Error> {
    let int_counter = prometheus::IntCounter::with_opts(Opts::new(metric_name, metric_description))?;
    registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}

/// Create a new int gauge metric and register it with the provided Prometheus Registry
fn add_int_gauge_metric(
    registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericGauge<AtomicI64>, prometheus::Error> {
    let int_gauge = prometheus::IntGauge::with_opts(Opts::new(metric_name, metric_description))?;
    registry.register(Box::new(int_gauge.clone()))?;
    Ok(int_gauge)
}

/// Create a new gauge metric and register it with the provided Prometheus Registry
fn add_gauge_metric(
    registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericGauge<AtomicF64>, prometheus::Error> {
    let gauge = prometheus::Gauge::with_opts(Opts::new(metric_name, metric_description))?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}
