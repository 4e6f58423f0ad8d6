use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;

use product_data_configuration::environment::ProcessEnvironment;
use product_data_configuration::{make_runtime_configuration, ServerOptions};
use product_data_service::{routes, state};
use query_engine_execution::schema;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = ServerOptions::parse();
    let parsed = options.load().await?;
    let configuration = make_runtime_configuration(parsed, &ProcessEnvironment)?;

    let state = state::create_state(&configuration).await?;
    schema::create_table(&state.pool)
        .await
        .context("creating the records table")?;

    let router = routes::create_router(state, configuration.body_limit);
    let address = SocketAddr::from(([0, 0, 0, 0], options.port));
    tracing::info!(%address, "starting server");

    axum::Server::bind(&address)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
