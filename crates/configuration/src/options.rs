//! Command line options of the server.

use std::path::PathBuf;

use clap::Parser;

use crate::configuration::{parse_configuration, ParsedConfiguration};
use crate::error::ParseConfigurationError;
use crate::values::Secret;

/// Options given on the command line or through the environment. Anything set here
/// overrides `configuration.json`.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(version, about = "Serve SKU product data over HTTP")]
pub struct ServerOptions {
    /// Directory holding `configuration.json`.
    #[arg(long, value_name = "DIRECTORY", env = "PRODUCT_DATA_CONFIGURATION")]
    pub configuration: Option<PathBuf>,

    /// Port to listen on.
    #[arg(long, value_name = "PORT", env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Connection string of the PostgreSQL database.
    #[arg(long, value_name = "URI", env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// The largest number of rows a single query may return.
    #[arg(long, value_name = "ROWS", env = "RESPONSE_LIMIT")]
    pub response_limit: Option<u32>,

    /// The largest accepted request body, in bytes.
    #[arg(long, value_name = "BYTES", env = "BODY_LIMIT")]
    pub body_limit: Option<usize>,

    /// How long a request may spend in the database, in milliseconds.
    #[arg(long, value_name = "MILLISECONDS", env = "QUERY_TIMEOUT_MS")]
    pub query_timeout_ms: Option<u64>,

    /// Maximum number of pooled database connections.
    #[arg(long, value_name = "CONNECTIONS", env = "POOL_MAX_CONNECTIONS")]
    pub pool_max_connections: Option<u32>,
}

impl ServerOptions {
    /// Read the configuration file, if any, and apply the overrides.
    pub async fn load(&self) -> Result<ParsedConfiguration, ParseConfigurationError> {
        let parsed = match &self.configuration {
            Some(directory) => parse_configuration(directory).await?,
            None => ParsedConfiguration::initial(),
        };
        Ok(self.apply(parsed))
    }

    /// Override file settings with the ones given here.
    pub fn apply(&self, mut parsed: ParsedConfiguration) -> ParsedConfiguration {
        if let Some(uri) = &self.database_url {
            parsed.connection_uri = Secret::Plain(uri.clone());
        }
        if let Some(response_limit) = self.response_limit {
            parsed.response_limit = response_limit;
        }
        if let Some(body_limit) = self.body_limit {
            parsed.body_limit = body_limit;
        }
        if let Some(query_timeout_ms) = self.query_timeout_ms {
            parsed.query_timeout_ms = query_timeout_ms;
        }
        if let Some(max_connections) = self.pool_max_connections {
            parsed.pool_settings.max_connections = max_connections;
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_the_file() {
        let options = ServerOptions::parse_from([
            "product-data-service",
            "--database-url",
            "postgres://override",
            "--response-limit",
            "50",
            "--port",
            "9000",
        ]);
        assert_eq!(options.port, 9000);

        let parsed = options.apply(ParsedConfiguration::initial());
        assert_eq!(parsed.connection_uri, Secret::from("postgres://override"));
        assert_eq!(parsed.response_limit, 50);
        assert_eq!(parsed.body_limit, ParsedConfiguration::initial().body_limit);
    }
}
