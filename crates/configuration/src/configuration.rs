//! Configuration for the service.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::environment::{Environment, Variable};
use crate::error::{
    MakeRuntimeConfigurationError, ParseConfigurationError, WriteParsedConfigurationError,
};
use crate::values::{PoolSettings, Secret};

pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const DEFAULT_CONNECTION_URI_VARIABLE: Variable = Variable::from_static("DATABASE_URL");

const DEFAULT_RESPONSE_LIMIT: u32 = 10_000;
const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 30_000;

/// The configuration as written in `configuration.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Connection string for the PostgreSQL database holding SKU records.
    pub connection_uri: Secret,
    #[serde(skip_serializing_if = "PoolSettings::is_default")]
    #[serde(default)]
    pub pool_settings: PoolSettings,
    /// The largest number of rows a single query may return. Larger `$top` values are clamped.
    #[serde(default = "response_limit_default")]
    pub response_limit: u32,
    /// The largest accepted request body, in bytes.
    #[serde(default = "body_limit_default")]
    pub body_limit: usize,
    /// How long a request may spend in the database, in milliseconds.
    #[serde(default = "query_timeout_ms_default")]
    pub query_timeout_ms: u64,
}

fn response_limit_default() -> u32 {
    DEFAULT_RESPONSE_LIMIT
}
fn body_limit_default() -> usize {
    DEFAULT_BODY_LIMIT
}
fn query_timeout_ms_default() -> u64 {
    DEFAULT_QUERY_TIMEOUT_MS
}

impl ParsedConfiguration {
    /// The configuration used when no configuration file is given.
    pub fn initial() -> Self {
        ParsedConfiguration {
            connection_uri: Secret::FromEnvironment {
                variable: DEFAULT_CONNECTION_URI_VARIABLE,
            },
            pool_settings: PoolSettings::default(),
            response_limit: DEFAULT_RESPONSE_LIMIT,
            body_limit: DEFAULT_BODY_LIMIT,
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
        }
    }
}

/// The 'Configuration' type collects all the information necessary to serve requests at runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', which resolves secrets and validates limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub connection_uri: String,
    pub pool_settings: PoolSettings,
    pub response_limit: u32,
    pub body_limit: usize,
    pub query_timeout: Duration,
}

/// Read `configuration.json` from a directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);
    tracing::debug!(path = %configuration_file.display(), "reading configuration");
    let contents = fs::read_to_string(&configuration_file).await?;

    serde_json::from_str(&contents).map_err(|error| ParseConfigurationError::ParseError {
        file_path: configuration_file,
        line: error.line(),
        column: error.column(),
        message: error.to_string(),
    })
}

/// Write a configuration to `configuration.json` in a directory, which must exist.
pub async fn write_parsed_configuration(
    parsed_config: &ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let out_dir = out_dir.as_ref();
    if !fs::metadata(out_dir).await?.is_dir() {
        return Err(WriteParsedConfigurationError::DirectoryIsNotADirectory(
            out_dir.to_owned(),
        ));
    }

    let mut contents = serde_json::to_string_pretty(parsed_config)?;
    contents.push('\n');
    fs::write(out_dir.join(CONFIGURATION_FILENAME), contents).await?;
    Ok(())
}

/// Resolve secrets against the environment and check limits.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: &impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let connection_uri = match parsed_config.connection_uri {
        Secret::Plain(uri) => uri,
        Secret::FromEnvironment { variable } => environment.read(&variable).map_err(|error| {
            MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                attempted_to_resolve: "connectionUri".to_string(),
                source: error,
            }
        })?,
    };

    let positive = |setting: &str, value: u64| {
        if value == 0 {
            Err(MakeRuntimeConfigurationError::InvalidValue {
                setting: setting.to_string(),
                message: "must be greater than zero".to_string(),
            })
        } else {
            Ok(())
        }
    };
    positive("responseLimit", parsed_config.response_limit.into())?;
    positive(
        "bodyLimit",
        u64::try_from(parsed_config.body_limit).unwrap_or(u64::MAX),
    )?;
    positive("queryTimeoutMs", parsed_config.query_timeout_ms)?;
    positive(
        "poolSettings.maxConnections",
        parsed_config.pool_settings.max_connections.into(),
    )?;

    Ok(Configuration {
        connection_uri,
        pool_settings: parsed_config.pool_settings,
        response_limit: parsed_config.response_limit,
        body_limit: parsed_config.body_limit,
        query_timeout: Duration::from_millis(parsed_config.query_timeout_ms),
    })
}
