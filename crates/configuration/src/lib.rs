pub mod configuration;
pub mod environment;
pub mod error;
pub mod options;
pub mod values;

pub use configuration::{
    make_runtime_configuration, parse_configuration, write_parsed_configuration, Configuration,
    ParsedConfiguration,
};
pub use options::ServerOptions;
