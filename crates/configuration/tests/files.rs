use product_data_configuration::error::{ParseConfigurationError, WriteParsedConfigurationError};
use product_data_configuration::values::{PoolSettings, Secret};
use product_data_configuration::{
    parse_configuration, write_parsed_configuration, ParsedConfiguration,
};

#[tokio::test]
async fn written_configuration_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = ParsedConfiguration {
        connection_uri: Secret::from("postgres://localhost/products"),
        pool_settings: PoolSettings {
            max_connections: 5,
            ..PoolSettings::default()
        },
        response_limit: 250,
        ..ParsedConfiguration::initial()
    };

    write_parsed_configuration(&parsed, dir.path()).await.unwrap();
    let read_back = parse_configuration(dir.path()).await.unwrap();

    assert_eq!(read_back, parsed);
}

#[tokio::test]
async fn reports_the_position_of_syntax_errors() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("configuration.json"), "{\n  \"connectionUri\": }\n")
        .await
        .unwrap();

    let error = parse_configuration(dir.path()).await.unwrap_err();
    match error {
        ParseConfigurationError::ParseError { line, .. } => assert_eq!(line, 2),
        other => panic!("expected a parse error, got {other}"),
    }
}

#[tokio::test]
async fn missing_files_are_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let error = parse_configuration(dir.path()).await.unwrap_err();
    assert!(matches!(error, ParseConfigurationError::IoError(_)));
}

#[tokio::test]
async fn refuses_to_write_into_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-directory");
    tokio::fs::write(&file, "").await.unwrap();

    let error = write_parsed_configuration(&ParsedConfiguration::initial(), &file)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        WriteParsedConfigurationError::DirectoryIsNotADirectory(_)
    ));
}
