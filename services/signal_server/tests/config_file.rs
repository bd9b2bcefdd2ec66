use pulse_signal_server::{load_config, ServerConfig};
use std::path::Path;

#[tokio::test]
async fn test_shipped_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/signal_server.toml");

    let config = load_config(&path).await.unwrap();

    assert_eq!(config, ServerConfig::default());
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    assert!(load_config(Path::new("/nonexistent/pulse.toml")).await.is_err());
}
