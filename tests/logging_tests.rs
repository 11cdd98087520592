use porssi::logging::{LogContext, get_logger_with_context, level_rank, min_level, parse_log_level};
use tracing::Level;

#[test]
fn parse_log_level_accepts_common_spellings() {
    assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level(" Warning ").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("ERROR").unwrap(), Level::ERROR);
    assert!(parse_log_level("verbose").is_err());
}

#[test]
fn min_level_prefers_more_verbose() {
    assert!(level_rank(Level::TRACE) < level_rank(Level::ERROR));
    assert_eq!(min_level(Level::WARN, Level::DEBUG), Level::DEBUG);
    assert_eq!(min_level(Level::INFO, Level::INFO), Level::INFO);
}

#[test]
fn init_logging_writes_to_configured_file() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let cfg = porssi::config::LoggingConfig {
        file: tmp_dir
            .path()
            .join("porssi.log")
            .to_string_lossy()
            .to_string(),
        console_output: false,
        ..Default::default()
    };
    porssi::logging::init_logging(&cfg).unwrap();
    // Second call is a no-op
    porssi::logging::init_logging(&cfg).unwrap();

    let logger = get_logger_with_context(
        LogContext::new("test")
            .with_cycle_id(3)
            .with_field("slot", "2024-01-01 05:00".to_string()),
    );
    logger.info("logging smoke test");
}
