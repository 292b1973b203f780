use clap::{CommandFactory, FromArgMatches, Parser};
use ledgerforge::config::Config;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct Harness {
    #[command(flatten)]
    config: Config,
}

#[test]
fn test_defaults_match_game_rules() {
    let config = Config::default();
    assert_eq!(config.timing.settle(), Duration::from_secs(1));
    assert_eq!(config.timing.wrong_display(), Duration::from_secs(1));
    assert_eq!(config.timing.excess_clear(), Duration::from_secs(1));
    assert_eq!(config.timing.final_question_delay(), Duration::from_millis(500));
    assert_eq!(config.scoring.points_original, 2);
    assert_eq!(config.scoring.points_clone, 1);
    assert_eq!(config.scoring.wrong_penalty, 1);
    assert_eq!(config.scoring.clones_per_mistake, 2);
    assert!(config.report.endpoint.is_empty());
    assert_eq!(config.report.max_retries, 0);
    assert!(config.check().is_ok());
}

#[test]
fn test_clap_defaults_agree_with_default_impl() {
    let parsed = Harness::parse_from(["test"]);
    let default = Config::default();
    assert_eq!(parsed.config.timing.settle_ms, default.timing.settle_ms);
    assert_eq!(
        parsed.config.timing.final_question_delay_ms,
        default.timing.final_question_delay_ms
    );
    assert_eq!(parsed.config.scoring.points_clone, default.scoring.points_clone);
    assert_eq!(parsed.config.report.timeout_ms, default.report.timeout_ms);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "timing": {{ "settle_ms": 250 }}, "report": {{ "endpoint": "http://localhost:9/score" }} }}"#
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).unwrap();
    assert_eq!(config.timing.settle_ms, 250);
    assert_eq!(config.timing.wrong_display_ms, 1000);
    assert_eq!(config.scoring.points_original, 2);
    assert_eq!(config.report.endpoint, "http://localhost:9/score");
}

#[test]
fn test_check_rejects_clone_worth_more() {
    let mut config = Config::default();
    config.scoring.points_clone = 3;
    assert!(config.check().is_err());
}

#[test]
fn test_check_rejects_non_http_endpoint() {
    let mut config = Config::default();
    config.report.endpoint = "ftp://example.com".to_string();
    assert!(config.check().is_err());
    config.report.endpoint = "https://example.com/api".to_string();
    assert!(config.check().is_ok());
}

#[test]
fn test_invalid_file_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "scoring": {{ "points_original": 1, "points_clone": 2 }} }}"#).unwrap();
    assert!(Config::load_from_file(file.path()).is_err());
}

#[test]
fn test_cli_flags_override_file() {
    let mut from_file = Config::default();
    from_file.timing.settle_ms = 250;
    from_file.scoring.wrong_penalty = 5;

    let matches = Harness::command().get_matches_from(["test", "--wrong-penalty", "3"]);
    let cli = Harness::from_arg_matches(&matches).unwrap();

    from_file.merge_from_cli(&cli.config, &matches);

    // typed flag wins, untouched flag keeps the file value
    assert_eq!(from_file.scoring.wrong_penalty, 3);
    assert_eq!(from_file.timing.settle_ms, 250);
}
