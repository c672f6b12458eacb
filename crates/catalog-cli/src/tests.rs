use std::path::PathBuf;

use catalog_core::DiscoveryMode;

use super::*;

fn base_config() -> AppConfig {
    AppConfig {
        base_url: "https://www.miumiu.com".to_string(),
        market: "en".to_string(),
        country: "eu".to_string(),
        supabase_url: None,
        supabase_key: None,
        supabase_table: "products".to_string(),
        dry_run: false,
        limit: Some(10),
        output_dir: PathBuf::from("output"),
        log_level: "info".to_string(),
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_request_delay_ms: 1500,
        scraper_max_pages: 200,
        scraper_discovery: DiscoveryMode::Categories,
    }
}

#[test]
fn no_flags_parse() {
    let cli = Cli::try_parse_from(["catalog-scraper"]).expect("expected valid cli args");
    assert!(!cli.dry_run);
    assert!(cli.limit.is_none());
    assert!(cli.output_dir.is_none());
}

#[test]
fn parses_all_flags() {
    let cli = Cli::try_parse_from([
        "catalog-scraper",
        "--dry-run",
        "--limit",
        "25",
        "--output-dir",
        "/tmp/catalog",
    ])
    .expect("expected valid cli args");
    assert!(cli.dry_run);
    assert_eq!(cli.limit, Some(25));
    assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/catalog")));
}

#[test]
fn rejects_non_numeric_limit() {
    assert!(Cli::try_parse_from(["catalog-scraper", "--limit", "all"]).is_err());
}

#[test]
fn rejects_subcommands() {
    assert!(Cli::try_parse_from(["catalog-scraper", "collect"]).is_err());
}

#[test]
fn flags_override_config() {
    let cli = Cli::try_parse_from([
        "catalog-scraper",
        "--dry-run",
        "--limit",
        "3",
        "--output-dir",
        "out",
    ])
    .unwrap();
    let mut config = base_config();
    cli.apply(&mut config);
    assert!(config.dry_run);
    assert_eq!(config.limit, Some(3));
    assert_eq!(config.output_dir, PathBuf::from("out"));
}

#[test]
fn limit_zero_flag_clears_env_limit() {
    let cli = Cli::try_parse_from(["catalog-scraper", "--limit", "0"]).unwrap();
    let mut config = base_config();
    cli.apply(&mut config);
    assert!(config.limit.is_none());
}

#[test]
fn absent_flags_keep_config() {
    let cli = Cli::try_parse_from(["catalog-scraper"]).unwrap();
    let mut config = base_config();
    config.dry_run = true;
    cli.apply(&mut config);
    assert!(config.dry_run);
    assert_eq!(config.limit, Some(10));
    assert_eq!(config.output_dir, PathBuf::from("output"));
}
