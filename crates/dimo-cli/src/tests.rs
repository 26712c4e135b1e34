use std::time::Duration;

use clap::Parser;
use dimo_core::{Coordinate, RatingAggregate};
use dimo_search::{RankingSource, ScoredCandidate, SearchResult};

use super::*;

#[test]
fn parses_migrate_command() {
    let cli = Cli::try_parse_from(["dimo-cli", "migrate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Migrate));
}

#[test]
fn parses_search_command_with_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "dimo-cli",
        "search",
        "--user-id",
        "42",
        "--lat",
        "-33.86",
        "--long",
        "151.2",
        "--km-limit",
        "2.5",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Search {
            user_id,
            lat,
            km_limit,
            recsys_url,
            ..
        } => {
            assert_eq!(user_id, 42);
            assert!((lat + 33.86).abs() < f64::EPSILON);
            assert!((km_limit - 2.5).abs() < f64::EPSILON);
            assert!(recsys_url.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn search_requires_radius() {
    let result = Cli::try_parse_from([
        "dimo-cli", "search", "--user-id", "1", "--lat", "1", "--long", "2",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_store_command() {
    let cli = Cli::try_parse_from([
        "dimo-cli", "store", "--id", "7", "--lat", "10.7", "--long", "-106.7",
    ])
    .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Store { id: 7, .. }));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["dimo-cli"]).is_err());
}

fn candidate(id: i64, brand: &str, rank: u32) -> ScoredCandidate {
    ScoredCandidate {
        store_id: id,
        brand_name: brand.to_string(),
        brand_id: None,
        sub_name: "A very long branch name that will be cut".to_string(),
        category: "coffee".to_string(),
        address: "1 Dong Khoi".to_string(),
        coordinate: Coordinate {
            latitude: 0.0,
            longitude: 0.0,
        },
        distance_km: 1.25,
        rank,
        rating: RatingAggregate::default(),
    }
}

#[test]
fn format_results_prints_table_and_summary() {
    let result = SearchResult {
        stores: vec![candidate(1, "Highlands", 1), candidate(2, "Mystery", 0)],
        ranking_source: RankingSource::Popularity,
        rejected: 3,
        elapsed: Duration::from_millis(12),
    };

    let lines = search::format_results(&result);

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("ID"));
    assert!(lines[1].contains("Highlands"));
    assert!(lines[1].contains("1.250"));
    assert!(lines[1].contains("A very long branch ..."));
    assert!(lines[2].contains("Mystery"));
    assert!(lines[3].contains("ranking: popularity"));
}

#[test]
fn format_results_reports_empty_search() {
    let result = SearchResult {
        stores: Vec::new(),
        ranking_source: RankingSource::Popularity,
        rejected: 5,
        elapsed: Duration::ZERO,
    };

    let lines = search::format_results(&result);
    assert_eq!(lines, vec!["no stores in range (5 outside the radius)".to_string()]);
}
