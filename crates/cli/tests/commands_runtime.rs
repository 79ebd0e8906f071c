use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use affinity_cli::commands::{config, rank, recommend, score};
use affinity_core::config::{ConfigOverrides, LoadOptions};
use serde_json::Value;
use tempfile::TempDir;

const RATINGS: &str = r#"{
    "Alice": { "Inception": 5, "Up": 3, "Heat": 4 },
    "Bob":   { "Inception": 5, "Up": 3, "Heat": 4, "Alien": 4.5, "Cars": 1 },
    "Carol": { "Inception": 1, "Up": 5, "Heat": 2, "Brave": 0.5, "Cats": 1 },
    "Dave":  { "Dune": 2 }
}"#;

#[test]
fn score_reports_both_metrics_as_json() {
    with_dataset(RATINGS, &[], |options| {
        let result = score::run(options, "Alice", "Bob", true);
        assert_eq!(result.exit_code, 0, "expected successful score");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "score");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["euclidean"], 1.0);
        assert_eq!(payload["data"]["common_items"], 3);
    });
}

#[test]
fn score_renders_human_output() {
    with_dataset(RATINGS, &[], |options| {
        let result = score::run(options, "Alice", "Dave", false);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("similarity between Alice and Dave (0 common items)"));
        assert!(result.output.contains("- pearson = 0.0000"));
        assert!(result.output.contains("- euclidean = 0.0000"));
    });
}

#[test]
fn rank_orders_users_by_similarity() {
    with_dataset(RATINGS, &[], |options| {
        let result = rank::run(options, "Alice", true);
        assert_eq!(result.exit_code, 0, "expected successful rank");

        let payload = parse_payload(&result.output);
        let pearson: Vec<&str> = payload["data"]["rankings"]["pearson"]
            .as_array()
            .expect("pearson ranking array")
            .iter()
            .filter_map(|entry| entry["user"].as_str())
            .collect();
        assert_eq!(pearson, vec!["Bob", "Dave", "Carol"]);
    });
}

#[test]
fn recommend_excludes_items_already_rated() {
    with_dataset(RATINGS, &[], |options| {
        let result = recommend::run(options, "Alice", true);
        assert_eq!(result.exit_code, 0, "expected successful recommend");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["matched_user"], "Bob");

        let recommended: Vec<&str> = payload["data"]["recommended"]
            .as_array()
            .expect("recommended array")
            .iter()
            .filter_map(|entry| entry["item"].as_str())
            .collect();
        assert_eq!(recommended, vec!["Alien", "Cars"]);

        let discouraged = payload["data"]["discouraged"].as_array().expect("discouraged array");
        assert!(discouraged.len() <= 5);
        for entry in discouraged {
            let item = entry["item"].as_str().unwrap_or_default();
            assert!(!["Inception", "Up", "Heat"].contains(&item));
        }
    });
}

#[test]
fn recommend_honors_limit_from_env() {
    with_dataset(RATINGS, &[("AFFINITY_RECOMMENDATION_LIMIT", "1")], |options| {
        let result = recommend::run(options, "Alice", true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["recommended"].as_array().map(Vec::len), Some(1));
        assert_eq!(payload["data"]["recommended"][0]["item"], "Alien");
    });
}

#[test]
fn recommend_renders_numbered_lists() {
    with_dataset(RATINGS, &[], |options| {
        let result = recommend::run(options, "Alice", false);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("Recommended items for user Alice"));
        assert!(result.output.contains("1. Alien (4.5)"));
        assert!(result.output.contains("Items Alice should avoid:"));
    });
}

#[test]
fn unknown_user_is_a_fatal_structured_error() {
    with_dataset(RATINGS, &[], |options| {
        for result in [
            score::run(options, "Alice", "Mallory", false),
            rank::run(options, "Mallory", false),
            recommend::run(options, "Mallory", false),
        ] {
            assert_eq!(result.exit_code, 4, "expected unknown user exit code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["status"], "error");
            assert_eq!(payload["error_class"], "unknown_user");
            assert!(payload["message"].as_str().unwrap_or_default().contains("Mallory"));
        }
    });
}

#[test]
fn malformed_dataset_reports_dataset_error() {
    with_dataset(r#"{ "Alice": ["not", "a", "map"] }"#, &[], |options| {
        let result = rank::run(options, "Alice", false);
        assert_eq!(result.exit_code, 3, "expected dataset failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "rank");
        assert_eq!(payload["error_class"], "dataset_load");
    });
}

#[test]
fn missing_dataset_file_reports_dataset_error() {
    with_env(&[], || {
        let options = options_for(PathBuf::from("definitely/not/here/ratings.json"));
        let result = recommend::run(&options, "Alice", false);
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "dataset_load");
    });
}

#[test]
fn invalid_config_reports_config_error() {
    with_dataset(RATINGS, &[("AFFINITY_LOG_LEVEL", "loud")], |options| {
        let result = score::run(options, "Alice", "Bob", false);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn config_reports_sources() {
    with_dataset(RATINGS, &[("AFFINITY_RECOMMENDATION_METRIC", "euclidean")], |options| {
        let result = config::run(options);
        assert_eq!(result.exit_code, 0);
        let output = result.output;
        assert!(output.contains("(source: flag)"), "dataset path comes from override");
        assert!(output.contains(
            "- recommendation.metric = euclidean (source: env (AFFINITY_RECOMMENDATION_METRIC))"
        ));
        assert!(output.contains("- recommendation.limit = 5 (source: default)"));
    });
}

#[test]
fn config_command_reports_invalid_config_as_json() {
    with_dataset(RATINGS, &[("AFFINITY_LOG_LEVEL", "loud")], |options| {
        let result = config::run(options);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn explicit_missing_config_file_is_a_config_error() {
    with_dataset(RATINGS, &[], |options| {
        let dir = TempDir::new().expect("temp dir should be created");
        let options = LoadOptions {
            config_path: Some(dir.path().join("affinty.toml")),
            ..options.clone()
        };

        let result = score::run(&options, "Alice", "Bob", false);
        assert_eq!(result.exit_code, 2, "expected config failure for a missing --config file");
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");

        let result = config::run(&options);
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["command"], "config");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn options_for(dataset_path: PathBuf) -> LoadOptions {
    LoadOptions {
        overrides: ConfigOverrides {
            dataset_path: Some(dataset_path),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    }
}

fn with_dataset(raw: &str, vars: &[(&str, &str)], test_fn: impl FnOnce(&LoadOptions)) {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = dir.path().join("ratings.json");
    fs::write(&path, raw).expect("dataset should be written");

    let options = options_for(path);
    with_env(vars, || test_fn(&options));
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "AFFINITY_DATASET_PATH",
        "AFFINITY_RECOMMENDATION_METRIC",
        "AFFINITY_RECOMMENDATION_LIMIT",
        "AFFINITY_RECOMMENDATION_DISCOURAGE_POOL",
        "AFFINITY_LOGGING_LEVEL",
        "AFFINITY_LOGGING_FORMAT",
        "AFFINITY_LOG_LEVEL",
        "AFFINITY_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
