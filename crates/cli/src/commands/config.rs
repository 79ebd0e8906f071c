use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use affinity_core::config::{resolve_config_path, AppConfig, LoadOptions};
use affinity_core::ApplicationError;
use toml::Value;

use crate::commands::CommandResult;

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &ApplicationError::from(error)),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let sources = SourceContext {
        file_doc: load_config_file_doc(config_file_path.as_deref()),
        file_path: config_file_path,
    };
    let overrides = &options.overrides;

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];

    lines.push(render_line(
        "dataset.path",
        &config.dataset.path.display().to_string(),
        sources.field_source(
            "dataset.path",
            &["AFFINITY_DATASET_PATH"],
            overrides.dataset_path.is_some(),
        ),
    ));
    lines.push(render_line(
        "recommendation.metric",
        config.recommendation.metric.as_str(),
        sources.field_source(
            "recommendation.metric",
            &["AFFINITY_RECOMMENDATION_METRIC"],
            overrides.metric.is_some(),
        ),
    ));
    lines.push(render_line(
        "recommendation.limit",
        &config.recommendation.limit.to_string(),
        sources.field_source(
            "recommendation.limit",
            &["AFFINITY_RECOMMENDATION_LIMIT"],
            overrides.limit.is_some(),
        ),
    ));
    lines.push(render_line(
        "recommendation.discourage_pool",
        &config.recommendation.discourage_pool.to_string(),
        sources.field_source(
            "recommendation.discourage_pool",
            &["AFFINITY_RECOMMENDATION_DISCOURAGE_POOL"],
            false,
        ),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        sources.field_source(
            "logging.level",
            &["AFFINITY_LOGGING_LEVEL", "AFFINITY_LOG_LEVEL"],
            overrides.log_level.is_some(),
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_ascii_lowercase(),
        sources.field_source(
            "logging.format",
            &["AFFINITY_LOGGING_FORMAT", "AFFINITY_LOG_FORMAT"],
            false,
        ),
    ));

    CommandResult::human(lines.join("\n"))
}

struct SourceContext {
    file_doc: Option<Value>,
    file_path: Option<PathBuf>,
}

impl SourceContext {
    fn field_source(&self, key_path: &str, env_keys: &[&str], overridden: bool) -> String {
        if overridden {
            return "flag".to_string();
        }

        if let Some(env_key) = env_keys.iter().find(|key| is_set(key)) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.file_doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .file_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn is_set(key: &str) -> bool {
    env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
