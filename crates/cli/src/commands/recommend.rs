use affinity_core::config::LoadOptions;
use affinity_core::{ApplicationError, RecommendationList, RecommendationReport, Recommender};

use crate::commands::{load_inputs, CommandResult};

pub fn run(options: &LoadOptions, user: &str, json_output: bool) -> CommandResult {
    let report = match compute(options, user) {
        Ok(report) => report,
        Err(error) => return CommandResult::from_error("recommend", &error),
    };

    if json_output {
        return CommandResult::success_json("recommend", "recommendation report built", &report);
    }

    CommandResult::human(render_human(&report))
}

fn compute(options: &LoadOptions, user: &str) -> Result<RecommendationReport, ApplicationError> {
    let (config, dataset) = load_inputs(options)?;
    let recommender = Recommender::new(config.recommendation.policy());
    Ok(recommender.report(&dataset, user, config.recommendation.metric)?)
}

fn render_human(report: &RecommendationReport) -> String {
    let mut lines = Vec::new();

    match &report.matched_user {
        Some(matched) => lines.push(format!(
            "Recommended items for user {} (closest match: {matched}, {}):",
            report.user, report.metric
        )),
        None => lines.push(format!("Recommended items for user {}:", report.user)),
    }
    render_items(&mut lines, &report.recommended);

    lines.push(format!("Items {} should avoid:", report.user));
    render_items(&mut lines, &report.discouraged);

    lines.join("\n")
}

fn render_items(lines: &mut Vec<String>, items: &RecommendationList) {
    if items.is_empty() {
        lines.push("  (none)".to_string());
    }
    for (index, entry) in items.iter().enumerate() {
        lines.push(format!("{}. {} ({})", index + 1, entry.item, entry.rating));
    }
}
