use affinity_core::config::LoadOptions;
use affinity_core::{common_items, euclidean_score, pearson_score, ApplicationError};
use serde::Serialize;

use crate::commands::{load_inputs, CommandResult};

#[derive(Debug, Serialize)]
struct PairScore {
    user: String,
    other: String,
    common_items: usize,
    pearson: f64,
    euclidean: f64,
}

pub fn run(options: &LoadOptions, user: &str, other: &str, json_output: bool) -> CommandResult {
    let score = match compute(options, user, other) {
        Ok(score) => score,
        Err(error) => return CommandResult::from_error("score", &error),
    };

    if json_output {
        return CommandResult::success_json("score", "similarity scores computed", &score);
    }

    CommandResult::human(render_human(&score))
}

fn compute(options: &LoadOptions, user: &str, other: &str) -> Result<PairScore, ApplicationError> {
    let (_, dataset) = load_inputs(options)?;

    let pearson = pearson_score(&dataset, user, other)?;
    let euclidean = euclidean_score(&dataset, user, other)?;
    let shared = common_items(dataset.get(user)?, dataset.get(other)?).len();

    Ok(PairScore {
        user: user.to_owned(),
        other: other.to_owned(),
        common_items: shared,
        pearson,
        euclidean,
    })
}

fn render_human(score: &PairScore) -> String {
    let mut lines = vec![format!(
        "similarity between {} and {} ({} common items):",
        score.user, score.other, score.common_items
    )];
    lines.push(format!("- pearson = {:.4}", score.pearson));
    lines.push(format!("- euclidean = {:.4}", score.euclidean));
    lines.join("\n")
}
