use affinity_core::config::LoadOptions;
use affinity_core::{all_users, rank, ApplicationError, RankedList, Rankings};
use serde::Serialize;

use crate::commands::{load_inputs, CommandResult};

#[derive(Debug, Serialize)]
struct RankOutput {
    user: String,
    rankings: Rankings,
}

pub fn run(options: &LoadOptions, user: &str, json_output: bool) -> CommandResult {
    let output = match compute(options, user) {
        Ok(output) => output,
        Err(error) => return CommandResult::from_error("rank", &error),
    };

    if json_output {
        return CommandResult::success_json("rank", "similarity rankings computed", &output);
    }

    CommandResult::human(render_human(&output))
}

fn compute(options: &LoadOptions, user: &str) -> Result<RankOutput, ApplicationError> {
    let (_, dataset) = load_inputs(options)?;
    let candidates = all_users(&dataset, user)?;
    let rankings = rank(&dataset, &candidates, user)?;
    Ok(RankOutput { user: user.to_owned(), rankings })
}

fn render_human(output: &RankOutput) -> String {
    let mut lines = Vec::new();
    render_ranking(&mut lines, "pearson", &output.user, &output.rankings.pearson);
    render_ranking(&mut lines, "euclidean", &output.user, &output.rankings.euclidean);
    lines.join("\n")
}

fn render_ranking(lines: &mut Vec<String>, metric: &str, user: &str, ranking: &RankedList) {
    lines.push(format!("{metric} ranking for {user}:"));
    if ranking.is_empty() {
        lines.push("  (no other users)".to_string());
    }
    for (index, entry) in ranking.iter().enumerate() {
        lines.push(format!("{}. {} ({:.4})", index + 1, entry.user, entry.score));
    }
}
