use serde::Serialize;
use tracing::info;

use crate::dataset::Dataset;
use crate::ranking::{all_users, rank, Rankings};
use crate::similarity::SimilarityMetric;

use super::filter::{discourage, recommend_top};
use super::{RecommendationList, RecommendationPolicy, RecommendationResult};

/// Everything computed for one reference user in a single run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub user: String,
    pub metric: SimilarityMetric,
    pub rankings: Rankings,
    pub matched_user: Option<String>,
    pub recommended: RecommendationList,
    pub discouraged: RecommendationList,
}

#[derive(Clone, Debug, Default)]
pub struct Recommender {
    policy: RecommendationPolicy,
}

impl Recommender {
    pub fn new(policy: RecommendationPolicy) -> Self {
        Self { policy }
    }

    /// Ranks every other user against `user` and derives both item lists from
    /// the ranking of `metric`.
    pub fn report(
        &self,
        dataset: &Dataset,
        user: &str,
        metric: SimilarityMetric,
    ) -> RecommendationResult<RecommendationReport> {
        let candidates = all_users(dataset, user)?;
        let rankings = rank(dataset, &candidates, user)?;

        let ranking = rankings.for_metric(metric);
        let matched_user = ranking.first().map(|entry| entry.user.clone());
        let recommended = recommend_top(user, ranking, dataset, self.policy.limit)?;
        let discouraged = discourage(user, ranking, dataset, self.policy)?;

        info!(
            event_name = "recommend.report.completed",
            user,
            metric = metric.as_str(),
            matched_user = matched_user.as_deref().unwrap_or("none"),
            recommended = recommended.len(),
            discouraged = discouraged.len(),
            "recommendation report built"
        );

        Ok(RecommendationReport {
            user: user.to_owned(),
            metric,
            rankings,
            matched_user,
            recommended,
            discouraged,
        })
    }
}
