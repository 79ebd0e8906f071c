//! Ranks candidate users by similarity to a reference user.

use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::errors::DomainError;
use crate::similarity::{euclidean_score, pearson_score, SimilarityMetric};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub user: String,
    pub score: f64,
}

/// Score entries sorted by score, highest first.
pub type RankedList = Vec<ScoreEntry>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Rankings {
    pub pearson: RankedList,
    pub euclidean: RankedList,
}

impl Rankings {
    pub fn for_metric(&self, metric: SimilarityMetric) -> &RankedList {
        match metric {
            SimilarityMetric::Pearson => &self.pearson,
            SimilarityMetric::Euclidean => &self.euclidean,
        }
    }
}

/// Every user except `exclude`, sorted by user id.
pub fn all_users(dataset: &Dataset, exclude: &str) -> Result<Vec<String>, DomainError> {
    if !dataset.contains(exclude) {
        return Err(DomainError::unknown_user(exclude));
    }

    let mut users: Vec<String> =
        dataset.users().filter(|user| *user != exclude).map(str::to_owned).collect();
    users.sort();
    Ok(users)
}

/// Scores every candidate against `reference` under both metrics.
///
/// Ties keep the order in which candidates were supplied. The reference user
/// is never part of the result.
pub fn rank<S: AsRef<str>>(
    dataset: &Dataset,
    candidates: &[S],
    reference: &str,
) -> Result<Rankings, DomainError> {
    dataset.get(reference)?;

    let mut pearson = Vec::with_capacity(candidates.len());
    let mut euclidean = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let candidate: &str = candidate.as_ref();
        if candidate == reference {
            continue;
        }
        euclidean.push(ScoreEntry {
            user: candidate.to_owned(),
            score: euclidean_score(dataset, reference, candidate)?,
        });
        pearson.push(ScoreEntry {
            user: candidate.to_owned(),
            score: pearson_score(dataset, reference, candidate)?,
        });
    }

    sort_descending(&mut pearson);
    sort_descending(&mut euclidean);

    debug!(
        event_name = "ranking.rank.completed",
        reference_user = reference,
        candidates = pearson.len(),
        "similarity rankings computed"
    );

    Ok(Rankings { pearson, euclidean })
}

fn sort_descending(entries: &mut RankedList) {
    entries.sort_by(|left, right| right.score.total_cmp(&left.score));
}
