use std::collections::BTreeMap;

use crate::dataset::{Dataset, RatingMap};
use crate::ranking::ScoreEntry;

use super::{RecommendationList, RecommendationPolicy, RecommendationResult, RecommendedItem};

/// Up to `limit` items from `matched`, best rated first, that `reference` has not rated.
pub fn recommend(
    reference: &str,
    matched: &str,
    dataset: &Dataset,
    limit: usize,
) -> RecommendationResult<RecommendationList> {
    let seen = dataset.get(reference)?;
    let candidate_ratings = dataset.get(matched)?;

    let mut ordered: Vec<(&str, f64)> =
        candidate_ratings.iter().map(|(item, rating)| (item.as_str(), *rating)).collect();
    ordered.sort_by(|left, right| right.1.total_cmp(&left.1));

    Ok(select_unseen(ordered, seen, limit))
}

/// Recommends from the top entry of `ranking`; an empty ranking yields no items.
pub fn recommend_top(
    reference: &str,
    ranking: &[ScoreEntry],
    dataset: &Dataset,
    limit: usize,
) -> RecommendationResult<RecommendationList> {
    match ranking.first() {
        Some(best) => recommend(reference, &best.user, dataset, limit),
        None => {
            dataset.get(reference)?;
            Ok(Vec::new())
        }
    }
}

/// Up to `policy.limit` items, worst rated first, taken from the merged
/// ratings of the `policy.discourage_pool` lowest-ranked users.
///
/// When the ranking has `policy.discourage_pool` entries or fewer, the pool is
/// the whole ranking, top match included, so items only the closest user rated
/// can be discouraged too.
///
/// On a conflicting item the lower-ranked user's rating wins. The merge goes
/// into a fresh map; the dataset is left untouched.
pub fn discourage(
    reference: &str,
    ranking: &[ScoreEntry],
    dataset: &Dataset,
    policy: RecommendationPolicy,
) -> RecommendationResult<RecommendationList> {
    let seen = dataset.get(reference)?;
    let pool_start = ranking.len().saturating_sub(policy.discourage_pool);

    let mut merged: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in &ranking[pool_start..] {
        for (item, rating) in dataset.get(&entry.user)? {
            merged.insert(item.as_str(), *rating);
        }
    }

    let mut ordered: Vec<(&str, f64)> = merged.into_iter().collect();
    ordered.sort_by(|left, right| left.1.total_cmp(&right.1));

    Ok(select_unseen(ordered, seen, policy.limit))
}

fn select_unseen<'a>(
    ordered: impl IntoIterator<Item = (&'a str, f64)>,
    seen: &RatingMap,
    limit: usize,
) -> RecommendationList {
    ordered
        .into_iter()
        .filter(|(item, _)| !seen.contains_key(*item))
        .take(limit)
        .map(|(item, rating)| RecommendedItem { item: item.to_owned(), rating })
        .collect()
}
