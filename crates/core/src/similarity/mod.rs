//! User-to-user similarity metrics over commonly rated items.
//!
//! Both metrics return exactly `0.0` when the users share no items. That value
//! can coincide with a genuine zero correlation; use [`common_items`] when the
//! two cases must be told apart.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, RatingMap};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Pearson,
    Euclidean,
}

impl SimilarityMetric {
    pub fn score(self, dataset: &Dataset, left: &str, right: &str) -> Result<f64, DomainError> {
        match self {
            Self::Pearson => pearson_score(dataset, left, right),
            Self::Euclidean => euclidean_score(dataset, left, right),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Euclidean => "euclidean",
        }
    }
}

impl std::fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SimilarityMetric {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            "euclidean" => Ok(Self::Euclidean),
            other => Err(format!("unsupported metric `{other}` (expected pearson|euclidean)")),
        }
    }
}

/// Items rated by both users, in item-id order.
pub fn common_items<'a>(left: &'a RatingMap, right: &RatingMap) -> Vec<&'a str> {
    left.keys().filter(|item| right.contains_key(*item)).map(String::as_str).collect()
}

/// `1 / (1 + sqrt(sum of squared differences))`, in `(0, 1]` when any item is shared.
pub fn euclidean_score(dataset: &Dataset, left: &str, right: &str) -> Result<f64, DomainError> {
    let (left, right) = lookup_pair(dataset, left, right)?;
    let pairs = rating_pairs(left, right);
    if pairs.is_empty() {
        return Ok(0.0);
    }

    let squared_diff: f64 = pairs.iter().map(|(a, b)| (a - b).powi(2)).sum();
    Ok(1.0 / (1.0 + squared_diff.sqrt()))
}

/// Pearson correlation of the shared ratings.
///
/// Returns `0.0` when the variance product is exactly zero, i.e. one side
/// rated every shared item the same.
pub fn pearson_score(dataset: &Dataset, left: &str, right: &str) -> Result<f64, DomainError> {
    let (left, right) = lookup_pair(dataset, left, right)?;
    let pairs = rating_pairs(left, right);
    if pairs.is_empty() {
        return Ok(0.0);
    }

    let n = pairs.len() as f64;
    let mut left_sum = 0.0;
    let mut right_sum = 0.0;
    let mut left_squared_sum = 0.0;
    let mut right_squared_sum = 0.0;
    let mut sum_of_products = 0.0;
    for (a, b) in &pairs {
        left_sum += a;
        right_sum += b;
        left_squared_sum += a * a;
        right_squared_sum += b * b;
        sum_of_products += a * b;
    }

    let sxy = sum_of_products - left_sum * right_sum / n;
    let sxx = left_squared_sum - left_sum * left_sum / n;
    let syy = right_squared_sum - right_sum * right_sum / n;

    let variance_product = sxx * syy;
    if variance_product == 0.0 {
        return Ok(0.0);
    }

    Ok(sxy / variance_product.sqrt())
}

fn lookup_pair<'a>(
    dataset: &'a Dataset,
    left: &str,
    right: &str,
) -> Result<(&'a RatingMap, &'a RatingMap), DomainError> {
    Ok((dataset.get(left)?, dataset.get(right)?))
}

fn rating_pairs(left: &RatingMap, right: &RatingMap) -> Vec<(f64, f64)> {
    left.iter()
        .filter_map(|(item, a)| right.get(item).map(|b| (*a, *b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::dataset::fixtures::{dataset, scenario};
    use crate::errors::DomainError;

    use super::{common_items, euclidean_score, pearson_score, SimilarityMetric};

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn identical_overlap_scores_one_under_euclidean() {
        let data = scenario();
        assert_eq!(euclidean_score(&data, "A", "B"), Ok(1.0));
    }

    #[test]
    fn self_similarity_is_one_under_euclidean() {
        let data = scenario();
        for user in ["A", "B", "C"] {
            assert_eq!(euclidean_score(&data, user, user), Ok(1.0));
        }
    }

    #[test]
    fn disjoint_users_score_zero_under_both_metrics() {
        let data = scenario();
        assert_eq!(euclidean_score(&data, "A", "C"), Ok(0.0));
        assert_eq!(pearson_score(&data, "A", "C"), Ok(0.0));
    }

    #[test]
    fn euclidean_matches_closed_form() {
        let data = dataset(&[
            ("x", &[("a", 1.0), ("b", 4.0), ("only-x", 2.0)]),
            ("y", &[("a", 4.0), ("b", 0.0)]),
        ]);

        let score = euclidean_score(&data, "x", "y").expect("score");
        // sqrt(3^2 + 4^2) = 5
        assert!((score - 1.0 / 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn pearson_detects_perfect_positive_and_negative_correlation() {
        let data = dataset(&[
            ("x", &[("a", 1.0), ("b", 2.0), ("c", 3.0)]),
            ("up", &[("a", 2.0), ("b", 4.0), ("c", 6.0)]),
            ("down", &[("a", 3.0), ("b", 2.0), ("c", 1.0)]),
        ]);

        let positive = pearson_score(&data, "x", "up").expect("score");
        let negative = pearson_score(&data, "x", "down").expect("score");
        assert!((positive - 1.0).abs() < TOLERANCE);
        assert!((negative + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn pearson_returns_zero_for_constant_ratings() {
        let data = dataset(&[
            ("flat", &[("a", 3.0), ("b", 3.0), ("c", 3.0)]),
            ("varied", &[("a", 1.0), ("b", 5.0), ("c", 2.0)]),
        ]);

        assert_eq!(pearson_score(&data, "flat", "varied"), Ok(0.0));
        assert_eq!(pearson_score(&data, "varied", "flat"), Ok(0.0));
    }

    #[test]
    fn pearson_single_shared_item_is_degenerate() {
        let data = dataset(&[("A", &[("m1", 5.0)]), ("C", &[("m1", 1.0), ("m9", 2.0)])]);
        assert_eq!(pearson_score(&data, "A", "C"), Ok(0.0));
        assert!(euclidean_score(&data, "A", "C").expect("euclidean") > 0.0);
    }

    #[test]
    fn metrics_are_symmetric_and_bounded() {
        let data = dataset(&[
            ("p", &[("a", 2.5), ("b", 3.5), ("c", 3.0), ("d", 3.5), ("e", 2.5)]),
            ("q", &[("a", 3.0), ("b", 3.5), ("c", 1.5), ("d", 5.0), ("e", 3.5), ("f", 3.0)]),
            ("r", &[("b", 1.0), ("c", 4.5), ("e", 2.0), ("f", 4.0)]),
        ]);
        let users = ["p", "q", "r"];

        for left in users {
            for right in users {
                let pearson = pearson_score(&data, left, right).expect("pearson");
                let reversed = pearson_score(&data, right, left).expect("pearson");
                assert!((pearson - reversed).abs() < TOLERANCE);
                assert!((-1.0 - TOLERANCE..=1.0 + TOLERANCE).contains(&pearson));

                let euclidean = euclidean_score(&data, left, right).expect("euclidean");
                let reversed = euclidean_score(&data, right, left).expect("euclidean");
                assert!((euclidean - reversed).abs() < TOLERANCE);
                assert!(euclidean > 0.0 && euclidean <= 1.0);
            }
        }
    }

    #[test]
    fn unknown_user_is_an_error_not_zero() {
        let data = scenario();

        assert_eq!(euclidean_score(&data, "A", "Z"), Err(DomainError::unknown_user("Z")));
        assert_eq!(euclidean_score(&data, "Z", "A"), Err(DomainError::unknown_user("Z")));
        assert_eq!(pearson_score(&data, "A", "Z"), Err(DomainError::unknown_user("Z")));
        assert_eq!(pearson_score(&data, "Y", "Z"), Err(DomainError::unknown_user("Y")));
    }

    #[test]
    fn common_items_are_the_intersection() {
        let data = scenario();
        let a = data.get("A").expect("A");
        let b = data.get("B").expect("B");
        let c = data.get("C").expect("C");

        assert_eq!(common_items(a, b), vec!["m1", "m2"]);
        assert!(common_items(a, c).is_empty());
    }

    #[test]
    fn metric_dispatch_and_parsing() {
        let data = scenario();
        assert_eq!(SimilarityMetric::Euclidean.score(&data, "A", "B"), Ok(1.0));
        assert_eq!(SimilarityMetric::Pearson.score(&data, "A", "C"), Ok(0.0));

        assert_eq!(" Pearson ".parse::<SimilarityMetric>(), Ok(SimilarityMetric::Pearson));
        assert_eq!("euclidean".parse::<SimilarityMetric>(), Ok(SimilarityMetric::Euclidean));
        assert!("cosine".parse::<SimilarityMetric>().is_err());
        assert_eq!(SimilarityMetric::default().to_string(), "pearson");
    }
}
