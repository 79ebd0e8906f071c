//! Recommendation filter
//!
//! Turns a similarity ranking into items to suggest (highly rated by the best
//! match) and items to discourage (poorly rated by the least similar users).
//! Neither list ever contains an item the reference user already rated.

mod filter;
mod report;

pub use filter::{discourage, recommend, recommend_top};
pub use report::{RecommendationReport, Recommender};

use serde::Serialize;

use crate::errors::DomainError;

/// Result type for recommendation operations
pub type RecommendationResult<T> = Result<T, DomainError>;

/// Maximum items per recommendation list
pub const DEFAULT_LIMIT: usize = 5;

/// Number of lowest-ranked users merged for discouragement
pub const DEFAULT_DISCOURAGE_POOL: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendedItem {
    pub item: String,
    pub rating: f64,
}

pub type RecommendationList = Vec<RecommendedItem>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecommendationPolicy {
    pub limit: usize,
    pub discourage_pool: usize,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, discourage_pool: DEFAULT_DISCOURAGE_POOL }
    }
}
