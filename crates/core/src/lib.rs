pub mod config;
pub mod dataset;
pub mod errors;
pub mod ranking;
pub mod recommend;
pub mod similarity;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use dataset::{Dataset, DatasetError, RatingMap};
pub use errors::{ApplicationError, DomainError};
pub use ranking::{all_users, rank, RankedList, Rankings, ScoreEntry};
pub use recommend::{
    discourage, recommend, recommend_top, RecommendationList, RecommendationPolicy,
    RecommendationReport, RecommendedItem, Recommender,
};
pub use similarity::{common_items, euclidean_score, pearson_score, SimilarityMetric};
