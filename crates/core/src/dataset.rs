//! Ratings dataset: user id -> item id -> rating.
//!
//! Both levels are ordered maps, so iterating users or items is lexicographic
//! and every computation over a `Dataset` is reproducible.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::DomainError;

/// Ratings of a single user, keyed by item id.
pub type RatingMap = BTreeMap<String, f64>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read dataset file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dataset contains an empty user id")]
    EmptyUserId,
    #[error("rating for `{item}` by `{user}` is not a finite number")]
    NonFiniteRating { user: String, item: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    users: BTreeMap<String, RatingMap>,
}

impl Dataset {
    /// Builds a dataset from `(user, ratings)` pairs. A repeated user id keeps
    /// the last ratings supplied for it.
    pub fn from_users<U, R, I>(users: U) -> Result<Self, DatasetError>
    where
        U: IntoIterator<Item = (String, R)>,
        R: IntoIterator<Item = (I, f64)>,
        I: Into<String>,
    {
        let users: BTreeMap<String, RatingMap> = users
            .into_iter()
            .map(|(user, ratings)| {
                let ratings: RatingMap =
                    ratings.into_iter().map(|(item, rating)| (item.into(), rating)).collect();
                (user, ratings)
            })
            .collect();

        let dataset = Self { users };
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        let dataset: Self = serde_json::from_str(raw)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| DatasetError::ReadFile { path: path.to_path_buf(), source })?;

        let dataset = Self::from_json_str(&raw)?;
        debug!(
            event_name = "dataset.load.completed",
            path = %path.display(),
            users = dataset.len(),
            "ratings dataset loaded"
        );
        Ok(dataset)
    }

    /// Ratings of `user`, failing with `UnknownUser` when absent.
    pub fn get(&self, user: &str) -> Result<&RatingMap, DomainError> {
        self.users.get(user).ok_or_else(|| DomainError::unknown_user(user))
    }

    pub fn contains(&self, user: &str) -> bool {
        self.users.contains_key(user)
    }

    /// User ids in lexicographic order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn validate(&self) -> Result<(), DatasetError> {
        for (user, ratings) in &self.users {
            if user.trim().is_empty() {
                return Err(DatasetError::EmptyUserId);
            }
            if let Some((item, _)) = ratings.iter().find(|(_, rating)| !rating.is_finite()) {
                return Err(DatasetError::NonFiniteRating {
                    user: user.clone(),
                    item: item.clone(),
                });
            }
        }
        Ok(())
    }
}
