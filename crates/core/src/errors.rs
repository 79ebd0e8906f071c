use thiserror::Error;

use crate::{config::ConfigError, dataset::DatasetError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot find `{user}` in the dataset")]
    UnknownUser { user: String },
}

impl DomainError {
    pub fn unknown_user(user: impl Into<String>) -> Self {
        Self::UnknownUser { user: user.into() }
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::Dataset(_) => "dataset_load",
            Self::Domain(DomainError::UnknownUser { .. }) => "unknown_user",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Dataset(_) => 3,
            Self::Domain(_) => 4,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "The configuration is invalid. Check config file and env.",
            Self::Dataset(_) => "The ratings dataset could not be loaded.",
            Self::Domain(DomainError::UnknownUser { .. }) => {
                "The requested user does not exist in the dataset."
            }
        }
    }
}
