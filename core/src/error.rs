use thiserror::Error;

use crate::types::{CustomerId, WebsiteId};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("Website {0} has no stores to scope statistics to")]
    ScopeResolution(WebsiteId),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StatsResult<T> = Result<T, StatsError>;
