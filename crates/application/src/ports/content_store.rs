//! Content store port - Persistent lookup and merge of content records

use async_trait::async_trait;
use domain::{ContentRecord, ContentUpdate, TopicKey};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for content record persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentStorePort: Send + Sync {
    /// Fetch the record for a key
    ///
    /// A missing record is `Ok(None)`, not an error.
    async fn get(&self, key: &TopicKey) -> Result<Option<ContentRecord>, ApplicationError>;

    /// Insert or merge a record
    ///
    /// Fields absent from `update` keep their stored value. Repeating the
    /// same upsert leaves the record unchanged apart from `updated_at`.
    async fn upsert(&self, key: &TopicKey, update: ContentUpdate) -> Result<(), ApplicationError>;
}
