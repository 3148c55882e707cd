//! # Blocklist upkeep
//!
//! Admin operations on the single blocklist record.

use std::sync::Arc;

use domains::{Blocklist, BlocklistRepository, DomainError, DomainResult};
use tracing::info;

pub struct BlocklistService {
    repo: Arc<dyn BlocklistRepository>,
}

impl BlocklistService {
    pub fn new(repo: Arc<dyn BlocklistRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> DomainResult<Vec<String>> {
        Ok(self.repo.load().await?.into_terms())
    }

    /// Adds a term, rejecting blanks and case-insensitive duplicates.
    pub async fn add(&self, term: &str) -> DomainResult<Vec<String>> {
        let normalized = Blocklist::normalize(term);
        if normalized.is_empty() {
            return Err(DomainError::EmptyInput { field: "term" });
        }

        let mut blocklist = self.repo.load().await?;
        if !blocklist.insert(&normalized) {
            return Err(DomainError::Conflict(format!(
                "'{normalized}' is already blocklisted"
            )));
        }
        self.repo.save(&blocklist).await?;

        info!(total = blocklist.terms().len(), "blocklist term added");
        Ok(blocklist.into_terms())
    }

    pub async fn remove(&self, term: &str) -> DomainResult<Vec<String>> {
        let mut blocklist = self.repo.load().await?;
        if !blocklist.remove(term) {
            return Err(DomainError::not_found("blocklist term", Blocklist::normalize(term)));
        }
        self.repo.save(&blocklist).await?;

        info!(total = blocklist.terms().len(), "blocklist term removed");
        Ok(blocklist.into_terms())
    }
}
