//! Lazy paged iteration over user listings
//!
//! A [`BatchIterator`] wraps one page of a listing plus the query
//! parameters needed to ask for the next one. Advancing never mutates the
//! current iterator; each step yields a fresh immutable snapshot backed by a
//! fresh authoritative query.
//!
//! The sequence is finite (bounded by the listing's total count) and
//! restartable from any page, but it is NOT snapshot-isolated: entries can
//! shift between pages if users are inserted or deleted mid-iteration. That
//! is a property of the upstream paging model, not something this type
//! papers over.

use std::sync::Arc;

use async_trait::async_trait;

use identra_connector::error::ConnectorResult;
use identra_connector::types::{PageResult, QueryOptions};

use crate::models::RedashUser;

/// Capability handle for fetching one page of users.
///
/// The iterator holds this instead of the connector itself, so the relation
/// back to the facade carries no lifecycle coupling.
#[async_trait]
pub trait UserPageFetcher: Send + Sync {
    /// Fetch the page selected by `options` with a fresh authoritative
    /// query.
    async fn fetch_users_page(
        &self,
        options: QueryOptions,
    ) -> ConnectorResult<PageResult<RedashUser>>;
}

/// One snapshot of a paged user listing, able to fetch its successor.
pub struct BatchIterator {
    fetcher: Arc<dyn UserPageFetcher>,
    snapshot: PageResult<RedashUser>,
    order: String,
}

impl std::fmt::Debug for BatchIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchIterator")
            .field("page", &self.snapshot.page)
            .field("page_size", &self.snapshot.page_size)
            .field("count", &self.snapshot.count)
            .field("order", &self.order)
            .finish()
    }
}

impl BatchIterator {
    /// Wrap a fetched page.
    pub fn new(
        fetcher: Arc<dyn UserPageFetcher>,
        snapshot: PageResult<RedashUser>,
        order: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            snapshot,
            order: order.into(),
        }
    }

    /// The records on this page.
    pub fn results(&self) -> &[RedashUser] {
        &self.snapshot.results
    }

    /// The 1-based page number of this snapshot.
    pub fn page(&self) -> u32 {
        self.snapshot.page
    }

    /// The page size the listing was fetched with.
    pub fn page_size(&self) -> u32 {
        self.snapshot.page_size
    }

    /// Total records matching the query, across all pages.
    pub fn count(&self) -> u64 {
        self.snapshot.count
    }

    /// Whether a page exists after this one. Deterministic, no I/O.
    pub fn has_next(&self) -> bool {
        self.snapshot.has_next_page()
    }

    /// Fetch the next page as a new iterator; `Ok(None)` on the terminal
    /// page.
    pub async fn next(&self) -> ConnectorResult<Option<BatchIterator>> {
        if !self.has_next() {
            return Ok(None);
        }

        let options = QueryOptions {
            page: self.snapshot.page + 1,
            page_size: self.snapshot.page_size,
            order: self.order.clone(),
        };
        let snapshot = self.fetcher.fetch_users_page(options).await?;

        Ok(Some(BatchIterator::new(
            Arc::clone(&self.fetcher),
            snapshot,
            self.order.clone(),
        )))
    }

    /// Consume the iterator, yielding the page's records.
    pub fn into_results(self) -> Vec<RedashUser> {
        self.snapshot.results
    }
}
