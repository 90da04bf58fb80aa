//! Paged row sources for the admin tables.
//!
//! [`DataSource`] hides whether paging and name search run on the backend
//! ([`ServerSource`], `range` + `ilike`) or over rows fetched once and kept in
//! memory ([`InMemorySource`]). Which one a table gets is a configuration
//! choice, see [`source_for`].

use crate::admin::Describable;
use crate::error::Result;
use crate::gateway::{Query, decode_rows};
use crate::repository::Repository;
use crate::types::PagingMode;
use std::marker::PhantomData;
use tracing::debug;

/// One page of rows plus the number of rows matching the search.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Number of pages, never less than one.
    pub fn page_count(&self, page_size: usize) -> usize {
        page_count(self.total_count, page_size)
    }
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

pub trait DataSource<T>: Send {
    /// Fetch page `page_index` (zero-based) of rows whose name contains `search`.
    fn fetch_page(&mut self, page_index: usize, page_size: usize, search: &str) -> Result<Page<T>>;

    /// Forget anything cached so the next fetch sees fresh rows.
    fn invalidate(&mut self) {}

    fn mode(&self) -> PagingMode;
}

// ============================================================================
// Server-side
// ============================================================================

pub struct ServerSource<T> {
    repository: Repository,
    _rows: PhantomData<fn() -> T>,
}

impl<T: Describable> ServerSource<T> {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            _rows: PhantomData,
        }
    }
}

impl<T: Describable> DataSource<T> for ServerSource<T> {
    fn fetch_page(&mut self, page_index: usize, page_size: usize, search: &str) -> Result<Page<T>> {
        let query = Query::all()
            .ilike("name", search)
            .order_by("id", true)
            .page(page_index, page_size);
        let page = self.repository.select_page(T::COLLECTION, &query)?;
        let rows = decode_rows(T::COLLECTION, page.rows)?;
        // A backend that omits the count still gets a usable pager.
        let total_count = page
            .total
            .unwrap_or(page_index * page_size + rows.len());
        debug!(
            "{} page {} -> {} rows of {}",
            T::COLLECTION,
            page_index,
            rows.len(),
            total_count
        );
        Ok(Page { rows, total_count })
    }

    fn mode(&self) -> PagingMode {
        PagingMode::Server
    }
}

// ============================================================================
// In-memory
// ============================================================================

pub struct InMemorySource<T> {
    repository: Repository,
    cache: Option<Vec<T>>,
}

impl<T: Describable> InMemorySource<T> {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            cache: None,
        }
    }

    fn rows(&mut self) -> Result<&[T]> {
        if self.cache.is_none() {
            let rows: Vec<T> = self
                .repository
                .fetch(T::COLLECTION, &Query::all().order_by("id", true))?;
            debug!("cached {} {} rows", rows.len(), T::COLLECTION);
            self.cache = Some(rows);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }
}

impl<T: Describable> DataSource<T> for InMemorySource<T> {
    fn fetch_page(&mut self, page_index: usize, page_size: usize, search: &str) -> Result<Page<T>> {
        let needle = search.trim().to_lowercase();
        let matching: Vec<&T> = self
            .rows()?
            .iter()
            .filter(|row| needle.is_empty() || row.name().to_lowercase().contains(&needle))
            .collect();

        let total_count = matching.len();
        let rows = matching
            .into_iter()
            .skip(page_index * page_size)
            .take(page_size)
            .cloned()
            .collect();
        Ok(Page { rows, total_count })
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }

    fn mode(&self) -> PagingMode {
        PagingMode::Client
    }
}

/// Build the source for `mode`.
pub fn source_for<T: Describable>(mode: PagingMode, repository: Repository) -> Box<dyn DataSource<T>> {
    match mode {
        PagingMode::Server => Box::new(ServerSource::<T>::new(repository)),
        PagingMode::Client => Box::new(InMemorySource::<T>::new(repository)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::model::GpuRow;
    use serde_json::json;
    use std::sync::Arc;

    fn repository() -> (Arc<MemoryGateway>, Repository) {
        let rows: Vec<_> = (1..=25)
            .map(|i| json!({"id": i, "name": format!("GPU {}", i), "rank_gpu": i}))
            .collect();
        let gateway = Arc::new(MemoryGateway::from_snapshot(&json!({ "gpus": rows })).unwrap());
        (gateway.clone(), Repository::new(gateway))
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
    }

    #[test]
    fn test_server_and_memory_agree() {
        for mode in [PagingMode::Server, PagingMode::Client] {
            let (_, repo) = repository();
            let mut source = source_for::<GpuRow>(mode, repo);
            assert_eq!(source.mode(), mode);

            let page = source.fetch_page(1, 20, "").unwrap();
            assert_eq!(page.total_count, 25);
            assert_eq!(page.rows.len(), 5);
            assert_eq!(page.rows[0].id, Some(21));

            let page = source.fetch_page(0, 20, "gpu 2").unwrap();
            let ids: Vec<_> = page.rows.iter().filter_map(|r| r.id).collect();
            assert_eq!(ids, vec![2, 20, 21, 22, 23, 24, 25]);
        }
    }

    #[test]
    fn test_memory_source_fetches_once_until_invalidated() {
        let (gateway, repo) = repository();
        let mut source = InMemorySource::<GpuRow>::new(repo);
        source.fetch_page(0, 20, "").unwrap();
        source.fetch_page(1, 20, "").unwrap();
        assert_eq!(gateway.request_count(), 1);

        source.invalidate();
        source.fetch_page(0, 20, "").unwrap();
        assert_eq!(gateway.request_count(), 2);
    }
}
