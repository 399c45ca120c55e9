//! Paged repositories.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::RepositoryError;
use crate::page::{Page, PageRequest};
use crate::predicate::{CompiledPredicate, Filterable};

/// Storage that can answer a filtered, paginated listing.
///
/// Implementations must take the total count and the page slice from the
/// same snapshot.
#[async_trait]
pub trait PagedRepository<T>: Send + Sync {
    async fn find_page(
        &self,
        predicate: &CompiledPredicate,
        request: PageRequest,
    ) -> Result<Page<T>, RepositoryError>;
}

/// Repository over an in-memory list, kept in insertion order.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> InMemoryRepository<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn insert(&self, item: T) -> Result<(), RepositoryError> {
        self.items
            .write()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?
            .push(item);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let items = self
            .items
            .read()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        Ok(items.len())
    }
}

#[async_trait]
impl<T> PagedRepository<T> for InMemoryRepository<T>
where
    T: Filterable + Clone + Send + Sync,
{
    async fn find_page(
        &self,
        predicate: &CompiledPredicate,
        request: PageRequest,
    ) -> Result<Page<T>, RepositoryError> {
        let items = self
            .items
            .read()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        let mut total = 0u64;
        let mut page = Vec::with_capacity(request.size as usize);
        for item in items.iter().filter(|item| predicate.matches(*item)) {
            if total as usize >= request.offset() && page.len() < request.size as usize {
                page.push(item.clone());
            }
            total += 1;
        }

        tracing::debug!(
            predicate = %predicate,
            page = request.page,
            size = request.size,
            total,
            "listed page"
        );
        Ok(Page::new(page, request, total))
    }
}
