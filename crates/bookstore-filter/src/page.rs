//! Page requests and pages of results.

use bookstore_core::PaginationConfig;
use serde::Serialize;

use crate::error::FilterError;

/// Zero-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        let config = PaginationConfig::default();
        Self {
            page: 0,
            size: config.default_page_size,
        }
    }
}

impl PageRequest {
    /// Build a request, clamping the size to `[1, max_page_size]`.
    pub fn new(page: u32, size: u32, config: PaginationConfig) -> Self {
        Self {
            page,
            size: size.clamp(1, config.max_page_size.max(1)),
        }
    }

    /// Read `page` and `size` from query parameters. Missing or blank values
    /// fall back to the first page and the configured default size.
    pub fn from_query<I, K, V>(params: I, config: PaginationConfig) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut page = 0;
        let mut size = config.default_page_size;
        for (name, raw) in params {
            let (name, raw) = (name.as_ref(), raw.as_ref());
            let target = match name {
                "page" => &mut page,
                "size" => &mut size,
                _ => continue,
            };
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            *target = trimmed
                .parse()
                .map_err(|_| FilterError::invalid(name, raw, "a non-negative integer"))?;
        }
        Ok(Self::new(page, size, config))
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.size.max(1))),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
