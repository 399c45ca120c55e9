use anyhow::Context;
use bookstore_core::{Author, BookstoreConfig, Book, Catalog, Customer, PaginationConfig, User};
use bookstore_filter::{InMemoryRepository, PagedRepository};
use bookstore_policy::AccessGuard;
use bookstore_token::{KeyMaterial, TokenIssuer};
use std::{path::Path, sync::Arc};

use crate::auth::{CredentialVerifier, load_users};

/// Shared application state.
///
/// Everything in here is read-only after startup; requests share it through
/// an `Arc`.
pub struct AppState {
    pub issuer: TokenIssuer,
    pub guard: AccessGuard,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub pagination: PaginationConfig,

    pub books: Arc<dyn PagedRepository<Book>>,
    pub authors: Arc<dyn PagedRepository<Author>>,
    pub customers: Arc<dyn PagedRepository<Customer>>,
    pub users: Arc<dyn PagedRepository<User>>,
}

impl AppState {
    /// Build the state from configuration. Key material that cannot be
    /// loaded is fatal.
    pub fn init(cfg: &BookstoreConfig, config_path: &Path) -> anyhow::Result<Self> {
        let keys = KeyMaterial::from_config(&cfg.keys).context("failed to load signing key")?;
        let credentials = load_users(&cfg.users)?;

        let catalog = match cfg.seed_path(config_path) {
            Some(path) => {
                let catalog = Catalog::from_file(&path)
                    .with_context(|| format!("failed to load seed file {}", path.display()))?;
                tracing::info!(
                    path = %path.display(),
                    books = catalog.books.len(),
                    authors = catalog.authors.len(),
                    customers = catalog.customers.len(),
                    users = catalog.users.len(),
                    "loaded seed catalog"
                );
                catalog
            }
            None => Catalog::default(),
        };

        Self::new(cfg, Arc::new(keys), Arc::new(credentials), catalog)
    }

    pub fn new(
        cfg: &BookstoreConfig,
        keys: Arc<KeyMaterial>,
        credentials: Arc<dyn CredentialVerifier>,
        catalog: Catalog,
    ) -> anyhow::Result<Self> {
        let lifetime = cfg.token.lifetime()?;
        let issuer = TokenIssuer::new(keys, lifetime)?;
        let guard = AccessGuard::from_config(issuer.validator(), &cfg.access)
            .context("invalid access rules")?;

        Ok(Self {
            issuer,
            guard,
            credentials,
            pagination: cfg.pagination,
            books: Arc::new(InMemoryRepository::new(catalog.books)),
            authors: Arc::new(InMemoryRepository::new(catalog.authors)),
            customers: Arc::new(InMemoryRepository::new(catalog.customers)),
            users: Arc::new(InMemoryRepository::new(catalog.users)),
        })
    }
}
