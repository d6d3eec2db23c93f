//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use vault_auth::JwtDecoder;
use vault_core::config::AppConfig;
use vault_core::error::AppError;
use vault_database::VaultStore;
use vault_service::{AccessService, FolderService, ItemService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Resource store (Postgres or memory)
    pub store: Arc<dyn VaultStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// Access token validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub folder_service: Arc<FolderService>,
    pub item_service: Arc<ItemService>,
    pub access_service: Arc<AccessService>,
}

impl AppState {
    /// Wires the services over `store`.
    pub fn new(config: AppConfig, store: Arc<dyn VaultStore>) -> Result<Self, AppError> {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth)?);
        let access_service = Arc::new(AccessService::new(Arc::clone(&store), &config.sharing));
        let folder_service = Arc::new(FolderService::new(
            Arc::clone(&store),
            Arc::clone(&access_service),
        ));
        let item_service = Arc::new(ItemService::new(
            Arc::clone(&store),
            Arc::clone(&access_service),
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            jwt_decoder,
            folder_service,
            item_service,
            access_service,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("access_service", &self.access_service)
            .finish_non_exhaustive()
    }
}
