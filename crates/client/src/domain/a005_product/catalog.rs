use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::domain::a005_product::{ProductRow, SyncResponse};

use crate::collection::{CollectionController, ControllerError, ControllerResult};
use crate::gateway::{CatalogSyncGateway, CollectionGateway, ListQuery};

/// Каталог товаров Shopify: только чтение, серверный поиск и ресинхронизация
pub struct ProductCatalog {
    controller: CollectionController,
    sync: Arc<dyn CatalogSyncGateway>,
    syncing: AtomicBool,
}

/// Сбрасывает флаг синхронизации при любом завершении
struct SyncFlag<'a>(&'a AtomicBool);

impl Drop for SyncFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ProductCatalog {
    pub fn new<G>(gateway: Arc<G>) -> Self
    where
        G: CollectionGateway + CatalogSyncGateway + 'static,
    {
        Self {
            controller: CollectionController::new(gateway.clone()),
            sync: gateway,
            syncing: AtomicBool::new(false),
        }
    }

    pub fn controller(&self) -> &CollectionController {
        &self.controller
    }

    pub async fn load(&self) -> ControllerResult<()> {
        self.controller.initialize().await
    }

    /// Поиск по названию на сервере; пустая строка возвращает весь каталог
    pub async fn search(&self, term: &str) -> ControllerResult<()> {
        self.controller
            .set_scope(ListQuery::default().with_search(term));
        self.controller.refresh().await
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// Запустить синхронизацию с Shopify и перечитать каталог
    ///
    /// Повторный запуск во время синхронизации отклоняется без запроса.
    pub async fn sync_with_shopify(&self) -> ControllerResult<SyncResponse> {
        if self.syncing.swap(true, Ordering::SeqCst) {
            let error = ControllerError::busy("Product sync is already running");
            return Err(self.controller.reject(error));
        }
        let _flag = SyncFlag(&self.syncing);

        let response = self.sync.sync().await.map_err(|e| {
            self.controller
                .reject(ControllerError::from(e).context("Failed to sync products"))
        })?;
        tracing::info!(
            "Shopify sync finished: {} ({} products)",
            response.message.as_deref().unwrap_or("ok"),
            response
                .synced
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string())
        );

        self.controller.refresh().await?;
        Ok(response)
    }

    /// Строки таблицы для текущего отфильтрованного вида
    pub fn rows(&self) -> Vec<ProductRow> {
        self.controller
            .filtered()
            .iter()
            .map(ProductRow::from)
            .collect()
    }
}
