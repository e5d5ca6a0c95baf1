use std::sync::Arc;
use crate::books::factory;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;

pub(crate) async fn create_catalog_service(config: &Configuration) -> Arc<dyn CatalogService> {
    let book_repo = factory::create_book_repository(config).await;
    Arc::new(CatalogServiceImpl::new(config, book_repo))
}
