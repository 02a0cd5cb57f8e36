pub mod a005_product;

use std::sync::Arc;

use contracts::domain::common::EntitySchema;

use crate::collection::CollectionController;
use crate::gateway::HttpGateway;
use crate::system::auth::Session;

/// Контроллер коллекции поверх REST API
pub fn http_controller(session: Arc<Session>, schema: &'static EntitySchema) -> CollectionController {
    CollectionController::new(Arc::new(HttpGateway::new(session, schema)))
}
