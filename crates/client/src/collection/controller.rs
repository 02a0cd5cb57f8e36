use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::domain::common::{Entity, EntityId, EntitySchema, Fields};

use super::draft::Draft;
use super::edit_session::EditSession;
use super::error::{ControllerError, ControllerResult};
use super::filter::FilterState;
use super::reorder::move_item;
use crate::gateway::{CollectionGateway, ErrorKind, ListQuery};

/// Пользовательский фильтр вместо стандартного (категория + поиск)
pub type FilterPredicate = Arc<dyn Fn(&Entity, &FilterState) -> bool + Send + Sync>;

#[derive(Default)]
struct ControllerState {
    items: Vec<Entity>,
    /// Порядок, последний подтверждённый сервером
    confirmed_order: Vec<EntityId>,
    confirmed_seq: u64,
    reorder_seq: u64,
    pending_reorders: usize,
    scope: ListQuery,
    filter: FilterState,
    loading: bool,
    loaded: bool,
    last_error: Option<ControllerError>,
    session: EditSession,
    /// ID записей, по которым сейчас выполняется запрос
    in_flight: HashSet<EntityId>,
    /// Неподтверждённые удаления: порядок со всеми ID отправлять нельзя
    deleting: HashSet<EntityId>,
}

impl ControllerState {
    fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|e| e.id.clone()).collect()
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|e| &e.id == id)
    }

    /// Расставить записи по списку ID; записи вне списка идут в конце
    fn arrange(&mut self, order: &[EntityId], orderable: bool) {
        let rank = |entity: &Entity| {
            order
                .iter()
                .position(|id| id == &entity.id)
                .unwrap_or(usize::MAX)
        };
        self.items.sort_by_key(rank);
        if orderable {
            for (index, entity) in self.items.iter_mut().enumerate() {
                entity.order = Some(index as i64);
            }
        }
    }
}

/// Управляемая коллекция одного вида записей
///
/// Создание, изменение и удаление пессимистичны: список меняется после
/// ответа сервера. Перестановка оптимистична: новый порядок виден сразу,
/// при ошибке восстанавливается последний подтверждённый.
///
/// Состояние под `Mutex`, который не удерживается через `.await`;
/// повторная операция над записью с незавершённым запросом отклоняется (`Busy`).
pub struct CollectionController {
    schema: &'static EntitySchema,
    gateway: Arc<dyn CollectionGateway>,
    predicate: Option<FilterPredicate>,
    state: Mutex<ControllerState>,
}

impl CollectionController {
    pub fn new(gateway: Arc<dyn CollectionGateway>) -> Self {
        Self {
            schema: gateway.schema(),
            gateway,
            predicate: None,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Серверная выборка (например, страницы одной подкатегории)
    pub fn with_scope(self, scope: ListQuery) -> Self {
        self.state().scope = scope;
        self
    }

    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&Entity, &FilterState) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn element(&self) -> String {
        self.schema.element_name.to_lowercase()
    }

    fn list_name(&self) -> String {
        self.schema.list_name.to_lowercase()
    }

    /// Запомнить ошибку как последнюю и вернуть её
    fn fail(&self, state: &mut ControllerState, error: ControllerError) -> ControllerError {
        tracing::warn!("{}: {}", self.schema.kind, error);
        state.last_error = Some(error.clone());
        error
    }

    /// Записать ошибку операции, выполненной в обход шлюза коллекции
    pub(crate) fn reject(&self, error: ControllerError) -> ControllerError {
        let mut state = self.state();
        self.fail(&mut state, error)
    }

    fn ensure_writable(&self) -> ControllerResult<()> {
        if self.schema.read_only {
            return Err(self.reject(ControllerError::new(
                ErrorKind::Validation,
                format!("{} are read-only", self.schema.list_name),
            )));
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Загрузка
    // ---------------------------------------------------------------------

    /// Загрузить список; при ошибке предыдущий список сохраняется
    pub async fn initialize(&self) -> ControllerResult<()> {
        let scope = {
            let mut state = self.state();
            state.loading = true;
            state.scope.clone()
        };

        let result = self.gateway.list(&scope).await;

        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(items) => {
                tracing::info!("Loaded {} {}", items.len(), self.list_name());
                state.confirmed_order = items.iter().map(|e| e.id.clone()).collect();
                state.items = items;
                state.loaded = true;
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                let error = ControllerError::from(e)
                    .context(&format!("Failed to load {}", self.list_name()));
                Err(self.fail(&mut state, error))
            }
        }
    }

    pub async fn refresh(&self) -> ControllerResult<()> {
        self.initialize().await
    }

    /// Сменить серверную выборку; список обновляется через `refresh`
    pub fn set_scope(&self, scope: ListQuery) {
        self.state().scope = scope;
    }

    pub fn scope(&self) -> ListQuery {
        self.state().scope.clone()
    }

    /// Загрузить запись целиком и обновить её в списке
    pub async fn load_detail(&self, id: &EntityId) -> ControllerResult<Entity> {
        let result = self.gateway.get(id).await;

        let mut state = self.state();
        match result {
            Ok(entity) => {
                if let Some(index) = state.position(id) {
                    let order = state.items[index].order;
                    state.items[index] = Entity {
                        order: entity.order.or(order),
                        ..entity.clone()
                    };
                }
                Ok(entity)
            }
            Err(e) => {
                let error = ControllerError::from(e)
                    .context(&format!("Failed to load {}", self.element()));
                Err(self.fail(&mut state, error))
            }
        }
    }

    // ---------------------------------------------------------------------
    // Создание / изменение / удаление
    // ---------------------------------------------------------------------

    fn validate(&self, fields: &Fields) -> ControllerResult<()> {
        Draft::from_fields(fields.clone())
            .validate(self.schema)
            .map_err(ControllerError::validation)
    }

    /// Создать запись; успешный результат добавляется в конец списка
    ///
    /// Открытая форма создания переходит в `Submitting` на время запроса
    /// и остаётся открытой с ошибкой при неудаче.
    pub async fn submit_create(&self, fields: Fields) -> ControllerResult<Entity> {
        self.ensure_writable()?;

        let owns_session = {
            let mut state = self.state();
            if state.session.is_submitting() {
                let error = ControllerError::busy("Form is already being submitted");
                return Err(self.fail(&mut state, error));
            }
            if let Err(error) = self.validate(&fields) {
                state.session.set_error(error.clone());
                return Err(self.fail(&mut state, error));
            }
            let owns = matches!(state.session, EditSession::Creating { .. });
            if owns {
                state.session = EditSession::Creating {
                    draft: Draft::from_fields(fields.clone()),
                    error: None,
                };
                state.session.begin_submit()?;
            }
            owns
        };

        let result = self.gateway.create(&fields).await;

        let mut state = self.state();
        match result {
            Ok(entity) => {
                tracing::info!("Created {} {}", self.element(), entity.id);
                state.confirmed_order.push(entity.id.clone());
                state.items.push(entity.clone());
                state.last_error = None;
                if owns_session {
                    state.session.finish_ok();
                }
                Ok(entity)
            }
            Err(e) => {
                let error = ControllerError::from(e)
                    .context(&format!("Failed to create {}", self.element()));
                if owns_session {
                    state.session.finish_err(error.clone());
                }
                Err(self.fail(&mut state, error))
            }
        }
    }

    /// Изменить запись; результат заменяет её на прежнем месте
    pub async fn submit_update(&self, id: &EntityId, fields: Fields) -> ControllerResult<Entity> {
        self.ensure_writable()?;

        let owns_session = {
            let mut state = self.state();
            if state.in_flight.contains(id) {
                let error = ControllerError::busy(format!(
                    "{} {} is already being saved",
                    self.schema.element_name, id
                ));
                return Err(self.fail(&mut state, error));
            }
            if state.position(id).is_none() {
                let error = ControllerError::not_found(format!(
                    "{} {} not found",
                    self.schema.element_name, id
                ));
                return Err(self.fail(&mut state, error));
            }
            if let Err(error) = self.validate(&fields) {
                if state.session.editing_id() == Some(id) {
                    state.session.set_error(error.clone());
                }
                return Err(self.fail(&mut state, error));
            }

            state.in_flight.insert(id.clone());
            let owns = matches!(&state.session, EditSession::Editing { id: editing, .. } if editing == id);
            if owns {
                state.session = EditSession::Editing {
                    id: id.clone(),
                    draft: Draft::from_fields(fields.clone()),
                    error: None,
                };
                state.session.begin_submit()?;
            }
            owns
        };

        let result = self.gateway.update(id, &fields).await;

        let mut state = self.state();
        state.in_flight.remove(id);
        match result {
            Ok(entity) => {
                tracing::info!("Updated {} {}", self.element(), id);
                if let Some(index) = state.position(id) {
                    let order = state.items[index].order;
                    state.items[index] = Entity {
                        order: entity.order.or(order),
                        ..entity.clone()
                    };
                }
                state.last_error = None;
                if owns_session {
                    state.session.finish_ok();
                }
                Ok(entity)
            }
            Err(e) => {
                let error = ControllerError::from(e)
                    .context(&format!("Failed to update {}", self.element()));
                if owns_session {
                    state.session.finish_err(error.clone());
                }
                Err(self.fail(&mut state, error))
            }
        }
    }

    /// Отправить открытую форму (создание или изменение)
    pub async fn submit(&self) -> ControllerResult<Entity> {
        let pending = {
            let mut state = self.state();
            match state.session.clone() {
                EditSession::Creating { draft, .. } => Ok((None, draft.into_fields())),
                EditSession::Editing { id, draft, .. } => Ok((Some(id), draft.into_fields())),
                EditSession::Submitting { .. } => {
                    let error = ControllerError::busy("Form is already being submitted");
                    Err(self.fail(&mut state, error))
                }
                EditSession::Idle => {
                    let error = ControllerError::new(ErrorKind::Validation, "No form is open");
                    Err(self.fail(&mut state, error))
                }
            }
        };

        match pending? {
            (None, fields) => self.submit_create(fields).await,
            (Some(id), fields) => self.submit_update(&id, fields).await,
        }
    }

    /// Удалить запись (подтверждение у вызывающего кода)
    ///
    /// Открытая форма этой записи закрывается.
    pub async fn remove(&self, id: &EntityId) -> ControllerResult<()> {
        self.ensure_writable()?;

        {
            let mut state = self.state();
            if state.in_flight.contains(id) {
                let error = ControllerError::busy(format!(
                    "{} {} has a request in progress",
                    self.schema.element_name, id
                ));
                return Err(self.fail(&mut state, error));
            }
            if state.position(id).is_none() {
                let error = ControllerError::not_found(format!(
                    "{} {} not found",
                    self.schema.element_name, id
                ));
                return Err(self.fail(&mut state, error));
            }
            state.in_flight.insert(id.clone());
            state.deleting.insert(id.clone());
        }

        let result = self.gateway.delete(id).await;

        let mut state = self.state();
        state.in_flight.remove(id);
        state.deleting.remove(id);
        match result {
            Ok(()) => {
                tracing::info!("Deleted {} {}", self.element(), id);
                state.items.retain(|e| &e.id != id);
                state.confirmed_order.retain(|existing| existing != id);
                if state.session.editing_id() == Some(id) && !state.session.is_submitting() {
                    state.session = EditSession::Idle;
                }
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                let error = ControllerError::from(e)
                    .context(&format!("Failed to delete {}", self.element()));
                Err(self.fail(&mut state, error))
            }
        }
    }

    // ---------------------------------------------------------------------
    // Перестановка
    // ---------------------------------------------------------------------

    /// Перенести `moved` на место `target`
    ///
    /// Новый порядок применяется сразу, затем отправляется полный список ID.
    /// `Ok(false)`, если перенос ничего не меняет (одинаковые или отсутствующие ID),
    /// запрос не отправляется. `Busy`, если по `moved`/`target` идёт запрос
    /// или не завершено какое-либо удаление. При ошибке восстанавливается
    /// последний подтверждённый порядок, если других перестановок в работе нет.
    pub async fn reorder(&self, moved: &EntityId, target: &EntityId) -> ControllerResult<bool> {
        if !self.schema.orderable || self.schema.read_only {
            return Err(self.reject(ControllerError::new(
                ErrorKind::Validation,
                format!("{} cannot be reordered", self.schema.list_name),
            )));
        }

        let (seq, ordered_ids) = {
            let mut state = self.state();
            if state.in_flight.contains(moved)
                || state.in_flight.contains(target)
                || !state.deleting.is_empty()
            {
                let error = ControllerError::busy(format!(
                    "{} have a request in progress",
                    self.schema.list_name
                ));
                return Err(self.fail(&mut state, error));
            }
            let Some(new_order) = move_item(&state.ids(), moved, target) else {
                return Ok(false);
            };
            state.arrange(&new_order, true);
            state.reorder_seq += 1;
            state.pending_reorders += 1;
            (state.reorder_seq, new_order)
        };
        tracing::debug!("Reorder #{}: {} onto {}", seq, moved, target);

        let result = self.gateway.reorder(&ordered_ids).await;

        let mut state = self.state();
        state.pending_reorders = state.pending_reorders.saturating_sub(1);
        let outcome = match result {
            Ok(()) => {
                if seq > state.confirmed_seq {
                    state.confirmed_order = ordered_ids;
                    state.confirmed_seq = seq;
                }
                tracing::info!("Saved order of {}", self.list_name());
                Ok(true)
            }
            Err(e) => {
                let error = ControllerError::from(e)
                    .context(&format!("Failed to reorder {}", self.list_name()));
                Err(self.fail(&mut state, error))
            }
        };

        if state.pending_reorders == 0 {
            let confirmed = state.confirmed_order.clone();
            state.arrange(&confirmed, true);
        }
        outcome
    }

    // ---------------------------------------------------------------------
    // Фильтр
    // ---------------------------------------------------------------------

    pub fn set_filter(&self, filter: FilterState) {
        self.state().filter = filter;
    }

    pub fn filter(&self) -> FilterState {
        self.state().filter.clone()
    }

    /// Отфильтрованный вид; пересчитывается при каждом вызове
    pub fn filtered(&self) -> Vec<Entity> {
        let state = self.state();
        match &self.predicate {
            Some(predicate) => state
                .items
                .iter()
                .filter(|entity| predicate(entity, &state.filter))
                .cloned()
                .collect(),
            None => state.filter.apply(self.schema, &state.items),
        }
    }

    // ---------------------------------------------------------------------
    // Чтение состояния
    // ---------------------------------------------------------------------

    pub fn items(&self) -> Vec<Entity> {
        self.state().items.clone()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.state().ids()
    }

    pub fn find(&self, id: &EntityId) -> Option<Entity> {
        self.state().items.iter().find(|e| &e.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn is_loaded(&self) -> bool {
        self.state().loaded
    }

    pub fn last_error(&self) -> Option<ControllerError> {
        self.state().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.state().last_error = None;
    }

    // ---------------------------------------------------------------------
    // Форма
    // ---------------------------------------------------------------------

    pub fn session(&self) -> EditSession {
        self.state().session.clone()
    }

    /// Открыть форму создания с черновиком по умолчанию
    pub fn start_create(&self) -> ControllerResult<()> {
        self.ensure_writable()?;
        let mut state = self.state();
        if let Err(error) = state.session.start_create(Draft::for_create(self.schema)) {
            return Err(self.fail(&mut state, error));
        }
        Ok(())
    }

    /// Открыть форму редактирования, черновик заполняется из записи
    pub fn start_edit(&self, id: &EntityId) -> ControllerResult<()> {
        self.ensure_writable()?;
        let mut state = self.state();

        let found = state.items.iter().find(|e| &e.id == id).cloned();
        let Some(entity) = found else {
            let error = ControllerError::not_found(format!(
                "{} {} not found",
                self.schema.element_name, id
            ));
            return Err(self.fail(&mut state, error));
        };
        if state.in_flight.contains(id) {
            let error = ControllerError::busy(format!(
                "{} {} has a request in progress",
                self.schema.element_name, id
            ));
            return Err(self.fail(&mut state, error));
        }

        let draft = Draft::from_entity(self.schema, &entity);
        if let Err(error) = state.session.start_edit(id.clone(), draft) {
            return Err(self.fail(&mut state, error));
        }
        Ok(())
    }

    /// Изменить черновик открытой формы
    pub fn update_draft(&self, edit: impl FnOnce(&mut Draft)) -> ControllerResult<()> {
        let mut state = self.state();
        if let Some(draft) = state.session.draft_mut() {
            edit(draft);
            return Ok(());
        }

        let error = if state.session.is_submitting() {
            ControllerError::busy("Form is being submitted")
        } else {
            ControllerError::new(ErrorKind::Validation, "No form is open")
        };
        Err(self.fail(&mut state, error))
    }

    /// Закрыть форму; из `Idle` ничего не делает, во время отправки возвращает `false`
    pub fn cancel(&self) -> bool {
        self.state().session.cancel()
    }

    /// Сбросить форму и последнюю ошибку (кроме формы в отправке)
    pub fn reset(&self) {
        let mut state = self.state();
        state.session.cancel();
        state.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{InMemoryGateway, Operation};
    use contracts::domain::{a001_subcategory, a002_page};

    fn subcategory(id: &str, name: &str) -> Entity {
        let fields: Fields = [("name", name), ("category", "Shop by Breed")]
            .into_iter()
            .collect();
        Entity::new(id, fields)
    }

    #[tokio::test]
    async fn test_scope_is_sent_as_query() {
        let mut fields = Fields::new();
        fields.set("title", "Beagle");
        fields.set("subcategory", EntityId::from("sub-1"));
        let mut other = Fields::new();
        other.set("title", "Persian");
        other.set("subcategory", EntityId::from("sub-2"));

        let gateway = Arc::new(InMemoryGateway::new(&a002_page::SCHEMA).with_items(vec![
            Entity::new("p1", fields),
            Entity::new("p2", other),
        ]));
        let controller = CollectionController::new(gateway.clone())
            .with_scope(ListQuery::default().with_category("sub-2"));

        controller.initialize().await.unwrap();
        assert_eq!(controller.ids(), vec![EntityId::from("p2")]);
        assert!(controller.is_loaded());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_custom_predicate_replaces_default_filter() {
        let gateway = Arc::new(
            InMemoryGateway::new(&a001_subcategory::SCHEMA)
                .with_items(vec![subcategory("1", "Beagle"), subcategory("2", "Boxer")]),
        );
        let controller = CollectionController::new(gateway)
            .with_predicate(|entity, filter| entity.id.as_str() != filter.search);
        controller.initialize().await.unwrap();

        controller.set_filter(FilterState::default().with_search("1"));
        assert_eq!(controller.filtered().len(), 1);
        assert_eq!(controller.filtered()[0].id, EntityId::from("2"));
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let gateway = Arc::new(InMemoryGateway::new(&a001_subcategory::SCHEMA));
        let controller = CollectionController::new(gateway.clone());

        controller.start_create().unwrap();
        controller
            .update_draft(|draft| draft.set_text("name", "Beagle"))
            .unwrap();
        let err = controller.submit().await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.field_error("category"), Some("Category is required"));
        assert_eq!(gateway.calls(Operation::Create), 0);
        assert_eq!(controller.session().state_name(), "creating");
        assert!(controller.session().error().is_some());
    }

    #[tokio::test]
    async fn test_load_detail_refreshes_cached_entry() {
        let gateway = Arc::new(
            InMemoryGateway::new(&a001_subcategory::SCHEMA)
                .with_items(vec![subcategory("1", "Beagle")]),
        );
        let controller = CollectionController::new(gateway.clone());
        controller.initialize().await.unwrap();

        gateway
            .update(&"1".into(), &[("name", "Basset")].into_iter().collect())
            .await
            .unwrap();
        let entity = controller.load_detail(&"1".into()).await.unwrap();

        assert_eq!(entity.text("name"), Some("Basset"));
        assert_eq!(
            controller.find(&"1".into()).and_then(|e| e.text("name").map(String::from)),
            Some("Basset".to_string())
        );

        let err = controller.load_detail(&"missing".into()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
