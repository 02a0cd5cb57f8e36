use crate::shared::metadata::FieldDef;

/// Описание коллекции каталога
///
/// Статическая константа на каждый вид записей: REST-пути, поля формы,
/// поле отображения и категориальный фильтр. Один обобщённый контроллер
/// обслуживает все экраны, получая схему при создании.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Имя коллекции (например, "subcategory")
    pub kind: &'static str,
    /// Имя элемента для UI (единственное число)
    pub element_name: &'static str,
    /// Имя списка для UI (множественное число)
    pub list_name: &'static str,
    /// REST-ресурс относительно базового URL (например, "/subcategories")
    pub path: &'static str,
    /// Отдельный путь для списка в админке, если отличается от `path`
    pub list_path: Option<&'static str>,
    /// Ключ идентификатора в JSON
    pub id_key: &'static str,
    /// Ключ, по которому на запись ссылаются другие коллекции, если не `id_key`
    ///
    /// Товары открываются по `shopifyId`, а в `linkedProducts` хранится `_id`.
    pub ref_key: Option<&'static str>,
    pub fields: &'static [FieldDef],
    /// Поле для поиска подстроки и заголовка строки
    pub display_field: &'static str,
    /// Поле для категориального фильтра
    pub category_field: Option<&'static str>,
    /// Query-параметр серверной фильтрации по категории
    pub category_param: Option<&'static str>,
    /// Query-параметр серверного поиска
    pub search_param: Option<&'static str>,
    /// Коллекция поддерживает ручную сортировку (drag-and-drop)
    pub orderable: bool,
    /// Коллекция только для чтения (синхронизируется извне)
    pub read_only: bool,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Поля, которые можно редактировать через черновик
    pub fn writable_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter().filter(|f| f.kind.is_writable())
    }

    pub fn list_path(&self) -> &'static str {
        self.list_path.unwrap_or(self.path)
    }

    pub fn reorder_path(&self) -> String {
        format!("{}/reorder", self.path)
    }
}
