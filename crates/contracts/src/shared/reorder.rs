use serde::{Deserialize, Serialize};

use crate::domain::common::EntityId;

/// Тело `PUT {path}/reorder`: полный новый порядок коллекции
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub ordered_ids: Vec<EntityId>,
}

impl ReorderRequest {
    pub fn new(ordered_ids: Vec<EntityId>) -> Self {
        Self { ordered_ids }
    }

    /// Совпадает ли набор ID с набором сохранённой коллекции (без учёта порядка)
    ///
    /// Частичные перестановки и чужие ID не допускаются.
    pub fn matches_set(&self, stored: &[EntityId]) -> bool {
        if self.ordered_ids.len() != stored.len() {
            return false;
        }
        let mut requested: Vec<&EntityId> = self.ordered_ids.iter().collect();
        let mut existing: Vec<&EntityId> = stored.iter().collect();
        requested.sort();
        existing.sort();
        requested.dedup();
        requested.len() == existing.len() && requested == existing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<EntityId> {
        values.iter().map(|v| EntityId::from(*v)).collect()
    }

    #[test]
    fn test_serializes_ordered_ids_in_camel_case() {
        let body = serde_json::to_value(ReorderRequest::new(ids(&["c", "a", "b"]))).unwrap();
        assert_eq!(body, serde_json::json!({ "orderedIds": ["c", "a", "b"] }));
    }

    #[test]
    fn test_set_must_match_exactly() {
        let stored = ids(&["a", "b", "c"]);
        assert!(ReorderRequest::new(ids(&["c", "a", "b"])).matches_set(&stored));
        assert!(!ReorderRequest::new(ids(&["a", "b"])).matches_set(&stored));
        assert!(!ReorderRequest::new(ids(&["a", "b", "x"])).matches_set(&stored));
        assert!(!ReorderRequest::new(ids(&["a", "a", "b"])).matches_set(&stored));
    }
}
