use contracts::domain::common::EntityId;

use super::draft::Draft;
use super::error::{ControllerError, ControllerResult};
use crate::gateway::ErrorKind;

/// Состояние формы: нет формы, создание, редактирование, отправка
///
/// Черновик существует во всех состояниях, кроме `Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditSession {
    #[default]
    Idle,
    Creating {
        draft: Draft,
        error: Option<ControllerError>,
    },
    Editing {
        id: EntityId,
        draft: Draft,
        error: Option<ControllerError>,
    },
    /// `target`: ID редактируемой записи, `None` при создании
    Submitting {
        target: Option<EntityId>,
        draft: Draft,
    },
}

impl EditSession {
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Creating { .. } => "creating",
            Self::Editing { .. } => "editing",
            Self::Submitting { .. } => "submitting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// Открыть форму создания; открытая форма заменяется без слияния
    pub fn start_create(&mut self, draft: Draft) -> ControllerResult<()> {
        self.ensure_not_submitting()?;
        *self = Self::Creating { draft, error: None };
        Ok(())
    }

    pub fn start_edit(&mut self, id: EntityId, draft: Draft) -> ControllerResult<()> {
        self.ensure_not_submitting()?;
        *self = Self::Editing {
            id,
            draft,
            error: None,
        };
        Ok(())
    }

    /// Закрыть форму, отбросив черновик
    ///
    /// Из `Idle` ничего не меняет; во время отправки отклоняется (`false`).
    pub fn cancel(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        *self = Self::Idle;
        true
    }

    /// Перейти в `Submitting`; возвращает цель и отправляемый черновик
    pub fn begin_submit(&mut self) -> ControllerResult<(Option<EntityId>, Draft)> {
        match std::mem::take(self) {
            Self::Creating { draft, .. } => {
                *self = Self::Submitting {
                    target: None,
                    draft: draft.clone(),
                };
                Ok((None, draft))
            }
            Self::Editing { id, draft, .. } => {
                *self = Self::Submitting {
                    target: Some(id.clone()),
                    draft: draft.clone(),
                };
                Ok((Some(id), draft))
            }
            submitting @ Self::Submitting { .. } => {
                *self = submitting;
                Err(ControllerError::busy("Form is already being submitted"))
            }
            Self::Idle => Err(ControllerError::new(
                ErrorKind::Validation,
                "No form is open",
            )),
        }
    }

    /// Отправка успешна: форма закрывается
    pub fn finish_ok(&mut self) {
        if self.is_submitting() {
            *self = Self::Idle;
        }
    }

    /// Отправка не удалась: форма возвращается с ошибкой, черновик сохраняется
    pub fn finish_err(&mut self, error: ControllerError) {
        match std::mem::take(self) {
            Self::Submitting {
                target: Some(id),
                draft,
            } => {
                *self = Self::Editing {
                    id,
                    draft,
                    error: Some(error),
                }
            }
            Self::Submitting {
                target: None,
                draft,
            } => {
                *self = Self::Creating {
                    draft,
                    error: Some(error),
                }
            }
            other => *self = other,
        }
    }

    /// Прикрепить ошибку к открытой форме (локальная проверка)
    pub fn set_error(&mut self, new_error: ControllerError) {
        match self {
            Self::Creating { error, .. } | Self::Editing { error, .. } => *error = Some(new_error),
            Self::Idle | Self::Submitting { .. } => {}
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Idle => None,
            Self::Creating { draft, .. }
            | Self::Editing { draft, .. }
            | Self::Submitting { draft, .. } => Some(draft),
        }
    }

    /// Черновик для изменения; во время отправки недоступен
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            Self::Creating { draft, .. } | Self::Editing { draft, .. } => Some(draft),
            Self::Idle | Self::Submitting { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ControllerError> {
        match self {
            Self::Creating { error, .. } | Self::Editing { error, .. } => error.as_ref(),
            Self::Idle | Self::Submitting { .. } => None,
        }
    }

    /// ID записи, с которой связана форма (редактирование или отправка правки)
    pub fn editing_id(&self) -> Option<&EntityId> {
        match self {
            Self::Editing { id, .. } => Some(id),
            Self::Submitting { target, .. } => target.as_ref(),
            Self::Idle | Self::Creating { .. } => None,
        }
    }

    fn ensure_not_submitting(&self) -> ControllerResult<()> {
        if self.is_submitting() {
            return Err(ControllerError::busy("Wait for the current submit to finish"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> Draft {
        let mut draft = Draft::default();
        draft.set_text("title", title);
        draft
    }

    #[test]
    fn test_cancel_on_idle_is_noop() {
        let mut session = EditSession::Idle;
        assert!(session.cancel());
        assert_eq!(session, EditSession::Idle);
    }

    #[test]
    fn test_start_create_replaces_edit() {
        let mut session = EditSession::default();
        session.start_edit("a".into(), draft("A")).unwrap();
        session.start_create(draft("new")).unwrap();
        assert_eq!(session.state_name(), "creating");
        assert_eq!(session.editing_id(), None);
        assert_eq!(session.draft().map(|d| d.text("title")), Some("new"));
    }

    #[test]
    fn test_failed_submit_returns_to_editing_with_error() {
        let mut session = EditSession::default();
        session.start_edit("a".into(), draft("A")).unwrap();

        let (target, submitted) = session.begin_submit().unwrap();
        assert_eq!(target, Some(EntityId::from("a")));
        assert_eq!(submitted.text("title"), "A");
        assert!(session.draft_mut().is_none());

        session.finish_err(ControllerError::new(ErrorKind::Server, "boom"));
        assert_eq!(session.state_name(), "editing");
        assert_eq!(session.error().map(|e| e.message.as_str()), Some("boom"));
        assert_eq!(session.draft().map(|d| d.text("title")), Some("A"));

        assert!(session.cancel());
        assert!(session.is_idle());
    }

    #[test]
    fn test_submitting_rejects_second_submit_and_new_sessions() {
        let mut session = EditSession::default();
        session.start_create(draft("x")).unwrap();
        session.begin_submit().unwrap();

        assert_eq!(session.begin_submit().unwrap_err().kind, ErrorKind::Busy);
        assert_eq!(
            session.start_create(draft("y")).unwrap_err().kind,
            ErrorKind::Busy
        );
        assert!(!session.cancel());
        assert!(session.is_submitting());

        session.finish_ok();
        assert!(session.is_idle());
    }

    #[test]
    fn test_submit_from_idle_is_rejected() {
        let mut session = EditSession::Idle;
        assert_eq!(
            session.begin_submit().unwrap_err().kind,
            ErrorKind::Validation
        );
        assert!(session.is_idle());
    }
}
