//! Validation rules for schema fields

/// Ограничения значения поля формы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub custom_error: Option<&'static str>,
}

impl ValidationRules {
    /// Без ограничений
    pub const fn none() -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            custom_error: None,
        }
    }

    /// Обязательное поле, длина не ограничена
    pub const fn required() -> Self {
        Self {
            required: true,
            min_length: None,
            max_length: None,
            custom_error: None,
        }
    }

    pub const fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Error text for a missing required value
    pub fn missing_message(&self, field_label: &str) -> String {
        match self.custom_error {
            Some(message) => message.to_string(),
            None => format!("{} is required", field_label),
        }
    }

    /// Проверить текстовое значение; пробелы не считаются заполнением
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        if self.required && value.trim().is_empty() {
            return Err(self.missing_message(field_label));
        }

        let length = value.chars().count();

        if let Some(min) = self.min_length {
            if length < min {
                return Err(format!(
                    "{} must be at least {} characters",
                    field_label, min
                ));
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                return Err(format!(
                    "{} must not exceed {} characters",
                    field_label, max
                ));
            }
        }

        Ok(())
    }
}
