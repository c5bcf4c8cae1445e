// src/validation/result.rs

use serde::{Deserialize, Serialize};

/// Итог валидации: валидность + накопленные ошибки и предупреждения.
///
/// Инвариант: результат-неудача обязан нести хотя бы одну ошибку.
/// Конструкторы проверяют это сразу — нарушение означает баг в коде
/// валидатора, а не плохие данные игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn valid_with_warnings(warnings: Vec<String>) -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings,
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        assert!(
            !errors.is_empty(),
            "ValidationResult::failure без единой ошибки"
        );
        Self {
            is_valid: false,
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn failure_with_warnings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        assert!(
            !errors.is_empty(),
            "ValidationResult::failure_with_warnings без единой ошибки"
        );
        Self {
            is_valid: false,
            errors,
            warnings,
        }
    }

    /// Собрать результат из накопленных списков:
    /// is_valid = нет ошибок, предупреждения валидность не ломают.
    pub fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        match (errors.is_empty(), warnings.is_empty()) {
            (true, true) => Self::success(),
            (true, false) => Self::valid_with_warnings(warnings),
            (false, true) => Self::failure(errors),
            (false, false) => Self::failure_with_warnings(errors, warnings),
        }
    }

    /// Слить два результата: ошибки/предупреждения конкатенируются
    /// (левые раньше правых), валидность — логическое И.
    pub fn merge(mut self, other: ValidationResult) -> ValidationResult {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        ValidationResult {
            is_valid: self.is_valid && other.is_valid,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
