use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::core::error::AppError;

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Flatten validator output into the human-readable messages attached to each rule.
///
/// Fields are visited in name order so the response is stable.
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let mut messages = Vec::new();
    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    messages.push(describe(field, err));
                }
            }
            ValidationErrorsKind::Struct(inner) => messages.extend(collect_messages(inner)),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    messages.extend(collect_messages(inner));
                }
            }
        }
    }
    messages
}

fn describe(field: &Cow<'static, str>, err: &ValidationError) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None => format!("{} is invalid", field),
    }
}

/// Convert validator output into an `AppError::Validation`
pub fn validation_error(errors: ValidationErrors) -> AppError {
    AppError::Validation(collect_messages(&errors).join("; "))
}
