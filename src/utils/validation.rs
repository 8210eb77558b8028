//! Field checks shared by the movie, review and comment forms.

use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

lazy_static::lazy_static! {
    pub static ref YEAR: Regex = Regex::new(r"^(19[0-9]{2}|20[0-9]{2})$").unwrap();
}

/// Non-blank text of at most `max` characters.
pub fn bounded_text(value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    if value.chars().count() > max {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

pub fn matches_pattern(value: &str, pattern: &Regex) -> Result<(), ValidationError> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("pattern"))
    }
}

pub fn one_of<T>(value: &T, allowed: &[T]) -> Result<(), ValidationError>
where
    T: PartialEq,
{
    if allowed.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::new("choice"))
    }
}

/// Message of the first failing field, looking at `fields` in order.
///
/// `ValidationErrors` keeps fields in a map, so the order in which a form
/// reports its problems has to be given explicitly.
pub fn first_message(errors: &ValidationErrors, fields: &[&str]) -> Option<String> {
    let all = errors.errors();
    fields.iter().find_map(|field| match all.get(*field) {
        Some(ValidationErrorsKind::Field(errs)) => {
            errs.iter().find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        }
        _ => None,
    })
}
