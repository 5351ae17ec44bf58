//! Request validation from descriptor rules and column kinds.

use crate::config::{FieldRule, ResourceDescriptor};
use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body: every required field must be present and non-null.
    pub fn validate(body: &Map<String, Value>, descriptor: &ResourceDescriptor) -> Result<(), AppError> {
        for rule in descriptor.rules {
            let val = body.get(rule.column);
            if rule.required && val.map_or(true, Value::is_null) {
                return Err(AppError::Validation(format!("{} is required", rule.column)));
            }
        }
        Self::validate_present(body, descriptor, descriptor.insertable)
    }

    /// Validate only the fields present in body (for PUT/PATCH). Required is not enforced for
    /// missing fields, but a required field cannot be cleared.
    pub fn validate_partial(body: &Map<String, Value>, descriptor: &ResourceDescriptor) -> Result<(), AppError> {
        for rule in descriptor.rules {
            if rule.required && body.get(rule.column).is_some_and(Value::is_null) {
                return Err(AppError::Validation(format!("{} cannot be null", rule.column)));
            }
        }
        Self::validate_present(body, descriptor, descriptor.updatable)
    }

    fn validate_present(
        body: &Map<String, Value>,
        descriptor: &ResourceDescriptor,
        writable: &[&str],
    ) -> Result<(), AppError> {
        for (col, v) in body {
            if !writable.contains(&col.as_str()) {
                continue;
            }
            if let Some(c) = descriptor.column(col) {
                if !c.kind.accepts(v) {
                    return Err(AppError::Validation(format!("{} must be {}", col, c.kind.describe())));
                }
            }
            if let Some(rule) = descriptor.rules.iter().find(|r| r.column == col.as_str()) {
                validate_field(col, v, rule)?;
            }
        }
        Ok(())
    }
}

fn validate_field(col: &str, v: &Value, rule: &FieldRule) -> Result<(), AppError> {
    if v.is_null() {
        return Ok(());
    }
    if let Some(s) = v.as_str() {
        if rule.non_blank && s.trim().is_empty() {
            return Err(AppError::Validation(format!("{} must not be blank", col)));
        }
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    col, max
                )));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    col, min
                )));
            }
        }
        if let Some(pattern) = rule.pattern {
            let re = Regex::new(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", col)))?;
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{GALLERY_IMAGES, PEAKS};
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    fn message(r: Result<(), AppError>) -> String {
        match r {
            Err(AppError::Validation(m)) => m,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn complete_peak_passes() {
        let b = body(json!({ "name": "Everest", "elevation_meters": 8848, "slug": "mount-everest" }));
        assert!(RequestValidator::validate(&b, &PEAKS).is_ok());
    }

    #[test]
    fn missing_required_field() {
        let b = body(json!({ "name": "Everest", "slug": "mount-everest" }));
        assert_eq!(message(RequestValidator::validate(&b, &PEAKS)), "elevation_meters is required");
    }

    #[test]
    fn blank_name_is_rejected() {
        let b = body(json!({ "name": "   ", "elevation_meters": 8848, "slug": "everest" }));
        assert_eq!(message(RequestValidator::validate(&b, &PEAKS)), "name must not be blank");
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let b = body(json!({ "name": "Everest", "elevation_meters": "high", "slug": "everest" }));
        assert_eq!(message(RequestValidator::validate(&b, &PEAKS)), "elevation_meters must be an integer");
        let b = body(json!({ "is_featured": "yes" }));
        assert_eq!(message(RequestValidator::validate_partial(&b, &GALLERY_IMAGES)), "is_featured must be a boolean");
    }

    #[test]
    fn slug_pattern_and_bounds() {
        let b = body(json!({ "slug": "Mount Everest" }));
        assert!(RequestValidator::validate_partial(&b, &PEAKS).is_err());
        let b = body(json!({ "elevation_meters": -5 }));
        assert_eq!(message(RequestValidator::validate_partial(&b, &PEAKS)), "elevation_meters must be at least 0");
    }

    #[test]
    fn partial_ignores_missing_and_unknown_fields() {
        let b = body(json!({ "description": "Roof of the world", "nonsense": [1, 2] }));
        assert!(RequestValidator::validate_partial(&b, &PEAKS).is_ok());
        assert!(RequestValidator::validate_partial(&Map::new(), &PEAKS).is_ok());
    }

    #[test]
    fn partial_cannot_clear_required_field() {
        let b = body(json!({ "name": null }));
        assert_eq!(message(RequestValidator::validate_partial(&b, &PEAKS)), "name cannot be null");
    }
}
