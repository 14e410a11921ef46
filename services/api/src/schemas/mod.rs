//! services/api/src/schemas/mod.rs
//!
//! Wire request/response types for each content vertical. Validation here is
//! purely shape checking: a failed check yields a 400 naming the offending
//! field, and no cross-field business rules are enforced.

pub mod analytics;
pub mod auth;
pub mod food;
pub mod recommendations;
pub mod stories;
pub mod travel;

use crate::error::ApiError;

/// Rejects a required text field that is absent or out of bounds.
pub(crate) fn require_text(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(field, "field is required"));
    }
    if trimmed.len() < min {
        return Err(ApiError::validation(
            field,
            format!("must be at least {} characters", min),
        ));
    }
    if trimmed.len() > max {
        return Err(ApiError::validation(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_text_names_the_field() {
        let err = require_text("destination", "", 2, 100).unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field, "destination"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn bounds_are_enforced() {
        assert!(require_text("story_prompt", "hi", 10, 2000).is_err());
        assert!(require_text("food_name", "pizza", 1, 100).is_ok());
        let long = "x".repeat(101);
        assert!(require_text("food_name", &long, 1, 100).is_err());
    }
}
