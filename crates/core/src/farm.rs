//! Guards run before a farm record is created or updated.
//!
//! Unlike form profiles these do not build an error map: the first broken
//! rule is returned as a [`FarmGuardError`] and the caller turns it into a
//! single message. The rules themselves go through the shared evaluator.

use serde::Serialize;

use crate::validation::input::FormInput;
use crate::validation::rules::Rule;
use crate::validation::EvalContext;

pub const NAME_MAX: usize = 100;
pub const LOCATION_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FarmGuardError {
    #[error("El nombre de la finca es obligatorio")]
    NameRequired,

    #[error("El nombre de la finca no puede superar los {max} caracteres")]
    NameTooLong { max: usize },

    #[error("La ubicación de la finca no puede superar los {max} caracteres")]
    LocationTooLong { max: usize },
}

/// Name: required, at most [`NAME_MAX`] characters.
pub fn validate_name(name: &str) -> Result<(), FarmGuardError> {
    guard(&Rule::Required, Some(name), FarmGuardError::NameRequired)?;
    guard(
        &Rule::LengthBetween {
            min: None,
            max: Some(NAME_MAX),
        },
        Some(name),
        FarmGuardError::NameTooLong { max: NAME_MAX },
    )
}

/// Location: optional, at most [`LOCATION_MAX`] characters.
pub fn validate_location(location: Option<&str>) -> Result<(), FarmGuardError> {
    guard(
        &Rule::LengthBetween {
            min: None,
            max: Some(LOCATION_MAX),
        },
        location,
        FarmGuardError::LocationTooLong { max: LOCATION_MAX },
    )
}

fn guard(rule: &Rule, value: Option<&str>, error: FarmGuardError) -> Result<(), FarmGuardError> {
    let siblings = FormInput::new();
    if rule.passes(value, &EvalContext::now(&siblings)) {
        Ok(())
    } else {
        Err(error)
    }
}

/// Farm fields that passed both guards, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmDraft {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<String>,
}

impl FarmDraft {
    pub fn new(name: &str, location: Option<&str>) -> Result<Self, FarmGuardError> {
        validate_name(name)?;
        validate_location(location)?;
        Ok(Self {
            nombre: name.trim().to_string(),
            ubicacion: location
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn empty_name_is_required() {
        assert_eq!(validate_name(""), Err(FarmGuardError::NameRequired));
        assert_eq!(validate_name("   "), Err(FarmGuardError::NameRequired));
        assert!(FarmGuardError::NameRequired.to_string().contains("nombre"));
    }

    #[test]
    fn name_length_bound_is_inclusive() {
        assert!(validate_name(&"a".repeat(NAME_MAX)).is_ok());
        assert_eq!(
            validate_name(&"a".repeat(NAME_MAX + 1)),
            Err(FarmGuardError::NameTooLong { max: 100 })
        );
    }

    #[test]
    fn location_is_optional_but_bounded() {
        assert!(validate_location(None).is_ok());
        assert!(validate_location(Some("")).is_ok());
        assert!(validate_location(Some(&"x".repeat(255))).is_ok());

        let err = validate_location(Some(&"x".repeat(256))).unwrap_err();
        assert_matches!(err, FarmGuardError::LocationTooLong { max: 255 });
        assert!(err.to_string().contains("255"));
    }

    #[test]
    fn draft_trims_and_drops_blank_location() {
        let draft = FarmDraft::new("  La Esperanza ", Some("   ")).unwrap();
        assert_eq!(draft.nombre, "La Esperanza");
        assert_eq!(draft.ubicacion, None);
    }

    #[test]
    fn draft_runs_name_guard_first() {
        let err = FarmDraft::new("", Some(&"x".repeat(300))).unwrap_err();
        assert_eq!(err, FarmGuardError::NameRequired);
    }
}
