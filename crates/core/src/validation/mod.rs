//! Form validation engine.
//!
//! Declarative rules are grouped per field into [`rules::RuleSet`]s, composed
//! into a [`evaluator::Validator`], and paired with a [`sanitize::Sanitizer`]
//! into named [`profiles::ValidationProfile`]s. A profile turns raw form input
//! into either a typed record or a structured error map, never both.

pub mod coerce;
pub mod email;
pub mod evaluator;
pub mod input;
pub mod profiles;
pub mod rules;
pub mod sanitize;

pub use evaluator::{EvalContext, Validator};
pub use input::{FormInput, NonScalarField};
pub use profiles::{ProfileRegistry, ValidationProfile};
pub use rules::{ErrorMap, Rejection, ValidationError};
pub use sanitize::{SanitizedRecord, SanitizedValue};
