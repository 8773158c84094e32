//! Named validation profiles for every form the application accepts.
//!
//! Each profile is an immutable [`Validator`] + [`Sanitizer`] pair. They are
//! built once by [`ProfileRegistry::new`] and shared read-only afterwards.

use std::sync::LazyLock;

use chrono::NaiveDate;
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use super::evaluator::Validator;
use super::input::FormInput;
use super::rules::{Condition, Format, NumberKind, Rejection, Rule, RuleSet};
use super::sanitize::{SanitizedRecord, Sanitizer, Step};
use crate::error::CoreError;

pub const REGISTRATION: &str = "registro";
pub const LOGIN: &str = "login";
pub const PASSWORD_RECOVERY: &str = "recuperar";
pub const PASSWORD_UPDATE: &str = "actualizar_password";
pub const PERGAMINO_SALE: &str = "venta_pergamino";
pub const PACKAGED_SALE: &str = "venta_empacado";
pub const COFFEE_LOT: &str = "lote";
pub const DRYING_LOG: &str = "secado";

/// Key the packaged-sale "pick at least one product" error is reported under.
pub const PRODUCTS_KEY: &str = "productos";

/// Product groups of a packaged sale, suffixes of the `vender_*` flags.
pub const PACKAGED_PRODUCTS: &[&str] = &["grano", "molido", "pasilla"];

pub const VARIETIES: &[&str] = &[
    "caturra", "castillo", "colombia", "tabi", "geisha", "borbon", "tipica",
];
pub const PROCESSES: &[&str] = &["lavado", "honey", "natural"];
pub const DRYING_STATES: &[&str] = &["en_proceso", "finalizado"];

const PASSWORD_MIN: usize = 8;
const NAME_MAX: usize = 100;
const BUYER_MAX: usize = 100;
const NOTES_MAX: usize = 1000;

static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));

const TEXT: &[Step] = &[Step::Trim, Step::Escape];
const EMAIL: &[Step] = &[Step::Trim, Step::NormalizeEmail];
const FLOAT: &[Step] = &[Step::Trim, Step::ToFloat];
const INTEGER: &[Step] = &[Step::Trim, Step::ToInteger];
const DATE: &[Step] = &[Step::Trim, Step::ToDate];
const FLAG: &[Step] = &[Step::ToFlag];
/// Passwords are passed through untouched.
const RAW: &[Step] = &[];

/// A named validator and the sanitizer that runs once it accepts the input.
#[derive(Debug, Clone)]
pub struct ValidationProfile {
    name: &'static str,
    validator: Validator,
    sanitizer: Sanitizer,
}

impl ValidationProfile {
    pub fn new(name: &'static str, validator: Validator, sanitizer: Sanitizer) -> Self {
        Self {
            name,
            validator,
            sanitizer,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Validate against today's local date, then sanitize.
    pub fn process(&self, input: &FormInput) -> Result<SanitizedRecord, ProfileError> {
        self.process_at(input, chrono::Local::now().date_naive())
    }

    /// One validation pass: either the error map or the sanitized record.
    ///
    /// The sanitizer only ever sees input the validator accepted, restricted
    /// to the fields whose rule sets applied.
    pub fn process_at(
        &self,
        input: &FormInput,
        today: NaiveDate,
    ) -> Result<SanitizedRecord, ProfileError> {
        let errors = self.validator.validate_at(input, today);
        if !errors.is_empty() {
            return Err(ProfileError::Rejected(Rejection { errors }));
        }
        let active = self.validator.active_input(input);
        Ok(self.sanitizer.sanitize(&active)?)
    }

    pub fn describe(&self) -> ProfileSummary {
        ProfileSummary {
            name: self.name,
            fields: self.sanitizer.fields().map(str::to_string).collect(),
        }
    }
}

/// Outcome of a refused profile run.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The user's input broke one or more rules.
    #[error(transparent)]
    Rejected(Rejection),

    /// Sanitization failed on validated input; a defect, not a user error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Public description of a profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub name: &'static str,
    pub fields: Vec<String>,
}

/// Every profile, keyed by name.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: IndexMap<&'static str, ValidationProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        let profiles = [
            registration(),
            login(),
            password_recovery(),
            password_update(),
            pergamino_sale(),
            packaged_sale(),
            coffee_lot(),
            drying_log(),
        ]
        .into_iter()
        .map(|p| (p.name, p))
        .collect();
        Self { profiles }
    }

    pub fn get(&self, name: &str) -> Result<&ValidationProfile, CoreError> {
        self.profiles
            .get(name)
            .ok_or_else(|| CoreError::UnknownProfile(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationProfile> {
        self.profiles.values()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Shared field definitions ─────────────────────────────────────────

fn length(min: Option<usize>, max: Option<usize>) -> Rule {
    Rule::LengthBetween { min, max }
}

fn email_field() -> RuleSet {
    RuleSet::new("email")
        .check(Rule::Required, "Ingrese su correo electrónico")
        .check(
            Rule::Matches(Format::Email),
            "Ingrese un correo electrónico válido",
        )
}

/// A new password: long enough and containing a digit.
///
/// Passwords are stored as typed, so they are judged untrimmed.
fn new_password_field() -> RuleSet {
    RuleSet::new("password")
        .keep_whitespace()
        .check(Rule::Required, "Ingrese una contraseña")
        .check(
            length(Some(PASSWORD_MIN), None),
            format!("La contraseña debe tener al menos {PASSWORD_MIN} caracteres"),
        )
        .check(
            Rule::Matches(Format::Pattern(DIGIT_RE.clone())),
            "La contraseña debe contener al menos un número",
        )
}

fn required_date(field: &str, label: &str) -> RuleSet {
    RuleSet::new(field)
        .check(Rule::Required, format!("La {label} es obligatoria"))
        .check(
            Rule::Matches(Format::IsoDate),
            format!("La {label} debe ser una fecha válida (AAAA-MM-DD)"),
        )
}

fn positive_amount(field: &str, label: &str) -> RuleSet {
    RuleSet::new(field)
        .check(Rule::Required, format!("Ingrese {label}"))
        .check(
            Rule::Positive(NumberKind::Float),
            format!("El valor de {label} debe ser un número mayor que cero"),
        )
}

fn optional_text(field: &str, max: usize, label: &str) -> RuleSet {
    RuleSet::new(field).optional().check(
        length(None, Some(max)),
        format!("El campo {label} no puede superar los {max} caracteres"),
    )
}

// ── Users ────────────────────────────────────────────────────────────

pub fn registration() -> ValidationProfile {
    let validator = Validator::new()
        .field(
            RuleSet::new("nombre")
                .check(Rule::Required, "El nombre es obligatorio")
                .check(
                    length(Some(3), Some(NAME_MAX)),
                    format!("El nombre debe tener entre 3 y {NAME_MAX} caracteres"),
                ),
        )
        .field(email_field())
        .field(new_password_field())
        .field(
            RuleSet::new("pregunta_id")
                .check(Rule::Required, "Seleccione una pregunta de seguridad")
                .check(
                    Rule::Positive(NumberKind::Integer),
                    "La pregunta de seguridad no es válida",
                ),
        )
        .field(
            RuleSet::new("respuesta")
                .check(Rule::Required, "Ingrese la respuesta de seguridad")
                .check(
                    length(Some(2), Some(255)),
                    "La respuesta debe tener entre 2 y 255 caracteres",
                ),
        )
        .field(
            RuleSet::new("nombre_finca")
                .check(Rule::Required, "El nombre de la finca es obligatorio")
                .check(
                    length(Some(2), Some(NAME_MAX)),
                    format!("El nombre de la finca debe tener entre 2 y {NAME_MAX} caracteres"),
                ),
        )
        .field(optional_text(
            "ubicacion_finca",
            255,
            "ubicación de la finca",
        ));

    let sanitizer = Sanitizer::new()
        .field("nombre", TEXT)
        .field("email", EMAIL)
        .field("password", RAW)
        .field("pregunta_id", INTEGER)
        .field("respuesta", TEXT)
        .field("nombre_finca", TEXT)
        .field("ubicacion_finca", TEXT);

    ValidationProfile::new(REGISTRATION, validator, sanitizer)
}

pub fn login() -> ValidationProfile {
    let validator = Validator::new()
        .field(email_field())
        .field(
            RuleSet::new("password")
                .keep_whitespace()
                .check(Rule::Required, "Ingrese su contraseña"),
        );

    let sanitizer = Sanitizer::new()
        .field("email", EMAIL)
        .field("password", RAW);

    ValidationProfile::new(LOGIN, validator, sanitizer)
}

pub fn password_recovery() -> ValidationProfile {
    let validator = Validator::new().field(email_field()).field(
        RuleSet::new("respuesta").check(Rule::Required, "Ingrese la respuesta de seguridad"),
    );

    let sanitizer = Sanitizer::new()
        .field("email", EMAIL)
        .field("respuesta", TEXT);

    ValidationProfile::new(PASSWORD_RECOVERY, validator, sanitizer)
}

pub fn password_update() -> ValidationProfile {
    let validator = Validator::new()
        .field(email_field())
        .field(new_password_field());

    let sanitizer = Sanitizer::new()
        .field("email", EMAIL)
        .field("password", RAW);

    ValidationProfile::new(PASSWORD_UPDATE, validator, sanitizer)
}

// ── Sales ────────────────────────────────────────────────────────────

pub fn pergamino_sale() -> ValidationProfile {
    let validator = Validator::new()
        .field(required_date("fecha_venta", "fecha de venta"))
        .field(positive_amount("cantidad", "la cantidad"))
        .field(positive_amount("precio_kg", "el precio por kg"))
        .field(optional_text("comprador", BUYER_MAX, "comprador"))
        .field(optional_text("notas", NOTES_MAX, "notas"));

    let sanitizer = Sanitizer::new()
        .field("fecha_venta", DATE)
        .field("cantidad", FLOAT)
        .field("precio_kg", FLOAT)
        .field("comprador", TEXT)
        .field("notas", TEXT);

    ValidationProfile::new(PERGAMINO_SALE, validator, sanitizer)
}

/// Packaged coffee: whole bean, ground, and pasilla (rejects).
///
/// Each product's quantity, price, buyer and notes are only looked at when
/// its `vender_*` flag is checked.
pub fn packaged_sale() -> ValidationProfile {
    let mut validator = Validator::new().field(required_date("fecha_venta", "fecha de venta"));
    let mut sanitizer = Sanitizer::new().field("fecha_venta", DATE);

    for product in PACKAGED_PRODUCTS {
        let flag = format!("vender_{product}");
        let gate = Condition::truthy(&flag);
        let quantity = format!("cantidad_{flag}");
        let price = format!("precio_kg_{flag}");
        let buyer = format!("comprador_{flag}");
        let notes = format!("notas_{flag}");

        let quantity_label = format!("la cantidad de {product}");
        let price_label = format!("el precio por kg de {product}");
        validator = validator
            .field(positive_amount(&quantity, &quantity_label).when(gate.clone()))
            .field(positive_amount(&price, &price_label).when(gate.clone()))
            .field(optional_text(&buyer, BUYER_MAX, "comprador").when(gate.clone()))
            .field(optional_text(&notes, NOTES_MAX, "notas").when(gate));

        sanitizer = sanitizer
            .field(flag, FLAG)
            .field(quantity, FLOAT)
            .field(price, FLOAT)
            .field(buyer, TEXT)
            .field(notes, TEXT);
    }

    let flags = PACKAGED_PRODUCTS
        .iter()
        .map(|product| format!("vender_{product}"))
        .collect();
    let validator = validator.cross_field(
        PRODUCTS_KEY,
        Rule::RequiredGroup(flags),
        "Seleccione al menos un tipo de producto para vender",
    );

    ValidationProfile::new(PACKAGED_SALE, validator, sanitizer)
}

// ── Lots and drying ──────────────────────────────────────────────────

fn one_of(values: &[&str]) -> Rule {
    Rule::OneOf(values.iter().map(|v| v.to_string()).collect())
}

pub fn coffee_lot() -> ValidationProfile {
    let validator = Validator::new()
        .field(
            RuleSet::new("codigo")
                .check(Rule::Required, "El código del lote es obligatorio")
                .check(
                    length(None, Some(50)),
                    "El código del lote no puede superar los 50 caracteres",
                ),
        )
        .field(
            RuleSet::new("variedad")
                .check(Rule::Required, "Seleccione la variedad")
                .check(one_of(VARIETIES), "La variedad no es válida"),
        )
        .field(
            RuleSet::new("proceso")
                .check(Rule::Required, "Seleccione el proceso")
                .check(one_of(PROCESSES), "El proceso no es válido"),
        )
        .field(required_date("fecha_cosecha", "fecha de cosecha").check(
            Rule::DateNotFuture,
            "La fecha de cosecha no puede ser futura",
        ))
        .field(positive_amount("peso_kg", "el peso"))
        .field(optional_text("notas", NOTES_MAX, "notas"));

    let sanitizer = Sanitizer::new()
        .field("codigo", TEXT)
        .field("variedad", &[Step::Trim])
        .field("proceso", &[Step::Trim])
        .field("fecha_cosecha", DATE)
        .field("peso_kg", FLOAT)
        .field("notas", TEXT);

    ValidationProfile::new(COFFEE_LOT, validator, sanitizer)
}

pub fn drying_log() -> ValidationProfile {
    let validator = Validator::new()
        .field(
            RuleSet::new("lote_id")
                .check(Rule::Required, "Seleccione el lote")
                .check(Rule::Positive(NumberKind::Integer), "El lote no es válido"),
        )
        .field(required_date("fecha_inicio", "fecha de inicio").check(
            Rule::DateNotFuture,
            "La fecha de inicio no puede ser futura",
        ))
        .field(positive_amount("humedad", "la humedad"))
        .field(
            RuleSet::new("estado")
                .check(Rule::Required, "Seleccione el estado del secado")
                .check(one_of(DRYING_STATES), "El estado no es válido"),
        )
        .field(
            RuleSet::new("fecha_fin")
                .check(
                    Rule::RequiredIf {
                        field: "estado".into(),
                        equals: "finalizado".into(),
                    },
                    "La fecha de fin es obligatoria para un secado finalizado",
                )
                .check(
                    Rule::Matches(Format::IsoDate),
                    "La fecha de fin debe ser una fecha válida (AAAA-MM-DD)",
                )
                .check(Rule::DateNotFuture, "La fecha de fin no puede ser futura"),
        )
        .field(optional_text("observaciones", NOTES_MAX, "observaciones"));

    let sanitizer = Sanitizer::new()
        .field("lote_id", INTEGER)
        .field("fecha_inicio", DATE)
        .field("humedad", FLOAT)
        .field("estado", &[Step::Trim])
        .field("fecha_fin", DATE)
        .field("observaciones", TEXT);

    ValidationProfile::new(DRYING_LOG, validator, sanitizer)
}
