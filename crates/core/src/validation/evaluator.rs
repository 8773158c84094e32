//! Rule evaluator — pure logic, no I/O.

use chrono::{Local, NaiveDate};
use validator::ValidateEmail;

use super::coerce::{parse_date, parse_float, parse_integer};
use super::input::FormInput;
use super::rules::{
    Check, Condition, ErrorMap, Format, NumberKind, Rule, RuleSet, ValidationError,
};

/// Everything a rule may look at besides its own field's value.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub input: &'a FormInput,
    /// The day date-bound rules compare against.
    pub today: NaiveDate,
}

impl<'a> EvalContext<'a> {
    pub fn new(input: &'a FormInput, today: NaiveDate) -> Self {
        Self { input, today }
    }

    /// Context for the current local day.
    pub fn now(input: &'a FormInput) -> Self {
        Self::new(input, Local::now().date_naive())
    }
}

impl Rule {
    /// Whether the trimmed `value` satisfies the rule. Never mutates the input.
    pub fn passes(&self, value: Option<&str>, ctx: &EvalContext<'_>) -> bool {
        self.passes_untrimmed(value.map(str::trim), ctx)
    }

    /// Whether `value`, exactly as given, satisfies the rule.
    pub fn passes_untrimmed(&self, value: Option<&str>, ctx: &EvalContext<'_>) -> bool {
        let present = value.filter(|v| !v.is_empty());
        match self {
            Rule::Required => present.is_some(),
            Rule::RequiredIf { field, equals } => {
                present.is_some() || !ctx.input.equals(field, equals)
            }
            Rule::RequiredGroup(fields) => fields.iter().any(|f| ctx.input.is_truthy(f)),
            _ => present.map_or(true, |v| self.accepts(v, ctx.today)),
        }
    }

    /// Value-shaped rules on a non-empty value.
    fn accepts(&self, value: &str, today: NaiveDate) -> bool {
        match self {
            Rule::LengthBetween { min, max } => {
                let len = value.chars().count();
                min.map_or(true, |min| len >= min) && max.map_or(true, |max| len <= max)
            }
            Rule::Positive(NumberKind::Float) => parse_float(value).is_some_and(|n| n > 0.0),
            Rule::Positive(NumberKind::Integer) => parse_integer(value).is_some_and(|n| n > 0),
            Rule::Matches(Format::Email) => value.validate_email(),
            Rule::Matches(Format::IsoDate) => parse_date(value).is_some(),
            Rule::Matches(Format::Pattern(re)) => re.is_match(value),
            Rule::OneOf(allowed) => allowed.iter().any(|a| a == value),
            // An unparseable date is the format rule's concern.
            Rule::DateNotFuture => parse_date(value).map_or(true, |date| date <= today),
            Rule::Required | Rule::RequiredIf { .. } | Rule::RequiredGroup(_) => true,
        }
    }
}

impl Check {
    pub fn evaluate(&self, value: Option<&str>, ctx: &EvalContext<'_>) -> Result<(), String> {
        self.outcome(self.rule.passes(value, ctx))
    }

    pub fn evaluate_untrimmed(
        &self,
        value: Option<&str>,
        ctx: &EvalContext<'_>,
    ) -> Result<(), String> {
        self.outcome(self.rule.passes_untrimmed(value, ctx))
    }

    fn outcome(&self, passed: bool) -> Result<(), String> {
        if passed {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

impl Condition {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn truthy(field: impl Into<String>) -> Self {
        Condition::Truthy(field.into())
    }

    pub fn holds(&self, input: &FormInput) -> bool {
        match self {
            Condition::Equals { field, value } => input.equals(field, value),
            Condition::Truthy(field) => input.is_truthy(field),
        }
    }
}

impl RuleSet {
    /// Whether the set's gate lets it run for this submission.
    pub fn applies(&self, input: &FormInput) -> bool {
        self.condition.as_ref().map_or(true, |c| c.holds(input))
    }

    /// Run every check and collect all failures.
    pub fn validate(&self, ctx: &EvalContext<'_>) -> Vec<ValidationError> {
        if !self.applies(ctx.input) {
            return Vec::new();
        }
        let value = ctx.input.get(&self.field);
        let blank = if self.keep_whitespace {
            value.map_or(true, str::is_empty)
        } else {
            value.map_or(true, |v| v.trim().is_empty())
        };
        if self.optional && blank {
            return Vec::new();
        }
        self.checks
            .iter()
            .filter_map(|check| {
                let outcome = if self.keep_whitespace {
                    check.evaluate_untrimmed(value, ctx)
                } else {
                    check.evaluate(value, ctx)
                };
                outcome.err()
            })
            .map(|message| ValidationError::new(&self.field, message))
            .collect()
    }
}

/// A rule spanning several fields, reported under `key`.
#[derive(Debug, Clone)]
pub struct CrossFieldRule {
    pub key: String,
    pub check: Check,
}

/// Field rule sets plus cross-field rules for one kind of submission.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    sets: Vec<RuleSet>,
    cross: Vec<CrossFieldRule>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, set: RuleSet) -> Self {
        self.sets.push(set);
        self
    }

    pub fn cross_field(
        mut self,
        key: impl Into<String>,
        rule: Rule,
        message: impl Into<String>,
    ) -> Self {
        self.cross.push(CrossFieldRule {
            key: key.into(),
            check: Check::new(rule, message),
        });
        self
    }

    /// Validate against today's local date.
    pub fn validate(&self, input: &FormInput) -> ErrorMap {
        self.evaluate(&EvalContext::now(input))
    }

    pub fn validate_at(&self, input: &FormInput, today: NaiveDate) -> ErrorMap {
        self.evaluate(&EvalContext::new(input, today))
    }

    /// Field sets first, in declaration order, then cross-field rules.
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for set in &self.sets {
            errors.extend(set.validate(ctx));
        }
        for rule in &self.cross {
            let value = ctx.input.get(&rule.key);
            if let Err(message) = rule.check.evaluate(value, ctx) {
                errors.push(ValidationError::new(&rule.key, message));
            }
        }
        errors
    }

    /// Copy of `input` without the fields whose rule set is gated off.
    ///
    /// Fields the validator does not declare are kept; the sanitizer decides
    /// what ends up in the record.
    pub fn active_input(&self, input: &FormInput) -> FormInput {
        let mut active = input.clone();
        active.retain(|field| {
            self.sets
                .iter()
                .filter(|set| set.field == field)
                .all(|set| set.applies(input))
        });
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(pairs: &[(&str, &str)]) -> FormInput {
        pairs.iter().copied().collect()
    }

    fn passes(rule: Rule, value: Option<&str>) -> bool {
        let empty = FormInput::new();
        rule.passes(value, &EvalContext::new(&empty, day(2024, 6, 1)))
    }

    #[test]
    fn required_rejects_missing_and_blank() {
        assert!(!passes(Rule::Required, None));
        assert!(!passes(Rule::Required, Some("   ")));
        assert!(passes(Rule::Required, Some(" x ")));
    }

    #[test]
    fn length_counts_trimmed_characters() {
        let rule = Rule::LengthBetween {
            min: Some(3),
            max: Some(5),
        };
        assert!(passes(rule.clone(), Some("  Ana  ")));
        assert!(passes(rule.clone(), Some("Ñañez")));
        assert!(!passes(rule.clone(), Some("Al")));
        assert!(!passes(rule, Some("Alejandro")));
    }

    #[test]
    fn value_rules_pass_on_blank_input() {
        assert!(passes(Rule::Positive(NumberKind::Float), None));
        assert!(passes(Rule::Matches(Format::Email), Some("")));
        assert!(passes(Rule::OneOf(vec!["lavado".into()]), None));
    }

    #[test]
    fn positive_is_strict() {
        assert!(passes(Rule::Positive(NumberKind::Float), Some("0.5")));
        assert!(!passes(Rule::Positive(NumberKind::Float), Some("0")));
        assert!(!passes(Rule::Positive(NumberKind::Float), Some("-5")));
        assert!(!passes(Rule::Positive(NumberKind::Float), Some("cinco")));
    }

    #[test]
    fn positive_integer_rejects_fractions() {
        assert!(passes(Rule::Positive(NumberKind::Integer), Some("2")));
        assert!(!passes(Rule::Positive(NumberKind::Integer), Some("2.5")));
    }

    #[test]
    fn formats() {
        assert!(passes(Rule::Matches(Format::Email), Some("ana@finca.co")));
        assert!(!passes(Rule::Matches(Format::Email), Some("ana@")));
        assert!(passes(Rule::Matches(Format::IsoDate), Some("2024-01-31")));
        assert!(!passes(Rule::Matches(Format::IsoDate), Some("31/01/2024")));
        let digit = Rule::Matches(Format::Pattern(Regex::new(r"\d").unwrap()));
        assert!(passes(digit.clone(), Some("secreto1")));
        assert!(!passes(digit, Some("secreto")));
    }

    #[test]
    fn date_not_future_compares_against_context_day() {
        assert!(passes(Rule::DateNotFuture, Some("2024-06-01")));
        assert!(!passes(Rule::DateNotFuture, Some("2024-06-02")));
        assert!(passes(Rule::DateNotFuture, Some("no es fecha")));
    }

    #[test]
    fn required_if_follows_sibling() {
        let rule = Rule::RequiredIf {
            field: "estado".into(),
            equals: "finalizado".into(),
        };
        let done = input(&[("estado", "finalizado")]);
        let running = input(&[("estado", "en_proceso")]);

        assert!(!rule.passes(None, &EvalContext::new(&done, day(2024, 1, 1))));
        assert!(rule.passes(Some("2024-01-01"), &EvalContext::new(&done, day(2024, 1, 1))));
        assert!(rule.passes(None, &EvalContext::new(&running, day(2024, 1, 1))));
    }

    #[test]
    fn rule_set_collects_all_failures() {
        let set = RuleSet::new("password")
            .check(
                Rule::LengthBetween {
                    min: Some(8),
                    max: None,
                },
                "corta",
            )
            .check(
                Rule::Matches(Format::Pattern(Regex::new(r"\d").unwrap())),
                "sin número",
            );
        let data = input(&[("password", "abc")]);
        let errors = set.validate(&EvalContext::new(&data, day(2024, 1, 1)));

        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["corta", "sin número"]);
    }

    #[test]
    fn whitespace_kept_sets_judge_the_raw_value() {
        let set = RuleSet::new("password")
            .keep_whitespace()
            .check(Rule::Required, "requerida")
            .check(
                Rule::LengthBetween {
                    min: Some(8),
                    max: None,
                },
                "corta",
            );
        let ctx_for = |raw: &str| input(&[("password", raw)]);

        let padded = ctx_for("abcdef1 ");
        assert!(set.validate(&EvalContext::new(&padded, day(2024, 1, 1))).is_empty());

        let spaces = ctx_for("        ");
        assert!(set.validate(&EvalContext::new(&spaces, day(2024, 1, 1))).is_empty());

        let empty = ctx_for("");
        let messages: Vec<_> = set
            .validate(&EvalContext::new(&empty, day(2024, 1, 1)))
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["requerida"]);
    }

    #[test]
    fn trimmed_sets_ignore_surrounding_whitespace() {
        let set = RuleSet::new("nombre").check(
            Rule::LengthBetween {
                min: Some(8),
                max: None,
            },
            "corto",
        );
        let data = input(&[("nombre", "abcdef1 ")]);
        assert_eq!(set.validate(&EvalContext::new(&data, day(2024, 1, 1))).len(), 1);
    }

    #[test]
    fn optional_set_skips_blank_values() {
        let set = RuleSet::new("comprador")
            .optional()
            .check(Rule::Required, "never reported");
        let data = input(&[("comprador", "  ")]);
        assert!(set.validate(&EvalContext::new(&data, day(2024, 1, 1))).is_empty());
    }

    #[test]
    fn gated_set_is_skipped_when_condition_fails() {
        let set = RuleSet::new("cantidad_vender_grano")
            .when(Condition::truthy("vender_grano"))
            .check(Rule::Positive(NumberKind::Float), "positiva");
        let data = input(&[("cantidad_vender_grano", "-1")]);
        assert!(set.validate(&EvalContext::new(&data, day(2024, 1, 1))).is_empty());
    }

    #[test]
    fn validator_runs_cross_field_rules_after_field_sets() {
        let validator = Validator::new()
            .field(RuleSet::new("fecha").check(Rule::Required, "fecha requerida"))
            .cross_field(
                "productos",
                Rule::RequiredGroup(vec!["a".into(), "b".into()]),
                "elija uno",
            );
        let errors = validator.validate_at(&FormInput::new(), day(2024, 1, 1));

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["fecha", "productos"]);
    }

    #[test]
    fn active_input_drops_gated_fields() {
        let validator = Validator::new().field(
            RuleSet::new("cantidad_vender_molido").when(Condition::truthy("vender_molido")),
        );
        let data = input(&[("cantidad_vender_molido", "3"), ("fecha", "2024-01-01")]);
        let active = validator.active_input(&data);

        assert_eq!(active.get("cantidad_vender_molido"), None);
        assert_eq!(active.get("fecha"), Some("2024-01-01"));
    }
}
