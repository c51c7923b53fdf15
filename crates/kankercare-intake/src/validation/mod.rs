//! Declarative form validation
//!
//! A [`RuleSet`] is bound to one record shape. Every field rule is evaluated
//! independently and the first failing check of a field supplies its message;
//! cross-field refinements run afterwards and attach to a designated field
//! unless that field already failed.

pub mod patterns;
pub mod schemas;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{FieldKey, FieldRef, Record};

/// Date format of every date field in the forms
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Errors
// =============================================================================

/// Field path to message. Never constructed empty by a rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message unless the path already has one
    pub fn insert(&mut self, path: &str, message: impl Into<String>) -> bool {
        if self.0.contains_key(path) {
            return false;
        }
        self.0.insert(path.to_string(), message.into());
        true
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.0.remove(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", path, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Checks
// =============================================================================

/// A single constraint on a field value
///
/// Text checks only constrain text values and `MustBeTrue` only constrains
/// flags; a check applied to a value of another kind holds.
#[derive(Debug, Clone, Copy)]
pub enum Check {
    MinChars(usize, &'static str),
    MaxChars(usize, &'static str),
    Matches(&'static LazyLock<Regex>, &'static str),
    Email(&'static str),
    /// Indonesian mobile number, whitespace ignored
    Phone(&'static str),
    PasswordComplexity(&'static str),
    /// Whole number parsed without locale rules
    IntegerRange {
        min: i64,
        max: i64,
        message: &'static str,
    },
    /// Finite number, zero or greater
    NonNegativeNumber(&'static str),
    OneOf(&'static [&'static str], &'static str),
    /// `YYYY-MM-DD`
    IsoDate(&'static str),
    /// Calendar date not after today. Unparseable dates are left to `IsoDate`.
    NotInFuture(&'static str),
    MustBeTrue(&'static str),
}

impl Check {
    pub fn message(&self) -> &'static str {
        match self {
            Check::MinChars(_, m)
            | Check::MaxChars(_, m)
            | Check::Matches(_, m)
            | Check::Email(m)
            | Check::Phone(m)
            | Check::PasswordComplexity(m)
            | Check::NonNegativeNumber(m)
            | Check::OneOf(_, m)
            | Check::IsoDate(m)
            | Check::NotInFuture(m)
            | Check::MustBeTrue(m) => m,
            Check::IntegerRange { message, .. } => message,
        }
    }

    pub fn holds(&self, value: FieldRef<'_>, today: NaiveDate) -> bool {
        match (self, value) {
            (Check::MustBeTrue(_), FieldRef::Flag(flag)) => flag,
            (Check::MustBeTrue(_), _) => false,
            (check, FieldRef::Text(text)) => check.holds_for_text(text, today),
            _ => true,
        }
    }

    fn holds_for_text(&self, text: &str, today: NaiveDate) -> bool {
        match self {
            Check::MinChars(min, _) => text.chars().count() >= *min,
            Check::MaxChars(max, _) => text.chars().count() <= *max,
            Check::Matches(re, _) => re.is_match(text),
            Check::Email(_) => patterns::is_valid_email(text),
            Check::Phone(_) => patterns::is_valid_phone(text),
            Check::PasswordComplexity(_) => patterns::has_password_complexity(text),
            Check::IntegerRange { min, max, .. } => text
                .parse::<i64>()
                .map(|n| (*min..=*max).contains(&n))
                .unwrap_or(false),
            Check::NonNegativeNumber(_) => text
                .parse::<f64>()
                .map(|n| n.is_finite() && n >= 0.0)
                .unwrap_or(false),
            Check::OneOf(options, _) => options.contains(&text),
            Check::IsoDate(_) => NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok(),
            Check::NotInFuture(_) => match NaiveDate::parse_from_str(text, DATE_FORMAT) {
                Ok(date) => date <= today,
                Err(_) => true,
            },
            Check::MustBeTrue(_) => false,
        }
    }
}

// =============================================================================
// Field rules and refinements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    /// Empty values fail with the given message
    Required(&'static str),
    /// Empty values pass without running the checks
    Optional,
    /// Checks run on every value, empty or not
    Checked,
}

/// Rules attached to one field
#[derive(Debug, Clone)]
pub struct FieldRules<F: FieldKey> {
    field: F,
    presence: Presence,
    checks: Vec<Check>,
}

impl<F: FieldKey> FieldRules<F> {
    pub fn required(field: F, message: &'static str) -> Self {
        Self::with_presence(field, Presence::Required(message))
    }

    pub fn optional(field: F) -> Self {
        Self::with_presence(field, Presence::Optional)
    }

    /// Every check runs, including on empty values
    pub fn checked(field: F) -> Self {
        Self::with_presence(field, Presence::Checked)
    }

    fn with_presence(field: F, presence: Presence) -> Self {
        Self {
            field,
            presence,
            checks: Vec::new(),
        }
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn field(&self) -> F {
        self.field
    }

    /// Message of the first failing check, if any
    pub fn evaluate(&self, value: FieldRef<'_>, today: NaiveDate) -> Option<&'static str> {
        let empty = is_empty(value);
        match self.presence {
            Presence::Required(message) if empty => return Some(message),
            Presence::Optional if empty => return None,
            _ => {}
        }
        self.checks
            .iter()
            .find(|check| !check.holds(value, today))
            .map(Check::message)
    }
}

fn is_empty(value: FieldRef<'_>) -> bool {
    match value {
        FieldRef::Text(text) => text.is_empty(),
        FieldRef::List(items) => items.is_empty(),
        FieldRef::Flag(_) => false,
    }
}

/// Cross-field constraint reported on `target`
pub struct Refinement<R: Record> {
    pub target: R::Field,
    pub message: &'static str,
    pub holds: fn(&R) -> bool,
}

impl<R: Record> fmt::Debug for Refinement<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("target", &self.target.path())
            .field("message", &self.message)
            .finish()
    }
}

// =============================================================================
// Rule set
// =============================================================================

/// Validation rules bound to one record shape
pub struct RuleSet<R: Record> {
    rules: Vec<FieldRules<R::Field>>,
    refinements: Vec<Refinement<R>>,
}

impl<R: Record> Default for RuleSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> fmt::Debug for RuleSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules)
            .field("refinements", &self.refinements)
            .finish()
    }
}

impl<R: Record> RuleSet<R> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            refinements: Vec::new(),
        }
    }

    pub fn field(mut self, rules: FieldRules<R::Field>) -> Self {
        self.rules.push(rules);
        self
    }

    pub fn refine(mut self, target: R::Field, message: &'static str, holds: fn(&R) -> bool) -> Self {
        self.refinements.push(Refinement {
            target,
            message,
            holds,
        });
        self
    }

    /// Validate against today's local date and hand back the record typed as valid
    pub fn validate(&self, record: R) -> Result<Valid<R>, FieldErrors> {
        self.validate_on(record, today())
    }

    pub fn validate_on(&self, record: R, today: NaiveDate) -> Result<Valid<R>, FieldErrors> {
        self.check_on(&record, today)?;
        Ok(Valid(record))
    }

    pub fn check(&self, record: &R) -> Result<(), FieldErrors> {
        self.check_on(record, today())
    }

    pub fn check_on(&self, record: &R, today: NaiveDate) -> Result<(), FieldErrors> {
        self.run(record, today, |_| true)
    }

    /// Evaluate only `subset` and the refinements that target it
    pub fn check_fields(&self, record: &R, subset: &[R::Field]) -> Result<(), FieldErrors> {
        self.check_fields_on(record, subset, today())
    }

    pub fn check_fields_on(
        &self,
        record: &R,
        subset: &[R::Field],
        today: NaiveDate,
    ) -> Result<(), FieldErrors> {
        self.run(record, today, |field| subset.contains(&field))
    }

    fn run(
        &self,
        record: &R,
        today: NaiveDate,
        selected: impl Fn(R::Field) -> bool,
    ) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for rules in self.rules.iter().filter(|r| selected(r.field)) {
            if let Some(message) = rules.evaluate(record.field(rules.field), today) {
                errors.insert(rules.field.path(), message);
            }
        }

        for refinement in self.refinements.iter().filter(|r| selected(r.target)) {
            if !(refinement.holds)(record) {
                errors.insert(refinement.target.path(), refinement.message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Validated records
// =============================================================================

/// A record that passed its rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Valid<R>(R);

impl<R> Valid<R> {
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R> Deref for Valid<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.0
    }
}

impl<R> AsRef<R> for Valid<R> {
    fn as_ref(&self) -> &R {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoginField, LoginRecord};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_field_errors_first_insert_wins() {
        let mut errors = FieldErrors::new();
        assert!(errors.insert("email", "first"));
        assert!(!errors.insert("email", "second"));
        assert_eq!(errors.get("email"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_field_errors_display_and_serde() {
        let mut errors = FieldErrors::new();
        errors.insert("phone", "b");
        errors.insert("age", "a");
        assert_eq!(errors.to_string(), "age: a; phone: b");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"age": "a", "phone": "b"}));
    }

    #[test]
    fn test_integer_range_is_strict() {
        let check = Check::IntegerRange {
            min: 1,
            max: 150,
            message: "m",
        };
        let today = date("2024-06-01");
        assert!(check.holds(FieldRef::Text("1"), today));
        assert!(check.holds(FieldRef::Text("150"), today));
        assert!(!check.holds(FieldRef::Text("0"), today));
        assert!(!check.holds(FieldRef::Text("151"), today));
        assert!(!check.holds(FieldRef::Text("45abc"), today));
        assert!(!check.holds(FieldRef::Text("4.5"), today));
    }

    #[test]
    fn test_non_negative_number() {
        let check = Check::NonNegativeNumber("m");
        let today = date("2024-06-01");
        assert!(check.holds(FieldRef::Text("0"), today));
        assert!(check.holds(FieldRef::Text("35.5"), today));
        assert!(!check.holds(FieldRef::Text("-1"), today));
        assert!(!check.holds(FieldRef::Text("tinggi"), today));
        assert!(!check.holds(FieldRef::Text("NaN"), today));
        assert!(!check.holds(FieldRef::Text("inf"), today));
    }

    #[test]
    fn test_date_checks() {
        let today = date("2024-06-01");
        let format = Check::IsoDate("format");
        let past = Check::NotInFuture("future");

        assert!(format.holds(FieldRef::Text("2024-06-01"), today));
        assert!(!format.holds(FieldRef::Text("01/06/2024"), today));
        assert!(past.holds(FieldRef::Text("2024-06-01"), today));
        assert!(!past.holds(FieldRef::Text("2024-06-02"), today));
    }

    #[test]
    fn test_must_be_true_only_accepts_true_flag() {
        let today = date("2024-06-01");
        let check = Check::MustBeTrue("m");
        assert!(check.holds(FieldRef::Flag(true), today));
        assert!(!check.holds(FieldRef::Flag(false), today));
        assert!(!check.holds(FieldRef::Text("true"), today));
    }

    #[test]
    fn test_presence_modes() {
        let today = date("2024-06-01");
        let required = FieldRules::required(LoginField::Email, "wajib").check(Check::Email("format"));
        let optional = FieldRules::optional(LoginField::Email).check(Check::Email("format"));
        let checked = FieldRules::checked(LoginField::Password).check(Check::MinChars(8, "pendek"));

        assert_eq!(required.evaluate(FieldRef::Text(""), today), Some("wajib"));
        assert_eq!(required.evaluate(FieldRef::Text("x"), today), Some("format"));
        assert_eq!(optional.evaluate(FieldRef::Text(""), today), None);
        assert_eq!(optional.evaluate(FieldRef::Text("x"), today), Some("format"));
        assert_eq!(checked.evaluate(FieldRef::Text(""), today), Some("pendek"));
    }

    #[test]
    fn test_first_failing_check_wins() {
        let rules = FieldRules::checked(LoginField::Password)
            .check(Check::MinChars(8, "pendek"))
            .check(Check::PasswordComplexity("lemah"));
        let today = date("2024-06-01");
        assert_eq!(rules.evaluate(FieldRef::Text("abc"), today), Some("pendek"));
        assert_eq!(rules.evaluate(FieldRef::Text("abcdefgh"), today), Some("lemah"));
    }

    #[test]
    fn test_refinement_does_not_overwrite_field_error() {
        let rules = RuleSet::<LoginRecord>::new()
            .field(FieldRules::required(LoginField::Email, "wajib"))
            .refine(LoginField::Email, "refined", |r| r.email == "a@b.co")
            .refine(LoginField::Password, "refined", |r| r.password == "x");

        let record = LoginRecord::default();
        let errors = rules.check(&record).unwrap_err();
        assert_eq!(errors.get("email"), Some("wajib"));
        assert_eq!(errors.get("password"), Some("refined"));
    }

    #[test]
    fn test_check_fields_limits_rules_and_refinements() {
        let rules = RuleSet::<LoginRecord>::new()
            .field(FieldRules::required(LoginField::Email, "wajib"))
            .field(FieldRules::required(LoginField::Password, "wajib"))
            .refine(LoginField::Password, "refined", |_| false);

        let record = LoginRecord::default();
        let errors = rules.check_fields(&record, &[LoginField::Email]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("email"));

        assert!(rules.check_fields(&record, &[]).is_ok());
    }

    #[test]
    fn test_validate_returns_typed_record() {
        let rules = RuleSet::<LoginRecord>::new().field(FieldRules::required(LoginField::Email, "wajib"));
        let record = LoginRecord {
            email: "a@b.co".into(),
            ..Default::default()
        };
        let valid = rules.validate(record.clone()).unwrap();
        assert_eq!(valid.email, "a@b.co");
        assert_eq!(valid.into_inner(), record);
    }
}
