//! Rule evaluation.
//!
//! An evaluator checks one value against one rule. A value of `None` or JSON
//! `null` counts as absent. Checks inside a rule stop at the first failure:
//! presence, then length, then pattern.

use crate::errors::value_kind;
use crate::{
    NotNullRule, NumberRule, PasswordRule, Pattern, PatternCatalog, PatternId, RegistryError,
    RuleDescriptor, RuleError, RuleViolation, ViolationKind,
};
use rampart_config::{MessageSettings, Settings};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Checks a single value against a single rule.
pub trait Evaluate: Send + Sync {
    fn check(&self, rule: &RuleDescriptor, value: Option<&Value>) -> Result<(), RuleError>;
}

/// Evaluator backed by a compiled [`PatternCatalog`].
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    catalog: Arc<PatternCatalog>,
    messages: MessageSettings,
}

impl RuleEvaluator {
    pub fn new(catalog: Arc<PatternCatalog>, messages: MessageSettings) -> Self {
        Self { catalog, messages }
    }

    /// Built-in patterns and default messages.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        Ok(Self::new(PatternCatalog::builtin()?, MessageSettings::default()))
    }

    /// Catalog overrides and messages taken from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, RegistryError> {
        let catalog = if settings.patterns.is_empty() {
            PatternCatalog::builtin()?
        } else {
            Arc::new(PatternCatalog::from_settings(&settings.patterns)?)
        };
        Ok(Self::new(catalog, settings.messages.clone()))
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn messages(&self) -> &MessageSettings {
        &self.messages
    }

    fn pattern(&self, id: PatternId) -> Result<&Pattern, RuleError> {
        self.catalog.get(id).ok_or(RuleError::UnknownPattern(id))
    }

    pub fn check_password(&self, rule: &PasswordRule, value: Option<&Value>) -> Result<(), RuleError> {
        let Some(value) = present(value) else {
            return Err(violation(ViolationKind::MissingValue, &self.messages.password_blank));
        };
        let text = value.as_str().ok_or(RuleError::TypeMismatch {
            rule: "password",
            expected: "a string",
            found: value_kind(value),
        })?;

        let actual = text.chars().count();
        if actual < rule.min_length || actual > rule.max_length {
            let message = rule.message.clone().unwrap_or_else(|| {
                format!(
                    "password length must be between {} and {} characters",
                    rule.min_length, rule.max_length
                )
            });
            return Err(violation(
                ViolationKind::LengthOutOfRange {
                    min: rule.min_length,
                    max: rule.max_length,
                    actual,
                },
                message,
            ));
        }

        let pattern = self.pattern(rule.pattern)?;
        if !pattern.is_match(text) {
            let message = rule.message.as_deref().unwrap_or(pattern.description());
            return Err(violation(ViolationKind::PatternMismatch, message));
        }

        Ok(())
    }

    pub fn check_number(&self, rule: &NumberRule, value: Option<&Value>) -> Result<(), RuleError> {
        let Some(value) = present(value) else {
            return Err(violation(ViolationKind::MissingValue, &self.messages.number_blank));
        };
        let text: Cow<'_, str> = match value {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => Cow::Owned(n.to_string()),
            other => {
                return Err(RuleError::TypeMismatch {
                    rule: "number",
                    expected: "a number or string",
                    found: value_kind(other),
                });
            }
        };

        let pattern = self.pattern(rule.pattern)?;
        if !pattern.is_match(&text) {
            let message = rule.message.as_deref().unwrap_or(pattern.description());
            return Err(violation(ViolationKind::PatternMismatch, message));
        }

        Ok(())
    }

    pub fn check_not_null(&self, rule: &NotNullRule, value: Option<&Value>) -> Result<(), RuleError> {
        let message = rule.message.as_deref().unwrap_or(&self.messages.not_blank);

        let Some(value) = present(value) else {
            if rule.required {
                return Err(violation(ViolationKind::MissingValue, message));
            }
            return Ok(());
        };
        let text: Cow<'_, str> = match value {
            Value::String(s) => Cow::Borrowed(s.trim()),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Bool(b) => Cow::Owned(b.to_string()),
            // arrays and objects are matched in their serialized form
            other => Cow::Owned(other.to_string()),
        };

        if text.is_empty() && !rule.required {
            return Ok(());
        }

        let pattern = self.pattern(rule.pattern)?;
        if !pattern.is_match(&text) {
            return Err(violation(ViolationKind::PatternMismatch, message));
        }

        Ok(())
    }
}

impl Evaluate for RuleEvaluator {
    fn check(&self, rule: &RuleDescriptor, value: Option<&Value>) -> Result<(), RuleError> {
        match rule {
            RuleDescriptor::Password(rule) => self.check_password(rule, value),
            RuleDescriptor::Number(rule) => self.check_number(rule, value),
            RuleDescriptor::NotNull(rule) => self.check_not_null(rule, value),
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn violation(kind: ViolationKind, message: impl Into<String>) -> RuleError {
    RuleError::Violation(RuleViolation::new(kind, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evaluator() -> RuleEvaluator {
        RuleEvaluator::with_defaults().unwrap()
    }

    fn kind_of(result: Result<(), RuleError>) -> ViolationKind {
        match result {
            Err(RuleError::Violation(v)) => v.kind,
            other => panic!("expected violation, got {:?}", other),
        }
    }

    fn message_of(result: Result<(), RuleError>) -> String {
        match result {
            Err(RuleError::Violation(v)) => v.message,
            other => panic!("expected violation, got {:?}", other),
        }
    }

    #[test]
    fn test_password_valid() {
        let rule = PasswordRule::default();
        assert!(evaluator().check_password(&rule, Some(&json!("aAbc123@!4"))).is_ok());
    }

    #[test]
    fn test_password_at_max_length() {
        let rule = PasswordRule::default();
        let value = json!("abDd1354699875645@");
        assert_eq!(value.as_str().unwrap().chars().count(), 18);
        assert!(evaluator().check_password(&rule, Some(&value)).is_ok());
    }

    #[test]
    fn test_password_too_long() {
        let rule = PasswordRule::default();
        let result = evaluator().check_password(&rule, Some(&json!("abDd13546998756451@")));

        assert_eq!(
            kind_of(result),
            ViolationKind::LengthOutOfRange {
                min: 8,
                max: 18,
                actual: 19
            }
        );
    }

    #[test]
    fn test_password_length_checked_before_pattern() {
        let rule = PasswordRule::default();
        let result = evaluator().check_password(&rule, Some(&json!("abc")));
        assert!(matches!(kind_of(result), ViolationKind::LengthOutOfRange { .. }));
    }

    #[test]
    fn test_password_length_counts_chars() {
        let rule = PasswordRule::new().length(2, 3).pattern(PatternId::NotBlank);
        assert!(evaluator().check_password(&rule, Some(&json!("äöü"))).is_ok());
    }

    #[test]
    fn test_password_missing() {
        let rule = PasswordRule::default();
        let evaluator = evaluator();

        assert_eq!(kind_of(evaluator.check_password(&rule, None)), ViolationKind::MissingValue);
        assert_eq!(
            message_of(evaluator.check_password(&rule, Some(&Value::Null))),
            "password must not be blank"
        );
    }

    #[test]
    fn test_password_pattern_mismatch_uses_description() {
        let rule = PasswordRule::default();
        let evaluator = evaluator();
        let result = evaluator.check_password(&rule, Some(&json!("abcdefgh1")));

        let expected = evaluator.catalog().get(PatternId::Password).unwrap().description().to_string();
        assert_eq!(message_of(result), expected);
    }

    #[test]
    fn test_password_custom_message() {
        let rule = PasswordRule::new().message("weak password");
        let evaluator = evaluator();

        assert_eq!(message_of(evaluator.check_password(&rule, Some(&json!("abc")))), "weak password");
        assert_eq!(
            message_of(evaluator.check_password(&rule, Some(&json!("abcdefgh1")))),
            "weak password"
        );
    }

    #[test]
    fn test_password_rejects_non_string() {
        let rule = PasswordRule::default();
        let result = evaluator().check_password(&rule, Some(&json!(12345678)));
        assert!(matches!(result, Err(RuleError::TypeMismatch { found: "a number", .. })));
    }

    #[test]
    fn test_number_rule() {
        let rule = NumberRule::new().pattern(PatternId::Age).message("age must be 1-120");
        let evaluator = evaluator();

        assert!(evaluator.check_number(&rule, Some(&json!(18))).is_ok());
        assert!(evaluator.check_number(&rule, Some(&json!("120"))).is_ok());
        assert_eq!(
            message_of(evaluator.check_number(&rule, Some(&json!("200")))),
            "age must be 1-120"
        );
        assert_eq!(kind_of(evaluator.check_number(&rule, Some(&json!(0)))), ViolationKind::PatternMismatch);
    }

    #[test]
    fn test_number_rule_missing() {
        let evaluator = evaluator();
        let result = evaluator.check_number(&NumberRule::default(), None);
        assert_eq!(message_of(result), evaluator.messages().number_blank);
    }

    #[test]
    fn test_number_rule_rejects_fraction() {
        let result = evaluator().check_number(&NumberRule::default(), Some(&json!(1.5)));
        assert_eq!(kind_of(result), ViolationKind::PatternMismatch);
    }

    #[test]
    fn test_number_rule_rejects_bool() {
        let result = evaluator().check_number(&NumberRule::default(), Some(&json!(true)));
        assert!(matches!(result, Err(RuleError::TypeMismatch { .. })));
    }

    #[test]
    fn test_not_null_required() {
        let rule = NotNullRule::new().message("name is required");
        let evaluator = evaluator();

        assert!(evaluator.check_not_null(&rule, Some(&json!("bob"))).is_ok());
        assert!(evaluator.check_not_null(&rule, Some(&json!(0))).is_ok());
        assert!(evaluator.check_not_null(&rule, Some(&json!(false))).is_ok());
        assert_eq!(kind_of(evaluator.check_not_null(&rule, None)), ViolationKind::MissingValue);
        assert_eq!(
            message_of(evaluator.check_not_null(&rule, Some(&json!("   ")))),
            "name is required"
        );
    }

    #[test]
    fn test_not_null_optional() {
        let rule = NotNullRule::optional().pattern(PatternId::Number);
        let evaluator = evaluator();

        assert!(evaluator.check_not_null(&rule, None).is_ok());
        assert!(evaluator.check_not_null(&rule, Some(&json!(""))).is_ok());
        assert!(evaluator.check_not_null(&rule, Some(&json!(" 42 "))).is_ok());
        assert_eq!(
            kind_of(evaluator.check_not_null(&rule, Some(&json!("forty")))),
            ViolationKind::PatternMismatch
        );
    }

    #[test]
    fn test_not_null_accepts_containers() {
        let rule = NotNullRule::default();
        let evaluator = evaluator();

        assert!(evaluator.check_not_null(&rule, Some(&json!({"city": "Paris"}))).is_ok());
        assert!(evaluator.check_not_null(&rule, Some(&json!(["x"]))).is_ok());
        assert!(evaluator.check_not_null(&rule, Some(&json!({}))).is_ok());
        assert!(evaluator.check_not_null(&rule, Some(&json!([]))).is_ok());
    }

    #[test]
    fn test_not_null_container_still_matches_pattern() {
        let rule = NotNullRule::new().pattern(PatternId::Number);
        let result = evaluator().check_not_null(&rule, Some(&json!([1, 2])));
        assert_eq!(kind_of(result), ViolationKind::PatternMismatch);
    }

    #[test]
    fn test_dispatch_through_trait() {
        let evaluator = evaluator();
        let dynamic: &dyn Evaluate = &evaluator;
        let rule = RuleDescriptor::from(NumberRule::default());

        assert!(dynamic.check(&rule, Some(&json!("7"))).is_ok());
        assert!(dynamic.check(&rule, Some(&json!("x"))).is_err());
    }

    #[test]
    fn test_messages_from_settings() {
        let mut settings = Settings::default();
        settings.messages.password_blank = "enter a password".into();

        let evaluator = RuleEvaluator::from_settings(&settings).unwrap();
        let result = evaluator.check_password(&PasswordRule::default(), None);
        assert_eq!(message_of(result), "enter a password");
    }
}
