// Declarative rules attached to parameters and fields

use crate::PatternId;
use serde::{Deserialize, Serialize};

/// Default minimum password length
pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Default maximum password length
pub const DEFAULT_MAX_LENGTH: usize = 18;

/// Password constraint: a length range, then a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordRule {
    pub min_length: usize,
    pub max_length: usize,
    pub pattern: PatternId,
    /// Replaces the generated length and pattern messages
    pub message: Option<String>,
}

impl PasswordRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn pattern(mut self, pattern: PatternId) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Default for PasswordRule {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            pattern: PatternId::Password,
            message: None,
        }
    }
}

/// Numeric text constraint. Accepts JSON numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberRule {
    pub pattern: PatternId,
    pub message: Option<String>,
}

impl NumberRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, pattern: PatternId) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Default for NumberRule {
    fn default() -> Self {
        Self {
            pattern: PatternId::Number,
            message: None,
        }
    }
}

/// Presence constraint. When `required` is false an absent or blank value
/// passes, but a non-blank value must still match the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotNullRule {
    pub required: bool,
    pub pattern: PatternId,
    pub message: Option<String>,
}

impl NotNullRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional() -> Self {
        Self {
            required: false,
            ..Self::default()
        }
    }

    pub fn pattern(mut self, pattern: PatternId) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Default for NotNullRule {
    fn default() -> Self {
        Self {
            required: true,
            pattern: PatternId::NotBlank,
            message: None,
        }
    }
}

/// One rule as stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDescriptor {
    Password(PasswordRule),
    Number(NumberRule),
    NotNull(NotNullRule),
}

impl RuleDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            RuleDescriptor::Password(_) => "password",
            RuleDescriptor::Number(_) => "number",
            RuleDescriptor::NotNull(_) => "not_null",
        }
    }

    pub fn pattern(&self) -> PatternId {
        match self {
            RuleDescriptor::Password(rule) => rule.pattern,
            RuleDescriptor::Number(rule) => rule.pattern,
            RuleDescriptor::NotNull(rule) => rule.pattern,
        }
    }
}

impl From<PasswordRule> for RuleDescriptor {
    fn from(rule: PasswordRule) -> Self {
        RuleDescriptor::Password(rule)
    }
}

impl From<NumberRule> for RuleDescriptor {
    fn from(rule: NumberRule) -> Self {
        RuleDescriptor::Number(rule)
    }
}

impl From<NotNullRule> for RuleDescriptor {
    fn from(rule: NotNullRule) -> Self {
        RuleDescriptor::NotNull(rule)
    }
}
