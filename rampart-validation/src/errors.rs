// Error types for rule evaluation, scanning and registry construction

use crate::PatternId;
use rampart_core::Error;
use thiserror::Error;

/// Why a value failed a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingValue,
    LengthOutOfRange {
        min: usize,
        max: usize,
        actual: usize,
    },
    PatternMismatch,
}

/// A value broke a rule. The message is safe to show to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleViolation {
    pub kind: ViolationKind,
    pub message: String,
}

impl RuleViolation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Failure while checking a single rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error(transparent)]
    Violation(#[from] RuleViolation),

    /// The rule cannot read this kind of value at all.
    #[error("{rule} rule expects {expected}, got {found}")]
    TypeMismatch {
        rule: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("pattern '{0}' is not in the catalog")]
    UnknownPattern(PatternId),
}

impl RuleError {
    pub fn is_violation(&self) -> bool {
        matches!(self, RuleError::Violation(_))
    }
}

/// Arguments do not fit the handler's declared parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("handler {handler} declares {declared} parameters but received {actual} arguments")]
    ArityMismatch {
        handler: String,
        declared: usize,
        actual: usize,
    },

    #[error("parameter {param} of type {type_name} is null, cannot read its fields")]
    NullTarget { param: String, type_name: String },

    #[error("parameter {param} is not a {type_name} object, got {found}")]
    NotAnObject {
        param: String,
        type_name: String,
        found: &'static str,
    },

    #[error("parameter {param} refers to unregistered type {type_name}")]
    UnknownType { param: String, type_name: String },
}

/// Rule metadata rejected at startup.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("handler {0} registered twice")]
    DuplicateHandler(String),

    #[error("type {0} registered twice")]
    DuplicateType(String),

    #[error("{owner} refers to unregistered type {type_name}")]
    UnknownType { owner: String, type_name: String },

    #[error("{owner} validates nested fields but declares no type")]
    NestedWithoutType { owner: String },

    #[error("{owner} has password length range {min}..={max}")]
    InvalidLength {
        owner: String,
        min: usize,
        max: usize,
    },

    #[error("unknown pattern id '{0}'")]
    UnknownPattern(String),

    #[error("pattern '{id}' does not compile: {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },
}

pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<ScanError> for Error {
    fn from(err: ScanError) -> Self {
        Error::Reflection(err.to_string())
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Error::Config(err.to_string())
    }
}
